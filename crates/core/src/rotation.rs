// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target rotation queue
//!
//! A shuffle bag over the wallpapers of one album. Entries are kept in draw
//! order for the current cycle and the consumed entries always form a prefix.
//! When the last unconsumed entry is drawn the cycle resets: every flag is
//! cleared and the entries are rearranged by the [`SelectionOrder`]. With two
//! or more entries the wallpaper that was just shown is never placed first,
//! so consecutive draws never repeat.

use crate::catalog::{AlbumName, Wallpaper, WallpaperId};
use crate::error::RotationError;
use crate::target::Target;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// How a fresh cycle is arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Uniform random permutation per cycle
    #[default]
    Shuffle,
    /// Ascending ordering key
    Sequential,
}

impl fmt::Display for SelectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionOrder::Shuffle => write!(f, "shuffle"),
            SelectionOrder::Sequential => write!(f, "sequential"),
        }
    }
}

impl std::str::FromStr for SelectionOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shuffle" => Ok(SelectionOrder::Shuffle),
            "sequential" => Ok(SelectionOrder::Sequential),
            _ => Err(format!("unknown selection order: {}", s)),
        }
    }
}

/// One wallpaper eligible for selection on a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub wallpaper: WallpaperId,
    pub order_key: u64,
    pub last_shown_at: Option<DateTime<Utc>>,
    pub consumed: bool,
}

impl QueueEntry {
    fn fresh(wallpaper: &Wallpaper) -> Self {
        Self {
            wallpaper: wallpaper.id.clone(),
            order_key: wallpaper.order_key,
            last_shown_at: None,
            consumed: false,
        }
    }
}

/// Selection state for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationQueue {
    pub target: Target,
    pub album: Option<AlbumName>,
    entries: Vec<QueueEntry>,
    last_drawn: Option<WallpaperId>,
}

impl RotationQueue {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            album: None,
            entries: Vec::new(),
            last_drawn: None,
        }
    }

    /// Entries in draw order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not yet shown in the current cycle
    pub fn remaining(&self) -> usize {
        self.entries.iter().filter(|e| !e.consumed).count()
    }

    /// The most recently drawn wallpaper
    pub fn last_drawn(&self) -> Option<&WallpaperId> {
        self.last_drawn.as_ref()
    }

    /// What [`RotationQueue::next`] would return, without drawing
    pub fn peek(&self) -> Option<&WallpaperId> {
        self.entries
            .iter()
            .find(|e| !e.consumed)
            .map(|e| &e.wallpaper)
    }

    /// Draw the next wallpaper using the thread-local RNG
    pub fn next(
        &mut self,
        now: DateTime<Utc>,
        order: SelectionOrder,
    ) -> Result<WallpaperId, RotationError> {
        self.next_with(now, order, &mut rand::rng())
    }

    /// Draw the next wallpaper
    ///
    /// Returns [`RotationError::EmptyPool`] when the queue has no entries.
    pub fn next_with<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        order: SelectionOrder,
        rng: &mut R,
    ) -> Result<WallpaperId, RotationError> {
        if self.entries.is_empty() {
            return Err(RotationError::EmptyPool {
                target: self.target,
            });
        }
        if self.remaining() == 0 {
            self.reset(order, rng);
        }

        let Some(entry) = self.entries.iter_mut().find(|e| !e.consumed) else {
            return Err(RotationError::EmptyPool {
                target: self.target,
            });
        };
        entry.consumed = true;
        entry.last_shown_at = Some(now);
        let drawn = entry.wallpaper.clone();
        self.last_drawn = Some(drawn.clone());

        if self.remaining() == 0 {
            self.reset(order, rng);
        }
        Ok(drawn)
    }

    /// Regenerate the pool using the thread-local RNG
    pub fn rebuild(&mut self, album: &AlbumName, candidates: &[&Wallpaper], order: SelectionOrder) {
        self.rebuild_with(album, candidates, order, &mut rand::rng())
    }

    /// Regenerate the pool from the album's current candidates
    ///
    /// A different album discards all state. For the same album, surviving
    /// entries keep their consumed flag and new candidates join the unconsumed
    /// remainder.
    pub fn rebuild_with<R: Rng + ?Sized>(
        &mut self,
        album: &AlbumName,
        candidates: &[&Wallpaper],
        order: SelectionOrder,
        rng: &mut R,
    ) {
        if self.album.as_ref() != Some(album) {
            self.album = Some(album.clone());
            self.entries = candidates.iter().map(|w| QueueEntry::fresh(w)).collect();
            arrange(&mut self.entries, order, rng);
            self.avoid_repeat_at_front(rng);
            return;
        }

        let keys: HashMap<&WallpaperId, u64> =
            candidates.iter().map(|w| (&w.id, w.order_key)).collect();
        let known: HashSet<WallpaperId> = self
            .entries
            .iter()
            .map(|e| e.wallpaper.clone())
            .collect();

        let mut consumed = Vec::new();
        let mut remainder = Vec::new();
        for mut entry in std::mem::take(&mut self.entries) {
            let Some(key) = keys.get(&entry.wallpaper) else {
                continue;
            };
            entry.order_key = *key;
            if entry.consumed {
                consumed.push(entry);
            } else {
                remainder.push(entry);
            }
        }
        remainder.extend(
            candidates
                .iter()
                .filter(|w| !known.contains(&w.id))
                .map(|w| QueueEntry::fresh(w)),
        );

        if remainder.is_empty() {
            // Everything left was already shown this cycle
            self.entries = consumed;
            self.reset(order, rng);
            return;
        }

        arrange(&mut remainder, order, rng);
        consumed.extend(remainder);
        self.entries = consumed;
        if self.entries.iter().all(|e| !e.consumed) {
            self.avoid_repeat_at_front(rng);
        }
    }

    /// Remove deleted wallpapers
    ///
    /// Deterministic: no shuffling happens. If only consumed entries remain
    /// their flags are cleared in place. When the pool is left at the start
    /// of a cycle and the last drawn wallpaper moved to the front, it trades
    /// places with its successor. Returns how many entries were removed.
    pub fn prune(&mut self, removed: &[WallpaperId]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !removed.contains(&e.wallpaper));
        if !self.entries.is_empty() && self.remaining() == 0 {
            for entry in &mut self.entries {
                entry.consumed = false;
            }
        }
        if self.entries.len() >= 2
            && self.entries.iter().all(|e| !e.consumed)
            && self.last_drawn.as_ref() == Some(&self.entries[0].wallpaper)
        {
            self.entries.swap(0, 1);
        }
        before - self.entries.len()
    }

    /// Drop the pool and the album reference
    pub fn invalidate(&mut self) {
        self.album = None;
        self.entries.clear();
    }

    fn reset<R: Rng + ?Sized>(&mut self, order: SelectionOrder, rng: &mut R) {
        for entry in &mut self.entries {
            entry.consumed = false;
        }
        arrange(&mut self.entries, order, rng);
        self.avoid_repeat_at_front(rng);
    }

    /// Move the last drawn wallpaper away from the front of a fresh cycle
    fn avoid_repeat_at_front<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.entries.len() < 2 {
            return;
        }
        let Some(last) = &self.last_drawn else {
            return;
        };
        if &self.entries[0].wallpaper == last {
            let swap_with = rng.random_range(1..self.entries.len());
            self.entries.swap(0, swap_with);
        }
    }
}

fn arrange<R: Rng + ?Sized>(entries: &mut [QueueEntry], order: SelectionOrder, rng: &mut R) {
    match order {
        SelectionOrder::Shuffle => entries.shuffle(rng),
        SelectionOrder::Sequential => entries.sort_by_key(|e| e.order_key),
    }
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
