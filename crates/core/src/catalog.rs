// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Media catalog: albums, folders and wallpapers
//!
//! The catalog is a small relational store held in memory. Foreign keys and
//! cascade rules are enforced by its own operations:
//!
//! - deleting an album deletes its folders and wallpapers
//! - deleting a folder deletes the wallpapers materialized from it
//!
//! Every delete returns a [`CascadeReport`] so callers can invalidate rotation
//! queues that referenced the removed rows.

use crate::id::IdGen;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable, unique album name (the album's identity)
    AlbumName
);
string_id!(
    /// Identifier of a wallpaper row
    WallpaperId
);
string_id!(
    /// Identifier of a folder row
    FolderId
);

/// A user-curated collection of images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: AlbumName,
    pub created_at: DateTime<Utc>,
    /// Next ordering key to hand out; keys are never reused within an album
    #[serde(default)]
    pub next_order_key: u64,
}

/// A directory of images imported into an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub album: AlbumName,
    pub source: String,
    pub cover: Option<String>,
    /// Snapshot of the folder's contents at `refreshed_at`
    pub cached_images: Option<Vec<String>>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// A single image belonging to an album, directly or through a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallpaper {
    pub id: WallpaperId,
    pub album: AlbumName,
    pub folder: Option<FolderId>,
    pub source: String,
    pub order_key: u64,
}

impl Wallpaper {
    /// Whether this image was added to the album directly
    pub fn is_direct(&self) -> bool {
        self.folder.is_none()
    }
}

/// One image of a folder snapshot, with the wallpaper id it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderImage {
    pub id: WallpaperId,
    pub source: String,
}

/// Rows removed by a delete, including cascaded children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub album: Option<AlbumName>,
    pub folders: Vec<FolderId>,
    pub wallpapers: Vec<WallpaperId>,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.album.is_none() && self.folders.is_empty() && self.wallpapers.is_empty()
    }
}

/// Outcome of synchronizing a folder snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSync {
    pub added: Vec<WallpaperId>,
    pub removed: Vec<WallpaperId>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid album name: {0:?}")]
    InvalidName(String),
    #[error("album already exists: {0}")]
    AlbumExists(AlbumName),
    #[error("album not found: {0}")]
    AlbumNotFound(AlbumName),
    #[error("folder not found: {0}")]
    FolderNotFound(FolderId),
    #[error("wallpaper not found: {0}")]
    WallpaperNotFound(WallpaperId),
    #[error("image already in album {album}: {path}")]
    DuplicateImage { album: AlbumName, path: String },
    #[error("folder already in album {album}: {path}")]
    DuplicateFolder { album: AlbumName, path: String },
}

/// Normalized store of albums, folders and wallpapers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    albums: BTreeMap<AlbumName, Album>,
    folders: BTreeMap<FolderId, Folder>,
    wallpapers: BTreeMap<WallpaperId, Wallpaper>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Albums ====================

    /// Create an empty album
    pub fn create_album(
        &mut self,
        name: AlbumName,
        created_at: DateTime<Utc>,
    ) -> Result<&Album, CatalogError> {
        let trimmed = name.as_str().trim();
        if trimmed.is_empty() || trimmed.len() != name.as_str().len() {
            return Err(CatalogError::InvalidName(name.0));
        }
        if self.albums.contains_key(&name) {
            return Err(CatalogError::AlbumExists(name));
        }
        let album = self.albums.entry(name.clone()).or_insert(Album {
            name,
            created_at,
            next_order_key: 0,
        });
        Ok(album)
    }

    pub fn album(&self, name: &AlbumName) -> Option<&Album> {
        self.albums.get(name)
    }

    pub fn contains_album(&self, name: &AlbumName) -> bool {
        self.albums.contains_key(name)
    }

    /// Iterate over albums in name order
    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.values()
    }

    /// Delete an album and everything it owns
    pub fn delete_album(&mut self, name: &AlbumName) -> Result<CascadeReport, CatalogError> {
        if self.albums.remove(name).is_none() {
            return Err(CatalogError::AlbumNotFound(name.clone()));
        }

        let folders: Vec<FolderId> = self
            .folders
            .values()
            .filter(|f| &f.album == name)
            .map(|f| f.id.clone())
            .collect();
        for id in &folders {
            self.folders.remove(id);
        }

        let wallpapers: Vec<WallpaperId> = self
            .wallpapers
            .values()
            .filter(|w| &w.album == name)
            .map(|w| w.id.clone())
            .collect();
        for id in &wallpapers {
            self.wallpapers.remove(id);
        }

        Ok(CascadeReport {
            album: Some(name.clone()),
            folders,
            wallpapers,
        })
    }

    // ==================== Wallpapers ====================

    /// Add a direct image to an album
    pub fn add_wallpaper(
        &mut self,
        id: WallpaperId,
        album: &AlbumName,
        source: impl Into<String>,
    ) -> Result<&Wallpaper, CatalogError> {
        let source = source.into();
        if !self.albums.contains_key(album) {
            return Err(CatalogError::AlbumNotFound(album.clone()));
        }
        if self
            .wallpapers
            .values()
            .any(|w| &w.album == album && w.is_direct() && w.source == source)
        {
            return Err(CatalogError::DuplicateImage {
                album: album.clone(),
                path: source,
            });
        }
        let order_key = self.allocate_order_key(album)?;
        let wallpaper = self.wallpapers.entry(id.clone()).or_insert(Wallpaper {
            id,
            album: album.clone(),
            folder: None,
            source,
            order_key,
        });
        Ok(wallpaper)
    }

    /// Remove a single wallpaper
    ///
    /// Removing a folder-contained image only lasts until the folder is
    /// synchronized again.
    pub fn remove_wallpaper(&mut self, id: &WallpaperId) -> Result<Wallpaper, CatalogError> {
        self.wallpapers
            .remove(id)
            .ok_or_else(|| CatalogError::WallpaperNotFound(id.clone()))
    }

    pub fn wallpaper(&self, id: &WallpaperId) -> Option<&Wallpaper> {
        self.wallpapers.get(id)
    }

    /// All wallpapers of an album ordered by ordering key
    pub fn wallpapers_in(&self, album: &AlbumName) -> Vec<&Wallpaper> {
        let mut wallpapers: Vec<&Wallpaper> = self
            .wallpapers
            .values()
            .filter(|w| &w.album == album)
            .collect();
        wallpapers.sort_by_key(|w| w.order_key);
        wallpapers
    }

    /// Resolve an album into its candidate pool
    ///
    /// Direct and folder-contained wallpapers are flattened into one sequence
    /// ordered by ordering key. Images rejected by `is_accessible` are left out;
    /// the result is empty only when nothing in the album resolves.
    pub fn resolve_candidates<F>(
        &self,
        album: &AlbumName,
        is_accessible: F,
    ) -> Result<Vec<&Wallpaper>, CatalogError>
    where
        F: Fn(&Wallpaper) -> bool,
    {
        if !self.albums.contains_key(album) {
            return Err(CatalogError::AlbumNotFound(album.clone()));
        }
        Ok(self
            .wallpapers_in(album)
            .into_iter()
            .filter(|w| is_accessible(w))
            .collect())
    }

    fn allocate_order_key(&mut self, album: &AlbumName) -> Result<u64, CatalogError> {
        let entry = self
            .albums
            .get_mut(album)
            .ok_or_else(|| CatalogError::AlbumNotFound(album.clone()))?;
        let key = entry.next_order_key;
        entry.next_order_key += 1;
        Ok(key)
    }

    // ==================== Folders ====================

    /// Register a folder with an album; its contents arrive via [`Catalog::sync_folder`]
    pub fn add_folder(
        &mut self,
        id: FolderId,
        album: &AlbumName,
        source: impl Into<String>,
        cover: Option<String>,
    ) -> Result<&Folder, CatalogError> {
        let source = source.into();
        if !self.albums.contains_key(album) {
            return Err(CatalogError::AlbumNotFound(album.clone()));
        }
        if self
            .folders
            .values()
            .any(|f| &f.album == album && f.source == source)
        {
            return Err(CatalogError::DuplicateFolder {
                album: album.clone(),
                path: source,
            });
        }
        let folder = self.folders.entry(id.clone()).or_insert(Folder {
            id,
            album: album.clone(),
            source,
            cover,
            cached_images: None,
            refreshed_at: None,
        });
        Ok(folder)
    }

    /// Remove a folder and the wallpapers materialized from it
    pub fn remove_folder(&mut self, id: &FolderId) -> Result<CascadeReport, CatalogError> {
        if self.folders.remove(id).is_none() {
            return Err(CatalogError::FolderNotFound(id.clone()));
        }
        let wallpapers: Vec<WallpaperId> = self
            .wallpapers
            .values()
            .filter(|w| w.folder.as_ref() == Some(id))
            .map(|w| w.id.clone())
            .collect();
        for wallpaper in &wallpapers {
            self.wallpapers.remove(wallpaper);
        }
        Ok(CascadeReport {
            album: None,
            folders: vec![id.clone()],
            wallpapers,
        })
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Folders of an album in id order
    pub fn folders_in(&self, album: &AlbumName) -> Vec<&Folder> {
        self.folders.values().filter(|f| &f.album == album).collect()
    }

    /// Iterate over every folder
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    /// Map a fresh folder listing onto wallpaper ids
    ///
    /// Images already materialized keep their id; new ones get a generated id.
    pub fn plan_folder_sync(
        &self,
        id: &FolderId,
        sources: Vec<String>,
        id_gen: &impl IdGen,
    ) -> Result<Vec<FolderImage>, CatalogError> {
        if !self.folders.contains_key(id) {
            return Err(CatalogError::FolderNotFound(id.clone()));
        }
        let existing: HashMap<&str, &WallpaperId> = self
            .wallpapers
            .values()
            .filter(|w| w.folder.as_ref() == Some(id))
            .map(|w| (w.source.as_str(), &w.id))
            .collect();

        let mut seen = std::collections::HashSet::new();
        let images = sources
            .into_iter()
            .filter(|source| seen.insert(source.clone()))
            .map(|source| {
                let id = existing
                    .get(source.as_str())
                    .map(|id| (*id).clone())
                    .unwrap_or_else(|| WallpaperId::new(id_gen.next("wp")));
                FolderImage { id, source }
            })
            .collect();
        Ok(images)
    }

    /// Replace a folder's snapshot and materialized wallpapers
    ///
    /// Wallpapers whose id is still listed keep their ordering key; new ones
    /// are appended in listing order; the rest are removed.
    pub fn sync_folder(
        &mut self,
        id: &FolderId,
        images: &[FolderImage],
        at: DateTime<Utc>,
    ) -> Result<FolderSync, CatalogError> {
        let album = match self.folders.get_mut(id) {
            Some(folder) => {
                folder.cached_images = Some(images.iter().map(|i| i.source.clone()).collect());
                folder.refreshed_at = Some(at);
                folder.album.clone()
            }
            None => return Err(CatalogError::FolderNotFound(id.clone())),
        };

        let removed: Vec<WallpaperId> = self
            .wallpapers
            .values()
            .filter(|w| w.folder.as_ref() == Some(id))
            .filter(|w| !images.iter().any(|i| i.id == w.id))
            .map(|w| w.id.clone())
            .collect();
        for wallpaper in &removed {
            self.wallpapers.remove(wallpaper);
        }

        let mut added = Vec::new();
        for image in images {
            if self.wallpapers.contains_key(&image.id) {
                continue;
            }
            let order_key = self.allocate_order_key(&album)?;
            self.wallpapers.insert(
                image.id.clone(),
                Wallpaper {
                    id: image.id.clone(),
                    album: album.clone(),
                    folder: Some(id.clone()),
                    source: image.source.clone(),
                    order_key,
                },
            );
            added.push(image.id.clone());
        }

        Ok(FolderSync { added, removed })
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
