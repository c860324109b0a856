// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! One JSON entry per line: a sequence number, the operation and a CRC32 of
//! the serialized operation. Lines that fail to parse or verify (typically a
//! torn final write) are skipped on replay.

use rota_core::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write-ahead log for durable operation storage
pub struct Wal {
    path: PathBuf,
    file: File,
    sequence: u64,
    entries: usize,
}

impl Wal {
    /// Open or create a WAL at the given path
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let existing = read_entries(path)?;
        let sequence = existing.iter().map(|e| e.seq).max().unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sequence,
            entries: existing.len(),
        })
    }

    /// Append an operation to the log
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        self.sequence += 1;
        let entry = WalEntry::new(self.sequence, op.clone())?;
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        self.entries += 1;
        Ok(self.sequence)
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Number of valid entries in the log
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the log contents with `ops`
    ///
    /// Written to a sibling file and renamed into place, so a crash leaves
    /// either the old or the new log. Sequence numbers keep increasing.
    pub fn rewrite(&mut self, ops: &[Operation]) -> Result<(), WalError> {
        let tmp = self.path.with_extension("wal.tmp");
        {
            let mut out = File::create(&tmp)?;
            let mut sequence = self.sequence;
            for op in ops {
                sequence += 1;
                let entry = WalEntry::new(sequence, op.clone())?;
                writeln!(out, "{}", serde_json::to_string(&entry)?)?;
            }
            out.sync_all()?;
            self.sequence = sequence;
        }
        fs::rename(&tmp, &self.path)?;

        self.file = OpenOptions::new().append(true).read(true).open(&self.path)?;
        self.entries = ops.len();
        tracing::info!(
            path = %self.path.display(),
            entries = self.entries,
            "wal rewritten"
        );
        Ok(())
    }

    /// Replay all operations from the log
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        Ok(read_entries(path)?.into_iter().map(|e| e.op).collect())
    }
}

fn read_entries(path: &Path) -> Result<Vec<WalEntry>, WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<WalEntry>(&line) {
            Ok(entry) if entry.verify() => entries.push(entry),
            Ok(entry) => {
                tracing::warn!(line = index + 1, seq = entry.seq, "wal checksum mismatch, skipping");
            }
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "corrupt wal entry, skipping");
            }
        }
    }

    Ok(entries)
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    op: Operation,
    crc: u32,
}

impl WalEntry {
    fn new(seq: u64, op: Operation) -> Result<Self, serde_json::Error> {
        let crc = checksum(&op)?;
        Ok(Self { seq, op, crc })
    }

    fn verify(&self) -> bool {
        checksum(&self.op).is_ok_and(|crc| crc == self.crc)
    }
}

fn checksum(op: &Operation) -> Result<u32, serde_json::Error> {
    let json = serde_json::to_string(op)?;
    Ok(crc32fast::hash(json.as_bytes()))
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
