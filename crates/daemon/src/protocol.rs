// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between `rota` and `rotad`
//!
//! Each message is a JSON document preceded by its length as a big-endian
//! `u32`. A connection carries exactly one request and one response.

use std::time::Duration;

use rota_core::{
    Album, AlbumName, CascadeReport, Folder, FolderId, FolderSync, ScalingPolicy,
    ScheduleSettings, Target, Wallpaper, WallpaperId,
};
use rota_engine::{AlbumDetail, AlbumSummary, Drawn, RotationOutcome, RuntimeStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Version reported in the hello handshake
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default read/write timeout on the daemon side
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single frame
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Requests from the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    Ping,
    Hello {
        version: String,
    },
    Status,
    Shutdown,
    Query {
        query: Query,
    },

    // Schedule
    UpdateSchedule {
        target: Target,
        enabled: Option<bool>,
        interval_minutes: Option<u32>,
    },
    SetEnabled {
        enabled: bool,
    },
    SetSynchronized {
        synchronized: bool,
    },
    SetSeparateSchedules {
        separate: bool,
    },
    SetScaling {
        target: Target,
        scaling: ScalingPolicy,
    },
    AssignAlbum {
        target: Target,
        album: Option<AlbumName>,
    },

    // Rotation
    RotateNow {
        target: Target,
    },

    // Catalog
    CreateAlbum {
        name: String,
    },
    DeleteAlbum {
        name: AlbumName,
    },
    AddImage {
        album: AlbumName,
        image: String,
    },
    RemoveImage {
        id: WallpaperId,
    },
    AddFolder {
        album: AlbumName,
        source: String,
        cover: Option<String>,
    },
    RemoveFolder {
        id: FolderId,
    },
    RefreshFolder {
        id: FolderId,
    },
}

/// Read-only requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query")]
pub enum Query {
    Settings,
    ListAlbums,
    GetAlbum { name: AlbumName },
    Preview { target: Target },
}

/// Responses from the daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Pong,
    Hello {
        version: String,
    },
    ShuttingDown,
    Error {
        message: String,
    },
    Status {
        uptime_secs: u64,
        status: Box<RuntimeStatus>,
    },
    Settings {
        settings: ScheduleSettings,
    },
    Rotated {
        outcome: RotationOutcome,
    },
    Preview {
        next: Option<Drawn>,
    },
    Albums {
        albums: Vec<AlbumSummary>,
    },
    Album {
        album: Option<Box<AlbumDetail>>,
    },
    AlbumCreated {
        album: Album,
    },
    Removed {
        report: CascadeReport,
    },
    ImageAdded {
        wallpaper: Wallpaper,
    },
    ImageRemoved {
        wallpaper: Wallpaper,
    },
    FolderAdded {
        folder: Folder,
        sync: FolderSync,
    },
    FolderRefreshed {
        sync: FolderSync,
    },
}

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,
}

/// Serialize a message to JSON (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Deserialize a message from JSON (no length prefix)
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write one length-prefixed frame
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    data: &[u8],
) -> Result<(), ProtocolError> {
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: data.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    let len = u32::try_from(data.len()).map_err(|_| ProtocolError::MessageTooLarge {
        size: data.len(),
        max: MAX_MESSAGE_SIZE,
    })?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut prefix = [0u8; 4];
    match reader.read_exact(&mut prefix).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;
    Ok(data)
}

/// Read and decode a request, giving up after `timeout`
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError> {
    let bytes = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

/// Encode and write a response, giving up after `timeout`
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
