// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rota folder` - Folder management

use anyhow::Result;
use clap::{Args, Subcommand};
use rota_core::{Folder, FolderSync};
use serde::Serialize;

use super::album::absolute;
use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Subcommand)]
pub enum FolderCommand {
    /// Add a directory of images to an album
    Add {
        /// Album name
        album: String,
        /// Directory to import
        path: String,
        /// Image shown for the folder in listings
        #[arg(long)]
        cover: Option<String>,
    },
    /// Remove a folder and its images
    Remove {
        /// Folder id (see `rota album show`)
        id: String,
    },
    /// Re-read a folder's directory
    Refresh {
        /// Folder id (see `rota album show`)
        id: String,
    },
}

#[derive(Serialize)]
struct FolderAdded<'a> {
    folder: &'a Folder,
    sync: &'a FolderSync,
}

fn sync_summary(sync: &FolderSync) -> String {
    format!(
        "{} image(s) added, {} removed\n",
        sync.added.len(),
        sync.removed.len()
    )
}

pub async fn handle(
    client: &DaemonClient,
    command: FolderCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        FolderCommand::Add { album, path, cover } => {
            let cover = cover.as_deref().map(absolute);
            let (folder, sync) = client.add_folder(&album, &absolute(&path), cover).await?;
            let added = FolderAdded {
                folder: &folder,
                sync: &sync,
            };
            output::print(&added, format, |a| {
                format!(
                    "Added folder {}  {}\n{}",
                    a.folder.id,
                    a.folder.source,
                    sync_summary(a.sync)
                )
            });
        }
        FolderCommand::Remove { id } => {
            let report = client.remove_folder(&id).await?;
            output::print(&report, format, output::removed);
        }
        FolderCommand::Refresh { id } => {
            let sync = client.refresh_folder(&id).await?;
            output::print(&sync, format, sync_summary);
        }
    }
    Ok(())
}
