// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rota album` - Album and image management

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct AlbumArgs {
    #[command(subcommand)]
    pub command: AlbumCommand,
}

#[derive(Subcommand)]
pub enum AlbumCommand {
    /// List albums
    List,
    /// Show an album's folders and images
    Show {
        /// Album name
        name: String,
    },
    /// Create an empty album
    Create {
        /// Album name
        name: String,
    },
    /// Delete an album with its folders and images
    Delete {
        /// Album name
        name: String,
    },
    /// Add images to an album
    Add {
        /// Album name
        album: String,
        /// Image files
        #[arg(required = true)]
        images: Vec<String>,
    },
    /// Remove an image by id
    Remove {
        /// Image id (see `rota album show`)
        id: String,
    },
}

pub async fn handle(client: &DaemonClient, command: AlbumCommand, format: OutputFormat) -> Result<()> {
    match command {
        AlbumCommand::List => {
            let albums = client.list_albums().await?;
            output::print(&albums, format, |a| output::albums(a));
        }
        AlbumCommand::Show { name } => match client.get_album(&name).await? {
            Some(detail) => output::print(&detail, format, output::album_detail),
            None => anyhow::bail!("album not found: {}", name),
        },
        AlbumCommand::Create { name } => {
            let album = client.create_album(&name).await?;
            output::print(&album, format, |a| format!("Created album {}\n", a.name));
        }
        AlbumCommand::Delete { name } => {
            let report = client.delete_album(&name).await?;
            output::print(&report, format, output::removed);
        }
        AlbumCommand::Add { album, images } => {
            let mut added = Vec::new();
            for image in &images {
                added.push(client.add_image(&album, &absolute(image)).await?);
            }
            output::print(&added, format, |list| {
                list.iter()
                    .map(|w| format!("Added {}  {}\n", w.id, w.source))
                    .collect()
            });
        }
        AlbumCommand::Remove { id } => {
            let wallpaper = client.remove_image(&id).await?;
            output::print(&wallpaper, format, |w| {
                format!("Removed {} from {}\n", w.source, w.album)
            });
        }
    }
    Ok(())
}

/// Resolve a path against the CLI's working directory
///
/// The daemon runs elsewhere, so relative paths must not reach it.
pub fn absolute(path: &str) -> String {
    std::fs::canonicalize(path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string())
}
