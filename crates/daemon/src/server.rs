// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::time::Instant;

use rota_adapters::{MediaSource, NotifyAdapter, WallpaperSetter};
use rota_core::{Clock, IdGen};
use rota_daemon::protocol::{self, Query, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
use rota_engine::{Runtime, RuntimeError};
use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::ConnectionContext;

/// Handle a single client connection
///
/// Runs in its own task, so a slow request never holds up the event loop.
pub async fn handle_connection(
    ctx: ConnectionContext,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(&ctx.runtime, ctx.start_time, request).await;

    debug!("Sending response: {:?}", response);

    let written = protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await;
    if matches!(response, Response::ShuttingDown) {
        // A full channel means shutdown is already pending
        let _ = ctx.shutdown_tx.try_send(());
    }
    written.map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
///
/// Failures are reported to the client, never propagated.
pub async fn handle_request<S, M, N, C, I>(
    runtime: &Runtime<S, M, N, C, I>,
    start_time: Instant,
    request: Request,
) -> Response
where
    S: WallpaperSetter,
    M: MediaSource,
    N: NotifyAdapter,
    C: Clock + 'static,
    I: IdGen + 'static,
{
    match dispatch(runtime, start_time, request).await {
        Ok(response) => response,
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

async fn dispatch<S, M, N, C, I>(
    runtime: &Runtime<S, M, N, C, I>,
    start_time: Instant,
    request: Request,
) -> Result<Response, RuntimeError>
where
    S: WallpaperSetter,
    M: MediaSource,
    N: NotifyAdapter,
    C: Clock + 'static,
    I: IdGen + 'static,
{
    let response = match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => Response::Status {
            uptime_secs: start_time.elapsed().as_secs(),
            status: Box::new(runtime.status()),
        },

        Request::Shutdown => Response::ShuttingDown,

        Request::Query { query } => handle_query(runtime, query),

        Request::UpdateSchedule {
            target,
            enabled,
            interval_minutes,
        } => Response::Settings {
            settings: runtime
                .update_schedule(target, enabled, interval_minutes)
                .await?,
        },

        Request::SetEnabled { enabled } => Response::Settings {
            settings: runtime.set_enabled(enabled).await?,
        },

        Request::SetSynchronized { synchronized } => Response::Settings {
            settings: runtime.set_synchronized(synchronized).await?,
        },

        Request::SetSeparateSchedules { separate } => Response::Settings {
            settings: runtime.set_separate_schedules(separate).await?,
        },

        Request::SetScaling { target, scaling } => Response::Settings {
            settings: runtime.set_scaling(target, scaling).await?,
        },

        Request::AssignAlbum { target, album } => Response::Settings {
            settings: runtime.set_assigned_album(target, album).await?,
        },

        Request::RotateNow { target } => Response::Rotated {
            outcome: runtime.rotate_now(target).await?,
        },

        Request::CreateAlbum { name } => Response::AlbumCreated {
            album: runtime.create_album(&name).await?,
        },

        Request::DeleteAlbum { name } => Response::Removed {
            report: runtime.delete_album(&name).await?,
        },

        Request::AddImage { album, image } => Response::ImageAdded {
            wallpaper: runtime.add_image(&album, &image).await?,
        },

        Request::RemoveImage { id } => Response::ImageRemoved {
            wallpaper: runtime.remove_image(&id).await?,
        },

        Request::AddFolder {
            album,
            source,
            cover,
        } => {
            let (folder, sync) = runtime.add_folder(&album, &source, cover).await?;
            Response::FolderAdded { folder, sync }
        }

        Request::RemoveFolder { id } => Response::Removed {
            report: runtime.remove_folder(&id).await?,
        },

        Request::RefreshFolder { id } => Response::FolderRefreshed {
            sync: runtime.refresh_folder(&id).await?,
        },
    };
    Ok(response)
}

/// Handle query requests
fn handle_query<S, M, N, C, I>(runtime: &Runtime<S, M, N, C, I>, query: Query) -> Response
where
    S: WallpaperSetter,
    M: MediaSource,
    N: NotifyAdapter,
    C: Clock + 'static,
    I: IdGen + 'static,
{
    match query {
        Query::Settings => Response::Settings {
            settings: runtime.get_settings(),
        },

        Query::ListAlbums => Response::Albums {
            albums: runtime.list_albums(),
        },

        Query::GetAlbum { name } => Response::Album {
            album: runtime.album_detail(&name).ok().map(Box::new),
        },

        Query::Preview { target } => Response::Preview {
            next: runtime.preview_next(target),
        },
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
