use std::path::{Path, PathBuf};
use tracing::{error, info};
use yt_data_client::{YouTubeClient, YouTubeError, fetch_all};

use crate::markdown;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to list playlists: {0}")]
    Playlists(#[source] YouTubeError),

    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Notes written
    pub processed: usize,
    /// Playlists whose video listing failed part way; their notes hold what was fetched
    pub incomplete: Vec<String>,
}

pub fn prepare_output_dir(dir: &Path) -> Result<(), SyncError> {
    if !dir.exists() {
        info!("Creating directory: {}", dir.display());
    }
    std::fs::create_dir_all(dir).map_err(|source| SyncError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write one note per playlist of the authenticated account.
///
/// Failing to list the playlists ends the run. Failing to list one playlist's videos is
/// logged, and that playlist is written with the videos fetched before the failure.
pub async fn sync_playlists(
    client: &YouTubeClient,
    output_dir: &Path,
) -> Result<SyncSummary, SyncError> {
    prepare_output_dir(output_dir)?;
    info!("Syncing playlists to: {}", output_dir.display());

    let playlists = fetch_all(&mut client.my_playlists())
        .await
        .map_err(|partial| SyncError::Playlists(partial.error))?;

    let mut summary = SyncSummary::default();

    for playlist in &playlists {
        info!("Processing: {} ({})", playlist.title, playlist.privacy);

        let videos = match fetch_all(&mut client.playlist_items(&playlist.id)).await {
            Ok(videos) => videos,
            Err(partial) => {
                error!(
                    "Error fetching videos for playlist {}: {}",
                    playlist.id, partial
                );
                summary.incomplete.push(playlist.id.clone());
                partial.items
            }
        };

        markdown::write_playlist(output_dir, playlist, &videos).map_err(|source| {
            SyncError::Write {
                path: output_dir.join(markdown::file_name(playlist)),
                source,
            }
        })?;
        summary.processed += 1;
    }

    Ok(summary)
}
