//! Obsidian note rendering for a playlist.

use std::path::{Path, PathBuf};
use yt_data_client::{Playlist, Video};

pub const FILE_EXTENSION: &str = "md";

/// Characters that are not allowed in file names on at least one common platform
const UNSAFE_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace each unsafe character with `_`, one for one
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

pub fn file_name(playlist: &Playlist) -> String {
    format!("{}.{}", sanitize_filename(&playlist.title), FILE_EXTENSION)
}

/// Brackets would terminate the link text early
pub fn link_title(title: &str) -> String {
    title.replace('[', "(").replace(']', ")")
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

pub fn render_playlist(playlist: &Playlist, videos: &[Video]) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("id: {}", playlist.id),
        format!("title: \"{}\"", playlist.title),
        format!("privacy: {}", playlist.privacy),
        format!("video_count: {}", videos.len()),
        format!("url: {}", playlist_url(&playlist.id)),
        "type: youtube-playlist".to_string(),
        "---".to_string(),
        String::new(),
        format!("# {}", playlist.title),
        String::new(),
        format!("**Privacy:** {}", playlist.privacy),
        format!("**Total Videos:** {}", videos.len()),
        String::new(),
        "## Videos".to_string(),
        String::new(),
    ];

    lines.extend(
        videos
            .iter()
            .map(|video| format!("- [{}]({})", link_title(&video.title), watch_url(&video.id))),
    );

    lines.join("\n")
}

/// Write the note into `dir`, replacing any previous version
pub fn write_playlist(
    dir: &Path,
    playlist: &Playlist,
    videos: &[Video],
) -> std::io::Result<PathBuf> {
    let path = dir.join(file_name(playlist));
    std::fs::write(&path, render_playlist(playlist, videos))?;
    Ok(path)
}
