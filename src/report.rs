//! Console report for `list-playlists`.

use yt_data_client::{Channel, Playlist, Privacy};

pub fn channel_banner(channel: &Channel) -> String {
    format!(
        "\n=== Authenticated as Channel: {} ===\nChannel ID: {}\n{}\n",
        channel.title,
        channel.id,
        "=".repeat(42)
    )
}

/// Printed for each playlist as its page arrives
pub fn playlist_line(playlist: &Playlist) -> String {
    format!(
        "- [{}] {} ({} videos)",
        playlist.privacy, playlist.title, playlist.video_count
    )
}

/// Totals, then the unlisted playlists with their ids
pub fn render_summary(playlists: &[Playlist]) -> String {
    let unlisted: Vec<&Playlist> = playlists
        .iter()
        .filter(|p| p.privacy == Privacy::Unlisted)
        .collect();

    let mut lines = vec![
        String::new(),
        format!("Total playlists found: {}", playlists.len()),
        format!("Unlisted playlists: {}", unlisted.len()),
    ];
    lines.extend(
        unlisted
            .iter()
            .map(|p| format!("  - {} (ID: {})", p.title, p.id)),
    );

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}
