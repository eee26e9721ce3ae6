//! Shared pieces of the `list-playlists`, `sync-to-obsidian` and `assign-role` tools.

pub mod cli;
pub mod logging;
pub mod markdown;
pub mod report;
pub mod sync;
