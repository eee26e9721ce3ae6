use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use yt_playlist_tools::cli::{self, AuthArgs};
use yt_playlist_tools::{logging, sync};

/// Writes one Obsidian note per YouTube playlist of the authenticated account
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    auth: AuthArgs,

    /// Directory the playlist notes are written to (created if missing)
    #[arg(long, env = "OBSIDIAN_YOUTUBE_DIR", default_value = "youtube")]
    output_dir: PathBuf,
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let client = cli::connect(&args.auth).await?;

    match client.my_channel().await {
        Ok(Some(channel)) => info!("Authenticated as: {}", channel.title),
        Ok(None) => warn!("No channel found for the authenticated account"),
        Err(e) => warn!("Could not identify channel: {}", e),
    }

    let summary = sync::sync_playlists(&client, &args.output_dir).await?;

    if !summary.incomplete.is_empty() {
        warn!(
            "{} playlist(s) were written with incomplete video lists: {}",
            summary.incomplete.len(),
            summary.incomplete.join(", ")
        );
    }
    println!(
        "Successfully synced {} playlists to Obsidian.",
        summary.processed
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
