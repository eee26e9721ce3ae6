use clap::Parser;
use std::process::ExitCode;
use tracing::{error, warn};
use yt_data_client::fetch_all_with;
use yt_playlist_tools::cli::{self, AuthArgs};
use yt_playlist_tools::{logging, report};

/// Lists every playlist of the authenticated YouTube account and highlights the unlisted ones
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    auth: AuthArgs,
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let client = cli::connect(&args.auth).await?;

    match client.my_channel().await {
        Ok(Some(channel)) => println!("{}", report::channel_banner(&channel)),
        Ok(None) => warn!("No channel found for the authenticated account"),
        Err(e) => warn!("Could not identify channel: {}", e),
    }

    println!("Fetching playlists...");
    let playlists = fetch_all_with(&mut client.my_playlists(), |page| {
        for playlist in page {
            println!("{}", report::playlist_line(playlist));
        }
    })
    .await
    .map_err(|partial| partial.error)?;

    print!("{}", report::render_summary(&playlists));
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
