use clap::Parser;
use ms_graph::{GraphCredentials, GraphEndpoints, assign_role};
use std::process::ExitCode;
use tracing::error;
use yt_playlist_tools::logging;

/// Assigns an activated Microsoft Entra directory role to a user through Microsoft Graph.
///
/// Reads AZURE_CLIENT_ID, AZURE_CLIENT_SECRET and AZURE_TENANT_ID from the environment.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    after_help = "Example:\n  assign-role user@example.com \"Global Administrator\""
)]
struct Args {
    /// Email (user principal name) of the user receiving the role
    user_email: String,

    /// Display name of the directory role, matched exactly
    role_name: String,
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = GraphCredentials::from_env()?;
    let endpoints = GraphEndpoints::from_env();

    assign_role(&credentials, &endpoints, &args.user_email, &args.role_name).await?;

    println!("Role assigned successfully.");
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
