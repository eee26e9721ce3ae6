use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yt_oauth::{
    ClientSecret, CredentialStore, FileCredentialStore, OAuthConfig, start_auth_flow,
};

/// OAuth 2.0 helper tool: authorizes read-only YouTube access and writes the token file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the OAuth client secret JSON from Google Cloud Console
    #[arg(long, env = "YT_CLIENT_SECRET_PATH", default_value = "client_secret.json")]
    client_secret_path: String,

    /// Path to save the OAuth token file
    #[arg(long, env = "YT_TOKEN_PATH", default_value = "token.json")]
    token_path: String,

    /// Loopback port for the OAuth callback (0 picks a free port)
    #[arg(long, default_value = "0")]
    callback_port: u16,

    /// Only print the authorization URL instead of opening a browser
    #[arg(long)]
    no_browser: bool,
}

async fn run(args: Args) -> Result<(), yt_oauth::AuthError> {
    let mut config = OAuthConfig::new(&args.client_secret_path);
    config.callback_port = args.callback_port;
    config.open_browser = !args.no_browser;

    let secret = ClientSecret::load_from_file(&config.client_secret_path)?;
    let token = start_auth_flow(&reqwest::Client::new(), &secret, &config).await?;

    FileCredentialStore::new(&args.token_path).save(&token)?;

    eprintln!("\nOAuth token saved to: {}", args.token_path);
    eprintln!("You can now use this token with list-playlists and sync-to-obsidian");

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
