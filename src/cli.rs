use clap::Args;
use std::path::PathBuf;
use tracing::info;
use yt_data_client::{DEFAULT_API_ADDRESS, YouTubeClient, YouTubeError};
use yt_oauth::{AuthError, FileCredentialStore, GoogleTokenProvider, OAuthConfig, authenticate};

/// Options shared by the tools that read the user's YouTube account
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// OAuth client secret JSON downloaded from Google Cloud Console
    #[arg(long, env = "YT_CLIENT_SECRET_PATH", default_value = "client_secret.json")]
    pub client_secret_path: PathBuf,

    /// Where the OAuth token is cached between runs
    #[arg(long, env = "YT_TOKEN_PATH", default_value = "token.json")]
    pub token_path: PathBuf,

    /// Loopback port for the OAuth callback (0 picks a free port)
    #[arg(long, default_value = "0")]
    pub callback_port: u16,

    /// Only print the authorization URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

impl AuthArgs {
    pub fn oauth_config(&self) -> OAuthConfig {
        let mut config = OAuthConfig::new(&self.client_secret_path);
        config.callback_port = self.callback_port;
        config.open_browser = !self.no_browser;
        config
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Client(#[from] YouTubeError),
}

/// REST API address from `YOUTUBE_API_ADDRESS`, or the production endpoint
pub fn youtube_api_address() -> String {
    std::env::var("YOUTUBE_API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string())
}

/// Authenticate (stored token, refresh, or browser consent) and build the API client
pub async fn connect(args: &AuthArgs) -> Result<YouTubeClient, ConnectError> {
    let store = FileCredentialStore::new(&args.token_path);
    let provider = GoogleTokenProvider::new(args.oauth_config());
    let token = authenticate(&store, &provider).await?;

    let address = youtube_api_address();
    info!("Using YouTube Data API at {}", address);
    Ok(YouTubeClient::new(address, token.access_token)?)
}
