use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

mod client_secret;
mod credential;
mod error;
mod flow;

pub use client_secret::ClientSecret;
pub use credential::{
    CredentialState, CredentialStore, FileCredentialStore, NextAction, TokenProvider,
    authenticate, next_action,
};
pub use error::AuthError;
pub use flow::{
    GoogleTokenProvider, exchange_code, generate_auth_url, generate_pkce, refresh_token,
    start_auth_flow,
};

/// Read-only access to the authenticated account's YouTube data
pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Default Google token endpoint, used when the client secret omits `token_uri`
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Default Google authorization endpoint
pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Tokens expiring within this many seconds are treated as expired
const EXPIRY_MARGIN_SECS: u64 = 60;

/// OAuth 2.0 token information, as persisted to `token.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token for getting new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expiry time as Unix timestamp (seconds since epoch)
    pub expires_at: u64,
    /// Client the token was issued to; needed to refresh without `client_secret.json`
    pub client_id: String,
    pub client_secret: String,
    /// Endpoint the token is refreshed against
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Scopes granted with this token
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl OAuthToken {
    /// Check if the token is expired or will expire soon (within 60 seconds)
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }
}

/// OAuth configuration for the interactive flow
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Path to the client secret JSON downloaded from Google Cloud Console
    pub client_secret_path: PathBuf,
    /// OAuth scope(s)
    pub scopes: Vec<String>,
    /// Loopback port for the OAuth callback; 0 lets the OS choose
    pub callback_port: u16,
    /// Try to open the authorization URL in the default browser
    pub open_browser: bool,
}

impl OAuthConfig {
    /// Create new OAuth configuration with read-only YouTube defaults
    pub fn new(client_secret_path: impl Into<PathBuf>) -> Self {
        Self {
            client_secret_path: client_secret_path.into(),
            scopes: vec![YOUTUBE_READONLY_SCOPE.to_string()],
            callback_port: 0,
            open_browser: true,
        }
    }

    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}
