use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(
        "client secret file '{}' not found. Download your OAuth 2.0 Client ID JSON from \
         Google Cloud Console and save it as '{}'",
        .path.display(),
        .path.display()
    )]
    MissingClientSecret { path: PathBuf },

    #[error("failed to read client secret file '{}': {reason}", .path.display())]
    InvalidClientSecret { path: PathBuf, reason: String },

    #[error("failed to update credential file '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send token request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    TokenRequest {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("stored credential has no refresh token")]
    NoRefreshToken,

    #[error("authorization failed: {0}")]
    AuthorizationDenied(String),

    #[error("OAuth authorization timeout ({0} seconds)")]
    Timeout(u64),

    #[error("failed to start OAuth callback server: {0}")]
    CallbackServer(#[source] std::io::Error),
}
