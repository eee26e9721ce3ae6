use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::credential::TokenProvider;
use crate::{AuthError, ClientSecret, OAuthConfig, OAuthToken, unix_now};

const CALLBACK_PATH: &str = "/oauth2callback";

/// How long to wait for the user to finish the consent screen
const AUTHORIZATION_TIMEOUT_SECS: u64 = 300;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn expires_at(&self) -> u64 {
        unix_now().saturating_add(self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS))
    }

    fn scopes(&self) -> Option<Vec<String>> {
        self.scope
            .as_ref()
            .map(|s| s.split_whitespace().map(String::from).collect())
    }
}

async fn request_token(
    http: &reqwest::Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let response = http.post(token_uri).form(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await?;
        return Err(AuthError::TokenRequest { status, body });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))
}

/// Generate PKCE verifier and challenge
pub fn generate_pkce() -> (String, String) {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use rand::Rng;
    use rand::distributions::Alphanumeric;
    use sha2::{Digest, Sha256};

    let verifier: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    // challenge = base64url(SHA256(verifier))
    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    (verifier, challenge)
}

/// Generate authorization URL, returning it along with the PKCE verifier
pub fn generate_auth_url(
    secret: &ClientSecret,
    redirect_uri: &str,
    scope: &str,
) -> (String, String) {
    let (verifier, challenge) = generate_pkce();

    let auth_url = format!(
        "{}?\
        client_id={}&\
        redirect_uri={}&\
        response_type=code&\
        scope={}&\
        code_challenge={}&\
        code_challenge_method=S256&\
        access_type=offline&\
        prompt=consent",
        secret.auth_uri,
        urlencoding::encode(&secret.client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(scope),
        urlencoding::encode(&challenge),
    );

    (auth_url, verifier)
}

/// Exchange authorization code for tokens
pub async fn exchange_code(
    http: &reqwest::Client,
    secret: &ClientSecret,
    code: &str,
    verifier: &str,
    redirect_uri: &str,
    scopes: &[String],
) -> Result<OAuthToken, AuthError> {
    info!("Exchanging authorization code for tokens...");

    let params = [
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri),
    ];
    let response = request_token(http, &secret.token_uri, &params).await?;

    let token = OAuthToken {
        expires_at: response.expires_at(),
        scopes: response.scopes().unwrap_or_else(|| scopes.to_vec()),
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        client_id: secret.client_id.clone(),
        client_secret: secret.client_secret.clone(),
        token_uri: secret.token_uri.clone(),
    };

    info!("Successfully obtained OAuth tokens");
    Ok(token)
}

/// Refresh the access token using the refresh token
pub async fn refresh_token(
    http: &reqwest::Client,
    current: &OAuthToken,
) -> Result<OAuthToken, AuthError> {
    let refresh = current
        .refresh_token
        .as_deref()
        .ok_or(AuthError::NoRefreshToken)?;

    let params = [
        ("client_id", current.client_id.as_str()),
        ("client_secret", current.client_secret.as_str()),
        ("refresh_token", refresh),
        ("grant_type", "refresh_token"),
    ];
    let response = request_token(http, &current.token_uri, &params).await?;

    let token = OAuthToken {
        expires_at: response.expires_at(),
        scopes: response.scopes().unwrap_or_else(|| current.scopes.clone()),
        access_token: response.access_token,
        // Google only returns a new refresh token occasionally
        refresh_token: response.refresh_token.or_else(|| current.refresh_token.clone()),
        token_type: response.token_type.unwrap_or_else(|| current.token_type.clone()),
        client_id: current.client_id.clone(),
        client_secret: current.client_secret.clone(),
        token_uri: current.token_uri.clone(),
    };

    info!("OAuth token refreshed successfully");
    Ok(token)
}

/// Start OAuth flow with local callback server
pub async fn start_auth_flow(
    http: &reqwest::Client,
    secret: &ClientSecret,
    config: &OAuthConfig,
) -> Result<OAuthToken, AuthError> {
    use axum::{
        Router,
        extract::Query,
        response::{Html, IntoResponse},
        routing::get,
    };

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.callback_port))
        .await
        .map_err(AuthError::CallbackServer)?;
    let port = listener
        .local_addr()
        .map_err(AuthError::CallbackServer)?
        .port();
    let redirect_uri = format!("http://127.0.0.1:{}{}", port, CALLBACK_PATH);

    let (auth_url, verifier) = generate_auth_url(secret, &redirect_uri, &config.scope_string());

    eprintln!("\n=================================================");
    eprintln!("OAuth 2.0 Authorization Required");
    eprintln!("=================================================");
    eprintln!("\nPlease visit the following URL to authorize the application:\n");
    eprintln!("{}\n", auth_url);
    eprintln!("Waiting for authorization...");
    eprintln!("=================================================\n");

    if config.open_browser {
        if let Err(e) = webbrowser::open(&auth_url) {
            warn!("Could not open a browser, use the URL above instead: {}", e);
        }
    }

    #[derive(Deserialize)]
    struct AuthCallback {
        code: Option<String>,
        error: Option<String>,
    }

    // Ok(code) or Err(provider error), whichever the callback delivers first
    let outcome = Arc::new(Mutex::new(None::<Result<String, String>>));
    let outcome_clone = outcome.clone();

    let callback_handler = move |Query(params): Query<AuthCallback>| async move {
        if let Some(error) = params.error {
            let page = format!(
                "<html><body><h1>Authorization Failed</h1><p>Error: {}</p>\
                <p>You can close this window.</p></body></html>",
                error
            );
            let mut slot = outcome_clone.lock().await;
            if slot.is_none() {
                *slot = Some(Err(error));
            }
            return Html(page).into_response();
        }

        if let Some(code) = params.code {
            let mut slot = outcome_clone.lock().await;
            if slot.is_none() {
                *slot = Some(Ok(code));
            }
            return Html(
                "<html><body><h1>Authorization Successful!</h1>\
                <p>You can close this window and return to the application.</p></body></html>",
            )
            .into_response();
        }

        Html("<html><body><h1>Authorization Failed</h1><p>No code received</p></body></html>")
            .into_response()
    };

    let app = Router::new().route(CALLBACK_PATH, get(callback_handler));
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let timeout = tokio::time::Duration::from_secs(AUTHORIZATION_TIMEOUT_SECS);
    let start = tokio::time::Instant::now();

    let result = loop {
        if start.elapsed() > timeout {
            break Err(AuthError::Timeout(AUTHORIZATION_TIMEOUT_SECS));
        }

        if let Some(received) = outcome.lock().await.clone() {
            break received.map_err(AuthError::AuthorizationDenied);
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    };

    server_handle.abort();

    let code = result?;
    exchange_code(http, secret, &code, &verifier, &redirect_uri, &config.scopes).await
}

/// Talks to Google's OAuth endpoints on behalf of [`crate::authenticate`]
pub struct GoogleTokenProvider {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl GoogleTokenProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl TokenProvider for GoogleTokenProvider {
    async fn refresh(&self, token: &OAuthToken) -> Result<OAuthToken, AuthError> {
        info!("Access token expired, refreshing...");
        refresh_token(&self.http, token).await
    }

    async fn authorize(&self) -> Result<OAuthToken, AuthError> {
        // Checked before anything interactive happens
        let secret = ClientSecret::load_from_file(&self.config.client_secret_path)?;
        start_auth_flow(&self.http, &secret, &self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> ClientSecret {
        ClientSecret {
            client_id: "id 1".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: crate::GOOGLE_AUTH_URI.to_string(),
            token_uri: crate::GOOGLE_TOKEN_URI.to_string(),
        }
    }

    #[test]
    fn test_pkce_challenge_matches_verifier() {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use sha2::{Digest, Sha256};

        let (verifier, challenge) = generate_pkce();
        assert_eq!(verifier.len(), 64);
        assert_eq!(
            challenge,
            URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
        );
    }

    #[test]
    fn test_auth_url_is_encoded() {
        let (url, verifier) = generate_auth_url(
            &secret(),
            "http://127.0.0.1:4242/oauth2callback",
            crate::YOUTUBE_READONLY_SCOPE,
        );
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?client_id=id%201&"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A4242%2Foauth2callback"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fyoutube.readonly"));
        assert!(url.contains("access_type=offline"));
        assert!(!url.contains(&verifier));
    }

    #[test]
    fn test_token_response_scopes() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "scope": "one two"}"#).unwrap();
        assert_eq!(
            response.scopes(),
            Some(vec!["one".to_string(), "two".to_string()])
        );
        assert!(response.expires_at() >= unix_now() + DEFAULT_EXPIRES_IN_SECS - 1);
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let json = format!(r#"{{"access_token": "a", "expires_in": {}}}"#, u64::MAX);
        let response: TokenResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.expires_at(), u64::MAX);
    }
}
