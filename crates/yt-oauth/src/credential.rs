//! Stored credential lifecycle.
//!
//! `token.json` is classified into a [`CredentialState`], [`next_action`] decides what to do
//! with it, and [`authenticate`] carries that decision out through a [`CredentialStore`] and
//! a [`TokenProvider`].

use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{AuthError, OAuthToken, unix_now};

/// What was found at the credential path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// Nothing stored yet
    Absent,
    /// Usable as-is
    Valid(OAuthToken),
    /// Expired, but carries a refresh token
    Expired(OAuthToken),
    /// Unreadable, or expired with no way to refresh
    Invalid,
}

impl CredentialState {
    pub fn classify(token: OAuthToken, now: u64) -> Self {
        if !token.is_expired_at(now) {
            CredentialState::Valid(token)
        } else if token.refresh_token.is_some() {
            CredentialState::Expired(token)
        } else {
            CredentialState::Invalid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    Use(OAuthToken),
    Refresh(OAuthToken),
    Interactive,
}

pub fn next_action(state: CredentialState) -> NextAction {
    match state {
        CredentialState::Valid(token) => NextAction::Use(token),
        CredentialState::Expired(token) => NextAction::Refresh(token),
        CredentialState::Absent | CredentialState::Invalid => NextAction::Interactive,
    }
}

/// Persistence for the single credential used by a run
pub trait CredentialStore {
    fn load(&self) -> CredentialState;
    fn save(&self, token: &OAuthToken) -> Result<(), AuthError>;
    fn discard(&self) -> Result<(), AuthError>;
}

/// Network side of authentication: refreshing and the interactive consent flow
pub trait TokenProvider {
    fn refresh(&self, token: &OAuthToken) -> impl Future<Output = Result<OAuthToken, AuthError>>;
    fn authorize(&self) -> impl Future<Output = Result<OAuthToken, AuthError>>;
}

/// Produce a usable access token, refreshing or re-authorizing as needed.
///
/// A failed refresh is retried exactly once, by discarding the stored credential and
/// falling through to the interactive flow. Every newly obtained token is persisted.
pub async fn authenticate<S, P>(store: &S, provider: &P) -> Result<OAuthToken, AuthError>
where
    S: CredentialStore,
    P: TokenProvider,
{
    let token = match next_action(store.load()) {
        NextAction::Use(token) => {
            debug!("Using stored OAuth token");
            return Ok(token);
        }
        NextAction::Refresh(token) => match provider.refresh(&token).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Error refreshing token: {}", e);
                warn!("Deleting stored token and re-authenticating...");
                store.discard()?;
                provider.authorize().await?
            }
        },
        NextAction::Interactive => provider.authorize().await?,
    };

    store.save(&token)?;
    Ok(token)
}

/// Credential stored as JSON on disk
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, source: std::io::Error) -> AuthError {
        AuthError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> CredentialState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CredentialState::Absent,
            Err(e) => {
                warn!("Failed to read OAuth token file '{}': {}", self.path.display(), e);
                return CredentialState::Invalid;
            }
        };

        match serde_json::from_str::<OAuthToken>(&content) {
            Ok(token) => CredentialState::classify(token, unix_now()),
            Err(e) => {
                warn!("Failed to parse OAuth token file '{}': {}", self.path.display(), e);
                CredentialState::Invalid
            }
        }
    }

    /// Save token with owner-only permissions on Unix-like systems
    fn save(&self, token: &OAuthToken) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(token)
            .map_err(|e| self.persist_error(std::io::Error::other(e)))?;

        std::fs::write(&self.path, content).map_err(|e| self.persist_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions).map_err(|e| self.persist_error(e))?;
        }

        info!("OAuth token saved to {}", self.path.display());
        Ok(())
    }

    fn discard(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.persist_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GOOGLE_TOKEN_URI;

    fn token(expires_at: u64, refresh: bool) -> OAuthToken {
        OAuthToken {
            access_token: "access".to_string(),
            refresh_token: refresh.then(|| "refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_at,
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            scopes: Vec::new(),
        }
    }

    #[test]
    fn test_classify() {
        let now = 10_000;
        assert!(matches!(
            CredentialState::classify(token(now + 3600, true), now),
            CredentialState::Valid(_)
        ));
        assert!(matches!(
            CredentialState::classify(token(now - 1, true), now),
            CredentialState::Expired(_)
        ));
        assert_eq!(
            CredentialState::classify(token(now - 1, false), now),
            CredentialState::Invalid
        );
    }

    #[test]
    fn test_next_action() {
        let t = token(0, true);
        assert_eq!(
            next_action(CredentialState::Valid(t.clone())),
            NextAction::Use(t.clone())
        );
        assert_eq!(
            next_action(CredentialState::Expired(t.clone())),
            NextAction::Refresh(t)
        );
        assert_eq!(next_action(CredentialState::Absent), NextAction::Interactive);
        assert_eq!(next_action(CredentialState::Invalid), NextAction::Interactive);
    }

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token.json"));
        assert_eq!(store.load(), CredentialState::Absent);

        let t = token(unix_now() + 3600, true);
        store.save(&t).unwrap();
        assert_eq!(store.load(), CredentialState::Valid(t));

        store.discard().unwrap();
        assert_eq!(store.load(), CredentialState::Absent);
        // discarding twice is fine
        store.discard().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token.json"));
        store.save(&token(unix_now() + 3600, true)).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_garbage_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(FileCredentialStore::new(path).load(), CredentialState::Invalid);
    }
}
