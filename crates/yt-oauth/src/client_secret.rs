use serde::Deserialize;
use std::path::Path;

use crate::{AuthError, GOOGLE_AUTH_URI, GOOGLE_TOKEN_URI};

/// OAuth client as described by a Google Cloud Console client secret file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Desktop clients are stored under "installed", web clients under "web"
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl ClientSecret {
    pub fn load_from_file(path: &Path) -> Result<Self, AuthError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingClientSecret {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(AuthError::InvalidClientSecret {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        Self::from_json(&content).map_err(|reason| AuthError::InvalidClientSecret {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let file: ClientSecretFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" client entry".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_installed_client() {
        let json = r#"{
            "installed": {
                "client_id": "123.apps.googleusercontent.com",
                "project_id": "playlists",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"]
            }
        }"#;
        let secret = ClientSecret::from_json(json).unwrap();
        assert_eq!(secret.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secret.client_secret, "shh");
        assert_eq!(secret.auth_uri, "https://accounts.google.com/o/oauth2/auth");
    }

    #[test]
    fn test_parse_web_client_with_defaults() {
        let json = r#"{"web": {"client_id": "id", "client_secret": "secret"}}"#;
        let secret = ClientSecret::from_json(json).unwrap();
        assert_eq!(secret.auth_uri, GOOGLE_AUTH_URI);
        assert_eq!(secret.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn test_parse_rejects_unknown_layout() {
        assert!(ClientSecret::from_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_guided_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        let err = ClientSecret::load_from_file(&path).unwrap_err();
        assert!(matches!(err, AuthError::MissingClientSecret { .. }));
        assert!(err.to_string().contains("Google Cloud Console"));
    }
}
