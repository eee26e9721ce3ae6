use serde::Deserialize;
use std::fmt;
use tracing::info;

use crate::{GRAPH_DEFAULT_SCOPE, GraphEndpoints, GraphError};

pub const CLIENT_ID_ENV: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "AZURE_CLIENT_SECRET";
pub const TENANT_ID_ENV: &str = "AZURE_TENANT_ID";

/// App registration used for the client-credential flow
#[derive(Clone)]
pub struct GraphCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl GraphCredentials {
    pub fn from_env() -> Result<Self, GraphError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads all three settings and reports every missing or empty one at once
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GraphError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        match (read(CLIENT_ID_ENV), read(CLIENT_SECRET_ENV), read(TENANT_ID_ENV)) {
            (Some(client_id), Some(client_secret), Some(tenant_id)) => Ok(GraphCredentials {
                client_id,
                client_secret,
                tenant_id,
            }),
            (client_id, client_secret, tenant_id) => {
                let missing = [
                    (CLIENT_ID_ENV, client_id.is_none()),
                    (CLIENT_SECRET_ENV, client_secret.is_none()),
                    (TENANT_ID_ENV, tenant_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then_some(key))
                .collect();
                Err(GraphError::MissingEnv(missing))
            }
        }
    }
}

/// Both the success and the error shape of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenReply {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Obtain an application token for Microsoft Graph (client-credential flow)
pub async fn acquire_app_token(
    http: &reqwest::Client,
    credentials: &GraphCredentials,
    endpoints: &GraphEndpoints,
) -> Result<String, GraphError> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        endpoints.authority_host, credentials.tenant_id
    );
    info!("Requesting client-credential token from {}", url);

    let params = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("scope", GRAPH_DEFAULT_SCOPE),
        ("grant_type", "client_credentials"),
    ];

    let http_error = |source| GraphError::Http {
        url: url.clone(),
        source,
    };
    let response = http
        .post(&url)
        .form(&params)
        .send()
        .await
        .map_err(http_error)?;
    let status = response.status();
    let body = response.text().await.map_err(http_error)?;

    let reply: TokenReply = match serde_json::from_str(&body) {
        Ok(reply) => reply,
        Err(_) => {
            return Err(GraphError::TokenRejected {
                error: status.to_string(),
                description: body,
            });
        }
    };

    match reply.access_token {
        Some(token) if status.is_success() => Ok(token),
        _ => Err(GraphError::TokenRejected {
            error: reply.error.unwrap_or_else(|| status.to_string()),
            description: reply.error_description.unwrap_or_default(),
        }),
    }
}
