mod auth;
mod error;

pub use auth::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, GraphCredentials, TENANT_ID_ENV, acquire_app_token,
};
pub use error::GraphError;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_ADDRESS: &str = "https://graph.microsoft.com/v1.0";

/// Application permissions come from the app registration, not from requested scopes
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Where tokens and Graph requests are sent
#[derive(Debug, Clone)]
pub struct GraphEndpoints {
    pub authority_host: String,
    pub graph_address: String,
}

impl Default for GraphEndpoints {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            graph_address: DEFAULT_GRAPH_ADDRESS.to_string(),
        }
    }
}

impl GraphEndpoints {
    /// Defaults, overridable with `AZURE_AUTHORITY_HOST` and `GRAPH_API_ADDRESS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            authority_host: std::env::var("AZURE_AUTHORITY_HOST")
                .unwrap_or(defaults.authority_host)
                .trim_end_matches('/')
                .to_string(),
            graph_address: std::env::var("GRAPH_API_ADDRESS")
                .unwrap_or(defaults.graph_address)
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryObject {
    id: String,
}

/// An activated directory role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRole {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Exact display-name match; roles that were never activated are not listed by Graph
pub fn find_role_id(roles: &[DirectoryRole], role_name: &str) -> Option<String> {
    roles
        .iter()
        .find(|role| role.display_name.as_deref() == Some(role_name))
        .map(|role| role.id.clone())
}

pub struct GraphClient {
    http: reqwest::Client,
    graph_address: String,
    access_token: String,
}

impl GraphClient {
    pub fn new(
        graph_address: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, GraphError> {
        Ok(GraphClient {
            http: build_http()?,
            graph_address: graph_address.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Issue a GET and hand back the status with the raw body
    async fn get(&self, path: &str) -> Result<(StatusCode, String, String), GraphError> {
        let url = format!("{}{}", self.graph_address, path);
        debug!("GET {}", url);

        let http_error = |source| GraphError::Http {
            url: url.clone(),
            source,
        };
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(http_error)?;
        Ok((status, body, url))
    }

    /// Resolve a user's directory object id from their email / UPN
    pub async fn user_id(&self, email: &str) -> Result<String, GraphError> {
        let path = format!("/users/{}", urlencoding::encode(email));
        let (status, body, url) = self.get(&path).await?;
        if status != StatusCode::OK {
            return Err(GraphError::UserLookup {
                email: email.to_string(),
                status,
                body,
            });
        }
        let user: DirectoryObject = decode(&url, &body)?;
        Ok(user.id)
    }

    pub async fn directory_roles(&self) -> Result<Vec<DirectoryRole>, GraphError> {
        let (status, body, url) = self.get("/directoryRoles").await?;
        if status != StatusCode::OK {
            return Err(GraphError::RoleListing { status, body });
        }
        let roles: Collection<DirectoryRole> = decode(&url, &body)?;
        Ok(roles.value)
    }

    pub async fn role_id(&self, role_name: &str) -> Result<String, GraphError> {
        let roles = self.directory_roles().await?;
        find_role_id(&roles, role_name).ok_or_else(|| GraphError::RoleNotFound {
            name: role_name.to_string(),
        })
    }

    /// Link a directory object into a role; Graph answers 204 on success
    pub async fn add_role_member(&self, role_id: &str, user_id: &str) -> Result<(), GraphError> {
        let url = format!("{}/directoryRoles/{}/members/$ref", self.graph_address, role_id);
        let body = serde_json::json!({
            "@odata.id": format!("{}/directoryObjects/{}", self.graph_address, user_id),
        });

        let http_error = |source| GraphError::Http {
            url: url.clone(),
            source,
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        let body = response.text().await.map_err(http_error)?;
        Err(GraphError::Assignment { status, body })
    }
}

fn build_http() -> Result<reqwest::Client, GraphError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(GraphError::Client)
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, GraphError> {
    serde_json::from_str(body).map_err(|source| GraphError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Token, user lookup, role lookup, then a single link call. Stops at the first failure.
pub async fn assign_role(
    credentials: &GraphCredentials,
    endpoints: &GraphEndpoints,
    user_email: &str,
    role_name: &str,
) -> Result<(), GraphError> {
    info!("Getting access token...");
    let token = acquire_app_token(&build_http()?, credentials, endpoints).await?;
    let client = GraphClient::new(&endpoints.graph_address, token)?;

    info!("Looking up user: {}...", user_email);
    let user_id = client.user_id(user_email).await?;

    info!("Looking up role: {}...", role_name);
    let role_id = client.role_id(role_name).await?;

    info!("Assigning role '{}' to user '{}'...", role_name, user_email);
    client.add_role_member(&role_id, &user_id).await
}
