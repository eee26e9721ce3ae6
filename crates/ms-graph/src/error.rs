use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error(
        "missing environment variables: {}. Please set AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, \
         and AZURE_TENANT_ID",
        .0.join(", ")
    )]
    MissingEnv(Vec<&'static str>),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error getting token: {error}: {description}")]
    TokenRejected { error: String, description: String },

    #[error("error finding user {email} ({status}): {body}")]
    UserLookup {
        email: String,
        status: StatusCode,
        body: String,
    },

    #[error("error listing roles ({status}): {body}")]
    RoleListing { status: StatusCode, body: String },

    #[error("Role '{name}' not found. Ensure it is activated in the tenant.")]
    RoleNotFound { name: String },

    #[error("error assigning role ({status}): {body}")]
    Assignment { status: StatusCode, body: String },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
