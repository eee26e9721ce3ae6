use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request for {resource} failed: {source}")]
    Http {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource} request returned {status}: {body}")]
    Status {
        resource: String,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected {resource} response: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}
