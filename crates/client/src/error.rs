use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success HTTP status from the upstream API, with any parsed detail.
    #[error("Upstream request failed with status {status}: {detail}")]
    UpstreamStatus { status: u16, detail: String },

    /// Response body failed structural validation on a path that requires
    /// a complete, correct answer.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// A required identifier was neither supplied nor configured.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
