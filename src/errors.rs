use thiserror::Error;

// Errors raised by the fallible constructors and the live client.
// `resolve`, `validate` and `format_errors` never return these; they degrade instead.
#[derive(Debug, Error)]
pub enum BindError {
    // Input that was supposed to be a JSON document could not be parsed
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // The schema document could not be compiled by the validation engine
    #[error("schema compile error: {0}")]
    Schema(String),

    // The transport refused to connect to the endpoint
    #[error("connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    // A frame could not be delivered over an open connection
    #[error("transport error: {0}")]
    Transport(String),

    #[error("live client is not connected")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, BindError>;
