use serde_json::Value as JsonValue;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication on Endomondo failed")]
    InvalidCredentials,

    /// The service answered a read with a structured `error` object.
    #[error("Endomondo returned an unexpected error: {0}")]
    BadResponse(JsonValue),

    /// A track post reply had no `workout.id`. Earlier batches of the same
    /// upload may already be stored remotely.
    #[error("unexpected response from Endomondo, data may be partially uploaded. Response was: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid track point: {0}")]
    InvalidPoint(String),

    #[error("invalid timestamp {value:?}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("compressing batch: {0}")]
    Compression(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}
