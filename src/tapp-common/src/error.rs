use thiserror::Error;

/// Errors raised while decoding a delivered report body
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event #{index} has an empty name")]
    EmptyEventName { index: usize },
}
