use thiserror::Error;

/// Errors that can occur while delivering a batch
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No valid report URL is configured
    #[error("no valid report URL configured")]
    MissingUrl,

    /// Failed to serialize the batch to JSON
    #[error("failed to serialize events: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network request failed
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server returned a non-2XX status code
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
}

impl DeliveryError {
    pub fn server_error(status: u16, body: String) -> Self {
        DeliveryError::Server { status, body }
    }

    /// Short label used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            DeliveryError::MissingUrl => "missing_url",
            DeliveryError::Serialization(_) => "serialization_failure",
            DeliveryError::Network(_) => "network_failure",
            DeliveryError::Server { .. } => "non_2xx_response",
        }
    }
}
