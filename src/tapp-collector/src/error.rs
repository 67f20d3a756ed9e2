use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::PathBuf;
use tapp_common::PayloadError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("invalid report body: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CollectorError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            CollectorError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("Rejected report: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
