use std::fmt::Write as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{queue::PublishError, storage::UploadError, users::repo::StorageError};

/// Request-level failures. The client only ever sees a static message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid file upload")]
    InvalidUpload,
    #[error("failed to spool photo to disk")]
    Spool(#[source] std::io::Error),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUpload => (StatusCode::BAD_REQUEST, "Invalid file upload"),
            AppError::Spool(_) | AppError::Upload(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error uploading file")
            }
            AppError::Publish(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error sending user data"),
            AppError::Storage(StorageError::Query(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching users")
            }
            AppError::Storage(StorageError::Scan(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error scanning user data")
            }
        }
    }
}

/// `err: cause: cause` on one line for log output.
pub fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut out = e.to_string();
    let mut current = e.source();
    while let Some(cause) = current {
        let _ = write!(out, ": {}", cause);
        current = cause.source();
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %error_chain(&self), %status, "request failed");
        } else {
            warn!(error = %error_chain(&self), %status, "request rejected");
        }
        (status, message).into_response()
    }
}
