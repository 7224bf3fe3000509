//! HTTP error types for the `LibraryMS` server.
//!
//! Every error renders as `{"error": "<message>"}`. Messages are fixed
//! strings the site front end matches on; the underlying cause of an upstream
//! failure is logged and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use libraryms_core::error::{MailError, ValidationError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client sent an incomplete or invalid payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The email provider did not accept the message.
    #[error("{message}: {source}")]
    Upstream {
        /// Text returned to the client.
        message: &'static str,
        source: MailError,
    },
}

impl AppError {
    /// Wrap a provider failure with the message the client should see.
    #[must_use]
    pub fn upstream(message: &'static str, source: MailError) -> Self {
        Self::Upstream { message, source }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Upstream { message, source } => {
                tracing::error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned())
            }
        };

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
