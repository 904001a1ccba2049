//! Response construction.
//!
//! # Responsibilities
//! - Write the transformed image with the origin's declared media type
//! - Map pipeline failures to status codes with plain-text bodies
//!
//! # Design Decisions
//! - Parameter problems are 404, fetch problems 400, transform problems 500
//! - Error bodies are for humans, not machines
//! - Diagnostic detail stays in the logs; clients get fixed messages

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::pipeline::{PipelineError, ProxyImage};

/// Body sent when decoding or encoding fails.
pub const TRANSFORM_FAILED: &str = "Error transforming image.";

/// Status code for a pipeline failure.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Rejected(_) => StatusCode::NOT_FOUND,
        PipelineError::Fetch(_) => StatusCode::BAD_REQUEST,
        PipelineError::Transform(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing message for a pipeline failure.
pub fn error_message(err: &PipelineError) -> String {
    match err {
        PipelineError::Rejected(rejection) => rejection.to_string(),
        PipelineError::Fetch(fetch) => fetch.user_message().to_string(),
        PipelineError::Transform(_) => TRANSFORM_FAILED.to_string(),
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (status_for(&self), error_message(&self)).into_response()
    }
}

impl IntoResponse for ProxyImage {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.media_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            Body::from(self.into_body()),
        )
            .into_response()
    }
}
