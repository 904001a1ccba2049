//! Fetch result and error types.

use bytes::Bytes;
use thiserror::Error;

/// User-facing message for any retrieval failure.
pub const RETRIEVAL_FAILED: &str = "Error retrieving image from URL.";

/// User-facing message when the resource is not declared as an image.
pub const NOT_AN_IMAGE: &str = "URL is not an image type.";

/// Source image as downloaded, owned by a single request.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub bytes: Bytes,
    /// Declared `type/subtype`, echoed back to the client.
    pub media_type: String,
}

/// Errors that can occur while retrieving the source image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The `image` parameter is not an absolute URL.
    #[error("invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Only http and https sources are fetched.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Connection, TLS, redirect or body transfer failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The origin answered with a non-2xx status.
    #[error("origin returned status {0}")]
    Status(reqwest::StatusCode),

    /// The declared media type is missing, malformed or not `image/*`.
    #[error("declared content type is not an image: {}", .declared.as_deref().unwrap_or("<none>"))]
    NotAnImage { declared: Option<String> },

    /// The body exceeded the configured source size limit.
    #[error("source image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

impl FetchError {
    /// Message safe to show to the client.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotAnImage { .. } => NOT_AN_IMAGE,
            _ => RETRIEVAL_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let not_image = FetchError::NotAnImage {
            declared: Some("text/html".into()),
        };
        assert_eq!(not_image.user_message(), "URL is not an image type.");
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::NOT_FOUND).user_message(),
            "Error retrieving image from URL."
        );
        assert_eq!(
            FetchError::TooLarge { limit: 10 }.user_message(),
            "Error retrieving image from URL."
        );
    }

    #[test]
    fn test_detail_is_kept_for_logs() {
        let err = FetchError::NotAnImage { declared: None };
        assert_eq!(err.to_string(), "declared content type is not an image: <none>");
    }
}
