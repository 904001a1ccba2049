//! Query validation rules.
//!
//! # Responsibilities
//! - Decode the query string (percent-decoding, `+` as space)
//! - Apply the rules in a fixed order, first failure wins:
//!   missing image, both dimensions zero, negative, too large, unknown mode
//! - Produce a `TransformRequest` on success

use url::form_urlencoded;

use crate::params::number::coerce_or_zero;
use crate::params::types::{Mode, Rejection, TransformRequest, MAX_DIMENSION};

/// Decoded query parameters with first-occurrence semantics.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// First value for `key`, if the key appears at all.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Decode a raw (still percent-encoded) query string.
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let pairs = query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    QueryParams { pairs }
}

/// Validate a raw query string into a [`TransformRequest`].
pub fn parse_params(query: Option<&str>) -> Result<TransformRequest, Rejection> {
    validate(&parse_query(query))
}

/// Validate already-decoded parameters.
pub fn validate(params: &QueryParams) -> Result<TransformRequest, Rejection> {
    let source_url = params.get("image").ok_or(Rejection::MissingImage)?;

    let width = coerce_or_zero(params.get("width"));
    let height = coerce_or_zero(params.get("height"));

    if width == 0.0 && height == 0.0 {
        return Err(Rejection::MissingDimensions);
    }
    if width < 0.0 || height < 0.0 {
        return Err(Rejection::NegativeDimension);
    }
    let max = f64::from(MAX_DIMENSION);
    if width > max || height > max {
        return Err(Rejection::DimensionTooLarge { max: MAX_DIMENSION });
    }

    let mode = Mode::from_query(params.get("mode").unwrap_or(""))
        .ok_or(Rejection::ModeNotAccepted)?;

    // Fractions truncate toward zero; "0.5x0" must not slip through as 0x0.
    let (width, height) = (width.trunc() as u32, height.trunc() as u32);
    if width == 0 && height == 0 {
        return Err(Rejection::MissingDimensions);
    }

    Ok(TransformRequest {
        source_url: source_url.to_string(),
        width,
        height,
        mode,
    })
}
