//! Validated request types and rejection reasons.

use std::fmt;
use thiserror::Error;

/// Largest accepted value for `width` or `height`.
pub const MAX_DIMENSION: u32 = 2048;

/// How the target geometry is applied to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rescale pixel content to the target geometry.
    #[default]
    Resize,
    /// Cut a top-left anchored region at native scale.
    Crop,
}

impl Mode {
    /// Parse a `mode` query value. Empty means "use the default".
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "" | "resize" => Some(Mode::Resize),
            "crop" => Some(Mode::Crop),
            _ => None,
        }
    }

    /// Metric / log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Resize => "resize",
            Mode::Crop => "crop",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transformation request that passed every validation rule.
///
/// `width` and `height` are never both zero and never exceed [`MAX_DIMENSION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
    pub mode: Mode,
}

/// Reasons a query is refused before any I/O happens.
///
/// The `Display` output is sent verbatim to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Missing 'image' query parameter.")]
    MissingImage,

    #[error("Missing non-zero 'width' or 'height' query parameters.")]
    MissingDimensions,

    #[error("Negative width or height is not supported.")]
    NegativeDimension,

    #[error("Width and height cannot exceed {max}.")]
    DimensionTooLarge { max: u32 },

    #[error("Mode not accepted.")]
    ModeNotAccepted,
}
