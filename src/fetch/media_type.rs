//! Content-Type parsing.

use mime::Mime;

use crate::fetch::types::FetchError;

/// Parse a declared Content-Type and require a primary type of `image`.
///
/// Returns the lowercased `type/subtype` with parameters stripped.
pub fn image_media_type(declared: Option<&str>) -> Result<String, FetchError> {
    let not_an_image = || FetchError::NotAnImage {
        declared: declared.map(str::to_string),
    };

    let mime: Mime = declared
        .ok_or_else(not_an_image)?
        .trim()
        .parse()
        .map_err(|_| not_an_image())?;

    if mime.type_() != mime::IMAGE {
        return Err(not_an_image());
    }

    Ok(mime.essence_str().to_ascii_lowercase())
}
