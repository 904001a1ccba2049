//! Decode, resize or crop, re-encode.

use std::borrow::Cow;
use std::io::Cursor;

use bytes::Bytes;
use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};
use thiserror::Error;

use crate::imaging::geometry::Geometry;
use crate::imaging::runtime::ImagingRuntime;
use crate::params::Mode;

/// Errors raised while transforming an image.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read image data: {0}")]
    Io(#[from] std::io::Error),

    #[error("image format could not be detected")]
    UnknownFormat,

    #[error("{0:?} images cannot be re-encoded")]
    UnsupportedFormat(ImageFormat),

    #[error("decode failed: {0}")]
    Decode(#[source] ImageError),

    #[error("encode failed: {0}")]
    Encode(#[source] ImageError),

    #[error("output of {width}x{height} exceeds the allocation limit")]
    OutputTooLarge { width: u32, height: u32 },

    #[error("transform task failed: {0}")]
    Aborted(String),
}

/// Output of a successful transform. Owns wholly new bytes.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Applies a single resize or crop to encoded image bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImageTransformer {
    runtime: &'static ImagingRuntime,
}

impl ImageTransformer {
    pub fn new(runtime: &'static ImagingRuntime) -> Self {
        Self { runtime }
    }

    /// Decode `source`, apply `mode` at `geometry`, re-encode in the source format.
    pub fn transform(
        &self,
        source: &[u8],
        geometry: Geometry,
        mode: Mode,
    ) -> Result<TransformedImage, TransformError> {
        let (image, format) = self.decode(source)?;
        let output = apply(&image, geometry, mode, self.runtime)?;
        drop(image);

        let bytes = encode(&output, format)?;

        tracing::debug!(
            format = ?format,
            mode = %mode,
            width = output.width(),
            height = output.height(),
            bytes = bytes.len(),
            "Image transformed"
        );

        Ok(TransformedImage {
            bytes: Bytes::from(bytes),
            format,
            width: output.width(),
            height: output.height(),
        })
    }

    fn decode(&self, source: &[u8]) -> Result<(DynamicImage, ImageFormat), TransformError> {
        let mut reader = ImageReader::new(Cursor::new(source)).with_guessed_format()?;
        let format = reader.format().ok_or(TransformError::UnknownFormat)?;
        if !self.runtime.can_encode(format) {
            return Err(TransformError::UnsupportedFormat(format));
        }

        reader.limits(self.runtime.limits().clone());
        let image = reader.decode().map_err(TransformError::Decode)?;
        Ok((image, format))
    }
}

fn apply(
    image: &DynamicImage,
    geometry: Geometry,
    mode: Mode,
    runtime: &ImagingRuntime,
) -> Result<DynamicImage, TransformError> {
    let (src_width, src_height) = (image.width(), image.height());
    match mode {
        Mode::Resize => {
            let (width, height) = geometry.resize_dimensions(src_width, src_height);
            if resize_allocation(image, width, height) > runtime.max_alloc() {
                return Err(TransformError::OutputTooLarge { width, height });
            }
            Ok(image.resize_exact(width, height, runtime.filter()))
        }
        Mode::Crop => {
            let (width, height) = geometry.crop_region(src_width, src_height);
            Ok(image.crop_imm(0, 0, width, height))
        }
    }
}

/// Upper bound on the bytes `resize_exact` allocates: the output buffer plus
/// the vertical pass, which holds `src_width x height` RGBA f32 samples.
fn resize_allocation(image: &DynamicImage, width: u32, height: u32) -> u64 {
    const INTERMEDIATE_BYTES_PER_PIXEL: u64 = 4 * 4;

    let output = u64::from(width) * u64::from(height) * u64::from(image.color().bytes_per_pixel());
    let intermediate = u64::from(image.width()) * u64::from(height) * INTERMEDIATE_BYTES_PER_PIXEL;
    output.saturating_add(intermediate)
}

/// Encode `image` as `format`, adapting the color type where the encoder demands it.
pub(crate) fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, TransformError> {
    let image = encodable_color(image, format);
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .map_err(TransformError::Encode)?;
    Ok(buf.into_inner())
}

fn encodable_color(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match (format, image.color()) {
        (ImageFormat::Jpeg, ColorType::L8 | ColorType::Rgb8) => Cow::Borrowed(image),
        // JPEG has no alpha channel and no 16-bit samples.
        (ImageFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        _ => Cow::Borrowed(image),
    }
}
