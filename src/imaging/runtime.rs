//! Process-wide imaging runtime.
//!
//! # Responsibilities
//! - Fix decoder limits and the resampling filter once at startup
//! - Probe which formats this build can re-encode
//! - Fail fast when nothing can be encoded
//!
//! # Design Decisions
//! - Stored in a `OnceLock`; read-only after initialization
//! - `init` is idempotent: later calls return the first instance

use std::sync::OnceLock;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Limits};
use thiserror::Error;

use crate::config::{ImagingConfig, ResizeFilter};
use crate::imaging::transformer::encode;

/// Formats the proxy attempts to round-trip.
const CANDIDATE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Ico,
];

static RUNTIME: OnceLock<ImagingRuntime> = OnceLock::new();

/// Errors raised while bringing up the imaging runtime.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no image format can be encoded by this build")]
    NoEncoders,
}

/// Shared, immutable imaging settings.
#[derive(Debug)]
pub struct ImagingRuntime {
    filter: FilterType,
    limits: Limits,
    encodable: Vec<ImageFormat>,
}

impl ImagingRuntime {
    fn probe(config: &ImagingConfig) -> Result<Self, InitError> {
        let probe = DynamicImage::new_rgba8(1, 1);
        let encodable: Vec<ImageFormat> = CANDIDATE_FORMATS
            .iter()
            .copied()
            .filter(|format| match encode(&probe, *format) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(format = ?format, error = %e, "Format not encodable");
                    false
                }
            })
            .collect();

        if encodable.is_empty() {
            return Err(InitError::NoEncoders);
        }

        let mut limits = Limits::default();
        limits.max_alloc = Some(config.max_decode_bytes);

        Ok(Self {
            filter: filter_type(config.resize_filter),
            limits,
            encodable,
        })
    }

    /// Resampling filter used for resize.
    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Decoder limits applied to every source image.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Whether images of `format` can be written back out.
    pub fn can_encode(&self, format: ImageFormat) -> bool {
        self.encodable.contains(&format)
    }

    /// Allocation ceiling shared by decoding and resampling.
    pub fn max_alloc(&self) -> u64 {
        self.limits.max_alloc.unwrap_or(u64::MAX)
    }
}

/// Initialize the runtime, or return the one already initialized.
pub fn init(config: &ImagingConfig) -> Result<&'static ImagingRuntime, InitError> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = ImagingRuntime::probe(config)?;
    let runtime = RUNTIME.get_or_init(|| runtime);

    tracing::info!(
        formats = ?runtime.encodable,
        filter = ?runtime.filter,
        "Imaging runtime initialized"
    );
    Ok(runtime)
}

fn filter_type(filter: ResizeFilter) -> FilterType {
    match filter {
        ResizeFilter::Nearest => FilterType::Nearest,
        ResizeFilter::Triangle => FilterType::Triangle,
        ResizeFilter::CatmullRom => FilterType::CatmullRom,
        ResizeFilter::Gaussian => FilterType::Gaussian,
        ResizeFilter::Lanczos3 => FilterType::Lanczos3,
    }
}
