//! Per-request transformation pipeline.
//!
//! # Data Flow
//! ```text
//! Received
//!     → params (validate query)            ✗ RejectedParams   (404)
//! Validated
//!     → fetch (one GET, media type check)  ✗ FetchFailed      (400)
//! Fetched
//!     → imaging (blocking pool)            ✗ TransformFailed  (500)
//! Transformed
//!     → http::response (write body)
//! Responded
//! ```
//!
//! # Design Decisions
//! - Stages are strictly sequential; no retries, no backward transitions
//! - Everything is request-scoped; buffers drop when the response is written
//! - The CPU-bound stage runs on `spawn_blocking` and is awaited to completion

pub mod stage;

use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;

use crate::fetch::{FetchError, RemoteFetcher};
use crate::imaging::{Geometry, ImageTransformer, ImagingRuntime, TransformError, TransformedImage};
use crate::observability::metrics;
use crate::params::{parse_params, Rejection};

pub use stage::Stage;

/// Why a request left the pipeline early.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl PipelineError {
    /// Terminal state reached by this failure.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Rejected(_) => Stage::RejectedParams,
            PipelineError::Fetch(_) => Stage::FetchFailed,
            PipelineError::Transform(_) => Stage::TransformFailed,
        }
    }
}

/// Successful pipeline output, ready to be written.
#[derive(Debug, Clone)]
pub struct ProxyImage {
    pub image: TransformedImage,
    /// Media type declared by the origin.
    pub media_type: String,
}

impl ProxyImage {
    pub fn into_body(self) -> Bytes {
        self.image.bytes
    }
}

/// Runs validate → fetch → transform for one request.
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    fetcher: RemoteFetcher,
    transformer: ImageTransformer,
}

impl ImagePipeline {
    pub fn new(fetcher: RemoteFetcher, runtime: &'static ImagingRuntime) -> Self {
        Self {
            fetcher,
            transformer: ImageTransformer::new(runtime),
        }
    }

    /// Process a raw query string.
    pub async fn run(&self, query: Option<&str>) -> Result<ProxyImage, PipelineError> {
        let request = parse_params(query)?;
        tracing::debug!(
            stage = %Stage::Validated,
            source = %request.source_url,
            width = request.width,
            height = request.height,
            mode = %request.mode,
            "Parameters accepted"
        );

        let remote = self.fetcher.fetch(&request.source_url).await?;
        metrics::record_source_bytes(remote.bytes.len());
        tracing::debug!(
            stage = %Stage::Fetched,
            media_type = %remote.media_type,
            bytes = remote.bytes.len(),
            "Source retrieved"
        );

        let transformer = self.transformer;
        let geometry = Geometry::new(request.width, request.height);
        let mode = request.mode;
        let source = remote.bytes;
        let started = Instant::now();

        let image = tokio::task::spawn_blocking(move || {
            transformer.transform(&source, geometry, mode)
        })
        .await
        .map_err(|e| TransformError::Aborted(e.to_string()))??;

        metrics::record_transform(mode, started);
        tracing::debug!(
            stage = %Stage::Transformed,
            width = image.width,
            height = image.height,
            "Image ready"
        );

        Ok(ProxyImage {
            image,
            media_type: remote.media_type,
        })
    }
}
