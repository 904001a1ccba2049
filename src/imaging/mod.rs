//! Image transformation subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     runtime.rs (probe encoders, fix decoder limits, once per process)
//!
//! per request:
//!     source bytes
//!         → transformer.rs (detect format, decode under limits)
//!         → geometry.rs (target size for resize, region for crop)
//!         → transformer.rs (resample or crop, re-encode in source format)
//!         → TransformedImage
//! ```
//!
//! # Design Decisions
//! - Decode, transform and encode are plain synchronous calls returning Result
//! - Output keeps the source format; no format conversion
//! - The runtime is initialized before the listener binds and never again

pub mod geometry;
pub mod runtime;
pub mod transformer;

pub use geometry::Geometry;
pub use runtime::{ImagingRuntime, InitError};
pub use transformer::{ImageTransformer, TransformError, TransformedImage};
