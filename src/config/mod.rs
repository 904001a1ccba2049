//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → CLI overrides (bind address / port) applied by main
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so the service runs without a file
//! - Validation separates syntactic (serde) from semantic checks
//! - The maximum output dimension is a constant, not a setting

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ProxyConfig;
pub use schema::{
    FetchConfig, ImagingConfig, ListenerConfig, LogFormat, ObservabilityConfig, ResizeFilter,
    TimeoutConfig,
};
