//! Remote image retrieval.
//!
//! # Data Flow
//! ```text
//! TransformRequest.source_url
//!     → client.rs (URL check, single GET, status check)
//!     → media_type.rs (declared Content-Type must be image/*)
//!     → client.rs (bounded body read)
//!     → RemoteImage { bytes, media_type }
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per request: no retries, no backoff
//! - Trust the declared Content-Type, never sniff bytes
//! - Every failure is the caller's problem (400), with detail kept for logs

pub mod client;
pub mod media_type;
pub mod types;

pub use client::RemoteFetcher;
pub use types::{FetchError, RemoteImage};
