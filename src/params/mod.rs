//! Query parameter validation.
//!
//! # Data Flow
//! ```text
//! raw query string (?image=...&width=...&height=...&mode=...)
//!     → number.rs (lenient numeric coercion, never fails)
//!     → validator.rs (ordered rule checks)
//!     → TransformRequest (validated, immutable)
//!       or Rejection (user-facing message, 404)
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O, runs before any network work
//! - Bad numbers coerce to 0 instead of failing
//! - A single zero axis is valid and means "scale proportionally"

pub mod number;
pub mod types;
pub mod validator;

pub use types::{Mode, Rejection, TransformRequest, MAX_DIMENSION};
pub use validator::{parse_params, parse_query};
