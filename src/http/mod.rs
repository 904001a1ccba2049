//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, single catch-all route)
//!     → request.rs (assign / propagate x-request-id)
//!     → pipeline (validate → fetch → transform)
//!     → response.rs (image body or plain-text error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
