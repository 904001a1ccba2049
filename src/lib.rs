//! On-demand image transformation proxy library.

pub mod config;
pub mod fetch;
pub mod http;
pub mod imaging;
pub mod lifecycle;
pub mod observability;
pub mod params;
pub mod pipeline;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
