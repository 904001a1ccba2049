//! Startup orchestration.
//!
//! # Responsibilities
//! - Apply command-line overrides and re-validate configuration
//! - Initialize the imaging runtime exactly once
//! - Build the HTTP server and bind its listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::ConfigError;
use crate::config::validation::validate_config;
use crate::config::ProxyConfig;
use crate::fetch::FetchError;
use crate::http::HttpServer;
use crate::imaging::{runtime, InitError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("imaging runtime: {0}")]
    Imaging(#[from] InitError),

    #[error("outbound client: {0}")]
    Client(#[from] FetchError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server ready to run on a bound listener.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
}

/// Apply `--bind` and `--port` on top of the loaded configuration.
///
/// The port replaces only the port of the bind address.
pub fn apply_overrides(mut config: ProxyConfig, bind: Option<String>, port: Option<u16>) -> ProxyConfig {
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
    }
    if let Some(port) = port {
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{port}"),
        };
    }
    config
}

/// Validate, initialize imaging, build the server and bind.
pub async fn start(config: ProxyConfig) -> Result<Started, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let runtime = runtime::init(&config.imaging)?;

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, runtime)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Started {
        server,
        listener,
        local_addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_override_keeps_host() {
        let config = apply_overrides(ProxyConfig::default(), None, Some(9000));
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");

        let config = apply_overrides(
            ProxyConfig::default(),
            Some("127.0.0.1:1234".into()),
            Some(4321),
        );
        assert_eq!(config.listener.bind_address, "127.0.0.1:4321");
    }

    #[test]
    fn test_bind_override() {
        let config = apply_overrides(ProxyConfig::default(), Some("[::1]:8000".into()), None);
        assert_eq!(config.listener.bind_address, "[::1]:8000");
    }

    #[tokio::test]
    async fn test_start_binds_ephemeral_port() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        let started = start(config).await.unwrap();
        assert_ne!(started.local_addr.port(), 0);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let mut config = ProxyConfig::default();
        config.timeouts.request_secs = 0;
        let err = start(config).await.err().unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }
}
