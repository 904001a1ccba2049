//! Outbound HTTP client for source images.
//!
//! # Responsibilities
//! - Reject URLs that are not absolute http(s)
//! - Issue a single GET with connect/total timeouts
//! - Enforce the declared-media-type contract
//! - Read the body with an upper size bound

use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::{header, redirect, Client};
use url::Url;

use crate::config::{FetchConfig, TimeoutConfig};
use crate::fetch::media_type::image_media_type;
use crate::fetch::types::{FetchError, RemoteImage};

/// Retrieves source images from origin servers.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: Client,
    max_source_bytes: usize,
}

impl RemoteFetcher {
    /// Build a fetcher from configuration.
    pub fn new(fetch: &FetchConfig, timeouts: &TimeoutConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(fetch.user_agent.clone())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.fetch_secs))
            .redirect(redirect::Policy::limited(fetch.max_redirects));

        if !fetch.use_env_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            max_source_bytes: fetch.max_source_bytes,
        })
    }

    /// Fetch `source` and confirm it is declared as image content.
    pub async fn fetch(&self, source: &str) -> Result<RemoteImage, FetchError> {
        let url = Url::parse(source)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let declared = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let media_type = image_media_type(declared)?;

        let limit = self.max_source_bytes;
        if let Some(len) = response.content_length() {
            if len > limit as u64 {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let mut buf = BytesMut::with_capacity(8192);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        tracing::debug!(
            media_type = %media_type,
            bytes = buf.len(),
            "Source image fetched"
        );

        Ok(RemoteImage {
            bytes: buf.freeze(),
            media_type,
        })
    }
}
