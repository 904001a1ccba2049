//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_proxy::imaging::runtime;
use image_proxy::lifecycle::Shutdown;
use image_proxy::{HttpServer, ProxyConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned origin response.
#[derive(Clone)]
pub struct OriginResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
    /// Send the body with chunked transfer encoding and no Content-Length.
    pub chunked: bool,
}

impl OriginResponse {
    pub fn image(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            body,
            chunked: false,
        }
    }

    pub fn chunked(mut self) -> Self {
        self.chunked = true;
        self
    }

    pub fn text(status: u16, content_type: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.as_bytes().to_vec(),
            chunked: false,
        }
    }
}

/// Start a programmable origin on an ephemeral port. `f` receives the request path.
pub async fn start_origin<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = OriginResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let path = read_request_path(&mut socket).await;
                        let response = f(path).await;

                        let status_text = match response.status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let mut head = format!("HTTP/1.1 {status_text}\r\nConnection: close\r\n");
                        if response.chunked {
                            head.push_str("Transfer-Encoding: chunked\r\n");
                        } else {
                            head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
                        }
                        if let Some(ct) = response.content_type {
                            head.push_str(&format!("Content-Type: {ct}\r\n"));
                        }
                        head.push_str("\r\n");

                        let _ = socket.write_all(head.as_bytes()).await;
                        if response.chunked {
                            for chunk in response.body.chunks(512) {
                                let _ = socket.write_all(format!("{:x}\r\n", chunk.len()).as_bytes()).await;
                                let _ = socket.write_all(chunk).await;
                                let _ = socket.write_all(b"\r\n").await;
                            }
                            let _ = socket.write_all(b"0\r\n\r\n").await;
                        } else {
                            let _ = socket.write_all(&response.body).await;
                        }
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start an origin that always serves the same response.
pub async fn start_static_origin(response: OriginResponse) -> SocketAddr {
    start_origin(move |_| {
        let response = response.clone();
        async move { response }
    })
    .await
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy() -> (SocketAddr, Shutdown) {
    start_proxy_with(ProxyConfig::default()).await
}

/// Start the proxy on an ephemeral port with a custom config.
pub async fn start_proxy_with(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let runtime = runtime::init(&config.imaging).unwrap();
    let server = HttpServer::new(config, runtime).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Encode a gradient test image.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Percent-encode a URL for use as a query value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
