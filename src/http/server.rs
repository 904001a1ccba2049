//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the transform handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Dispatch every request, any method and path, to the pipeline
//! - Record per-request metrics and logs

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::fetch::{FetchError, RemoteFetcher};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::status_for;
use crate::imaging::ImagingRuntime;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::pipeline::{ImagePipeline, PipelineError, Stage};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ImagePipeline,
}

/// HTTP server for the image proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server. The imaging runtime must already be initialized.
    pub fn new(config: ProxyConfig, runtime: &'static ImagingRuntime) -> Result<Self, FetchError> {
        let fetcher = RemoteFetcher::new(&config.fetch, &config.timeouts)?;
        let state = AppState {
            pipeline: ImagePipeline::new(fetcher, runtime),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(transform_handler))
            .route("/", any(transform_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request.request_id(),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: validate, fetch, transform, respond.
async fn transform_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let query = request.uri().query().map(str::to_owned);

    tracing::debug!(
        request_id = %request_id,
        stage = %Stage::Received,
        method = %request.method(),
        path = %request.uri().path(),
        "Transform request received"
    );

    match state.pipeline.run(query.as_deref()).await {
        Ok(image) => {
            tracing::info!(
                request_id = %request_id,
                stage = %Stage::Responded,
                media_type = %image.media_type,
                width = image.image.width,
                height = image.image.height,
                bytes = image.image.bytes.len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Image served"
            );
            metrics::record_request(Stage::Responded, 200, start_time);
            image.into_response()
        }
        Err(err) => {
            let status = status_for(&err);
            log_failure(&request_id, &err);
            metrics::record_request(err.stage(), status.as_u16(), start_time);
            err.into_response()
        }
    }
}

fn log_failure(request_id: &str, err: &PipelineError) {
    match err {
        PipelineError::Transform(e) => {
            tracing::error!(request_id = %request_id, stage = %err.stage(), error = %e, "Transform failed")
        }
        _ => tracing::warn!(request_id = %request_id, stage = %err.stage(), error = %err, "Request refused"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::runtime;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let config = ProxyConfig::default();
        let runtime = runtime::init(&config.imaging).unwrap();
        HttpServer::new(config, runtime).unwrap()
    }

    #[tokio::test]
    async fn test_any_method_and_path_is_handled() {
        for (method, uri) in [("GET", "/"), ("POST", "/some/path?width=5"), ("DELETE", "/x")] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = server().router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());

        let request = Request::builder()
            .uri("/")
            .header("x-request-id", "client-id")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "client-id");
    }
}
