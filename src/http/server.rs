//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gate handler on every path
//! - Wire up middleware (request spans)
//! - Bind server to listener, with optional TLS
//! - Check required headers, then reject or forward
//! - Graceful shutdown on the lifecycle broadcast

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatekeeperConfig;
use crate::error::ServerError;
use crate::gate::{display_host, rejection_response, RequiredHeaders};
use crate::http::response::{bad_gateway, relay_response};
use crate::lifecycle::shutdown::wait;
use crate::net::load_tls_config;
use crate::observability::metrics::{self, Outcome};
use crate::observability::tracing::make_request_span;
use crate::upstream::UpstreamClient;

/// How long TLS connections may drain after shutdown is triggered.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub required: Arc<RequiredHeaders>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn from_config(config: &GatekeeperConfig) -> Result<Self, ServerError> {
        let required = RequiredHeaders::new(&config.gate.required_headers)?;
        let upstream = UpstreamClient::new(&config.upstream, &config.forwarding)?;
        Ok(Self {
            required: Arc::new(required),
            upstream: Arc::new(upstream),
        })
    }
}

/// HTTP server for the gatekeeper.
pub struct HttpServer {
    router: Router,
    config: GatekeeperConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatekeeperConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
    }

    /// The configured router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let app = self.router.into_make_service();

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls = load_tls_config(tls).await.map_err(ServerError::Tls)?;
                tracing::info!(address = %addr, origin = %self.config.upstream.origin, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    wait(shutdown).await;
                    drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, origin = %self.config.upstream.origin, "HTTP server starting");
                axum::serve(listener, app)
                    .with_graceful_shutdown(wait(shutdown))
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Gate every request on the required headers, then forward or reject.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();

    if let Err(missing) = state.required.check(request.headers()) {
        tracing::info!(
            method = %request.method(),
            path = %request.uri().path(),
            missing = %missing,
            "Request rejected"
        );
        let host = display_host(request.headers(), request.uri());
        metrics::record_request(Outcome::Rejected, start);
        return rejection_response(&state.required, &missing, &host);
    }

    match state.upstream.forward(request).await {
        Ok(upstream) => {
            tracing::debug!(status = %upstream.status(), "Upstream responded");
            metrics::record_request(Outcome::Forwarded, start);
            relay_response(upstream, &state.required)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Upstream request failed");
            metrics::record_request(Outcome::UpstreamFailed, start);
            bad_gateway(&e)
        }
    }
}
