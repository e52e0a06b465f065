//! HTTP surface
//!
//! Router construction and serving, split from `main` so integration
//! tests can start the full stack against a mock automation backend.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::api;
use crate::auth;
use crate::state::SharedState;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Build the full application router.
///
/// `open_root` leaves `GET /` reachable without a key; everything else
/// always sits behind the auth middleware.
pub fn router(state: SharedState, open_root: bool) -> Router {
    let mut protected: Router<SharedState> = Router::new()
        .route("/chat/completions", post(api::chat::chat_completions))
        .route(
            "/model",
            get(api::model::get_model).post(api::model::set_model),
        );

    let mut public: Router<SharedState> = Router::new();
    if open_root {
        public = public.route("/", get(home));
    } else {
        protected = protected.route("/", get(home));
    }

    let protected = protected.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_api_key,
    ));

    public
        .merge(protected)
        // Middleware (order matters - request_id should be first)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until shutdown.
pub async fn serve(addr: SocketAddr, state: SharedState, open_root: bool) -> anyhow::Result<()> {
    let app = router(state, open_root);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn home() -> &'static str {
    "LLM API Bridge"
}
