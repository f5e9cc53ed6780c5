//! HTTP routes
//!
//! - [`print`] - print and test-print submission
//! - [`printers`] - printer list and refresh
//! - [`identity`] - machine id lookup and validation
//! - [`notification`] - test notifications
//! - [`jobs`] - job history
//! - [`status`] - service status
//! - [`ws`] - WebSocket event push

pub mod identity;
pub mod jobs;
pub mod notification;
pub mod print;
pub mod printers;
pub mod status;
pub mod ws;

use std::time::Instant;

use axum::{Router, middleware};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{Config, ServerState};

pub use crate::utils::{AppError, AppResult};

/// HTTP request log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(
        target: "http_access",
        "{} {} {} {:?}",
        method,
        uri,
        status,
        start.elapsed()
    );

    response
}

/// All routes, no state or middleware
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(print::router())
        .merge(printers::router())
        .merge(identity::router())
        .merge(notification::router())
        .merge(jobs::router())
        .merge(status::router())
        .merge(ws::router())
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router with state, CORS and request logging
pub fn build_app(state: ServerState) -> Router {
    let cors = cors_layer(&state.config);
    build_router()
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
}
