use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::handlers::{analytics_handler, health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

/// Span for one request. Records the path only: the query string of a
/// redirect may carry a link password.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .route("/analytics/{short_code}", get(analytics_handler))
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .with_state(state)
    }
}
