use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::rest;
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // Method is checked in the handler so the 405 carries a body
        .route("/login", any(rest::api_login))
        // Bearer-protected
        .route("/me", get(rest::api_me))
        .route("/events", get(rest::api_events))
        .route("/events/{id}", get(rest::api_event_detail))
        .route("/events/{id}/download", get(rest::api_event_download))
        .fallback(rest::not_found)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only, query params are not recorded
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
