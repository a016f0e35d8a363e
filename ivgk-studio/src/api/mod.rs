//! API routes for ivgk-studio

pub mod health;
pub mod logging;
pub mod preview;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let preview = Router::new()
        .route("/api/preview", post(preview::render))
        .route("/api/preview/embed", post(preview::embed))
        .route("/api/preview/qr", post(preview::qr_download))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(preview)
        .layer(middleware::from_fn(logging::logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}
