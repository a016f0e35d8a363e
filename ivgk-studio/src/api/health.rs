//! Health check endpoint

use crate::state::AppState;
use axum::Json;
use axum::extract::State;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "ivgk-studio",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
    }))
}
