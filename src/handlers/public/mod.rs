// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: none (/, /health)
use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - service description and endpoint map
pub async fn root(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(
        "Roamance API",
        json!({
            "name": "Roamance API",
            "version": env!("CARGO_PKG_VERSION"),
            "assistant": state.assistant.is_some(),
            "endpoints": {
                "health": "/health (public)",
                "journals": "/api/journals[/:id] (protected)",
                "subsections": "/api/subsections[/:id] (protected)",
                "assistant": "/api/assistant/chat[/stream] (protected)",
            }
        }),
    ))
}

/// GET /health - store connectivity check
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(
            "Service healthy",
            json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            }),
        )),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
