// handlers/public/health.rs - GET /health handler
use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match state.bookings.health_check().await {
        Ok(_) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}
