// handlers/public/root.rs - GET / handler
use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Roombook API",
            "version": version,
            "description": "Room booking administration API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "csrf": "GET /api/auth/csrf (protected - anti-forgery token)",
                "bulk_delete": "POST /api/entries/bulk_delete (protected - booking admin)",
                "entry_delete": "DELETE /api/entries/:id (protected - booking admin)",
            }
        }
    }))
}
