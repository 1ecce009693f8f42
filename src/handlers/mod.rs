pub mod collections;
pub mod reports;

use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service banner and endpoint map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "parklot-api",
        "version": version,
        "description": "Parking and service billing API",
        "endpoints": {
            "reports": "/resources/completed, /resources/open, /resources/daily-summary",
            "collections": "/collections/:name[/:id] (users, vehicles, services)",
        }
    }))
}

/// GET /health - liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
