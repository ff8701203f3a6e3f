use axum::Json;
use serde_json::{json, Value};

/// GET /health_check
/// Always `{"status": "ok"}`; touches no downstream service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
