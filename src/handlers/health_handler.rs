use axum::Json;
use serde_json::{json, Value};

/// Kiểm tra server còn sống, không truy vấn DB.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
