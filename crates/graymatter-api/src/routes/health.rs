use axum::Json;
use serde_json::{Value, json};

pub async fn home() -> Json<Value> {
    Json(json!({
        "service": "graymatter",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}
