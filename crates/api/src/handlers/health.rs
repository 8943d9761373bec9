use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let registry = state.dispatcher.registry().snapshot();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "jenxt",
        "version": env!("CARGO_PKG_VERSION"),
        "scripts": registry.len(),
        "routes": registry.routes(),
        "servers": state.dispatcher.servers().len(),
    }))
}
