use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::http_server::state::AppState;

pub async fn health(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": app_state.service_name,
        "ytmusic_initialized": app_state.catalog.is_ready(),
    }))
}
