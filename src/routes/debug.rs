use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report service status and active generator settings
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = state.loop_generator.config();

    Json(json!({
        "status": "ok",
        "routing_provider": state.loop_generator.routing_provider().name(),
        "max_attempts": config.max_attempts,
        "tolerance_policy": config.tolerance_policy.as_str(),
    }))
}
