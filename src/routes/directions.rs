use crate::error::{AppError, Result};
use crate::models::DirectionsRequest;
use crate::services::mapbox::DirectionsResponse;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /directions
/// Forward an ordered waypoint list to the routing provider as-is
pub async fn relay_directions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DirectionsRequest>,
) -> Result<Json<DirectionsResponse>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let provider = state.loop_generator.routing_provider();
    tracing::debug!(
        waypoints = request.waypoints.len(),
        provider = provider.name(),
        mode = %request.mode,
        "Relaying {} {} waypoints to {}",
        request.waypoints.len(),
        request.mode,
        provider.name()
    );

    let directions = provider
        .get_directions(&request.waypoints, &request.mode)
        .await?;

    Ok(Json(directions))
}
