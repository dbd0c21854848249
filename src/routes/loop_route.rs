use crate::error::{AppError, Result};
use crate::models::route::{LoopRouteRequest, LoopRouteResponse};
use crate::services::loop_generator::LoopRouteParams;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/loop
/// Generate a loop route that starts and ends at the same point
pub async fn create_loop_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoopRouteRequest>,
) -> Result<Json<LoopRouteResponse>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        lat = request.start_point.lat,
        lng = request.start_point.lng,
        distance_miles = request.distance_miles,
        mode = %request.mode,
        boundary_vertices = request.boundary.as_ref().map_or(0, |b| b.len()),
        "Loop route request: ({:.4}, {:.4}), {:.1}mi, mode={}",
        request.start_point.lat, request.start_point.lng,
        request.distance_miles, request.mode
    );

    let params = LoopRouteParams {
        start: request.start_point,
        target_miles: request.distance_miles,
        mode: &request.mode,
        boundary: request.boundary.as_deref(),
        radius_override_m: request.effective_radius_override(),
    };

    let route = state
        .loop_generator
        .generate_loop_route(params, request.seed)
        .await?;

    if !route.within_tolerance {
        tracing::info!(
            distance_miles = %format!("{:.2}", route.distance_miles),
            target_miles = request.distance_miles,
            "Returning loop outside tolerance: {:.2}mi for {:.1}mi target",
            route.distance_miles, request.distance_miles
        );
    }

    Ok(Json(LoopRouteResponse { route }))
}
