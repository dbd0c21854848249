pub mod geometry;
pub mod refinement;
pub mod waypoints;

use crate::config::LoopGeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, DistanceMeters, DistanceMiles, LoopRoute, RadiusMeters, TransportMode,
};
use crate::services::mapbox::{DirectionsResponse, RoutingProvider};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use uuid::Uuid;

use refinement::{pct_diff, RefinementState, Tolerance};
use waypoints::{base_radius, generate_waypoints, WaypointParams};

/// Parameters for one refinement run
#[derive(Debug, Clone)]
pub struct LoopRouteParams<'a> {
    pub start: Coordinates,
    pub target_miles: f64,
    pub mode: &'a TransportMode,
    pub boundary: Option<&'a [Coordinates]>,
    /// First-attempt radius; later attempts always use the corrected radius
    pub radius_override_m: Option<f64>,
}

/// Drives waypoint placement against a routing provider until the loop
/// distance lands inside the tolerance band or the attempt budget runs out.
pub struct LoopRouteGenerator {
    routing: Arc<dyn RoutingProvider>,
    config: LoopGeneratorConfig,
    tolerance: Tolerance,
}

impl LoopRouteGenerator {
    pub fn new(routing: Arc<dyn RoutingProvider>, config: LoopGeneratorConfig) -> Self {
        let tolerance = Tolerance::from_config(&config);
        Self {
            routing,
            config,
            tolerance,
        }
    }

    pub fn config(&self) -> &LoopGeneratorConfig {
        &self.config
    }

    pub fn routing_provider(&self) -> &Arc<dyn RoutingProvider> {
        &self.routing
    }

    /// Run a refinement loop, seeded for reproducibility when `seed` is given.
    pub async fn generate_loop_route(
        &self,
        params: LoopRouteParams<'_>,
        seed: Option<u64>,
    ) -> Result<LoopRoute> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => rand::make_rng(),
        };
        self.generate_loop_route_with_rng(params, &mut rng).await
    }

    /// Run a refinement loop drawing all randomness from `rng`.
    ///
    /// Attempts are strictly sequential: each radius depends on the previous
    /// observed distance. Routing failures (including "no route found") end the
    /// run immediately. Running out of attempts does not; the last route is
    /// returned with `within_tolerance: false`.
    pub async fn generate_loop_route_with_rng<R: Rng + Send + ?Sized>(
        &self,
        params: LoopRouteParams<'_>,
        rng: &mut R,
    ) -> Result<LoopRoute> {
        let target = DistanceMiles::new(params.target_miles).map_err(AppError::InvalidRequest)?;
        let target_m = target.to_meters();
        let initial_radius = match params.radius_override_m.filter(|r| *r > 0.0) {
            Some(r) => RadiusMeters::new(r).map_err(AppError::InvalidRequest)?,
            None => base_radius(target, &self.config),
        };

        tracing::info!(
            lat = params.start.lat,
            lng = params.start.lng,
            target = %target,
            initial_radius = %initial_radius,
            mode = %params.mode,
            policy = self.tolerance.policy.as_str(),
            "Generating {} loop from ({:.4}, {:.4}), target {}, initial radius {}",
            params.mode, params.start.lat, params.start.lng, target, initial_radius
        );

        let mut state = RefinementState::new();
        loop {
            let radius = state.next_radius(initial_radius, target_m, &self.tolerance);
            let waypoints = generate_waypoints(
                &WaypointParams {
                    start: params.start,
                    target,
                    radius: Some(radius),
                    boundary: params.boundary,
                },
                &self.config,
                &mut *rng,
            );

            let directions = match self
                .routing
                .get_directions(&loop_waypoints(&params.start, &waypoints), params.mode)
                .await
            {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(
                        attempt = state.attempt + 1,
                        error = %e,
                        "Routing call failed on attempt {}: {}",
                        state.attempt + 1, e
                    );
                    return Err(e);
                }
            };

            let observed = DistanceMeters(directions.distance_meters);
            let diff = pct_diff(observed, target_m);
            state = state.record(radius, observed);

            tracing::info!(
                attempt = state.attempt,
                radius = %radius,
                observed = %observed,
                target = %target_m,
                pct_diff = %format!("{:+.1}", diff * 100.0),
                "Attempt {}: {} vs target {} ({:+.1}%)",
                state.attempt, observed, target_m, diff * 100.0
            );

            if self.tolerance.accepts(diff) {
                tracing::info!(
                    attempts = state.attempt,
                    "Loop route accepted after {} attempt(s)",
                    state.attempt
                );
                return Ok(build_route(waypoints, directions, &state, radius, true));
            }

            if state.attempt >= self.config.max_attempts {
                tracing::warn!(
                    attempts = state.attempt,
                    pct_diff = %format!("{:+.1}", diff * 100.0),
                    "Attempt budget exhausted, returning last route ({:+.1}% off target)",
                    diff * 100.0
                );
                return Ok(build_route(waypoints, directions, &state, radius, false));
            }
        }
    }
}

/// Full request order for a loop: start, waypoints, back to start.
pub fn loop_waypoints(start: &Coordinates, waypoints: &[Coordinates]) -> Vec<Coordinates> {
    let mut full = Vec::with_capacity(waypoints.len() + 2);
    full.push(*start);
    full.extend_from_slice(waypoints);
    full.push(*start);
    full
}

fn build_route(
    waypoints: Vec<Coordinates>,
    directions: DirectionsResponse,
    state: &RefinementState,
    radius: RadiusMeters,
    within_tolerance: bool,
) -> LoopRoute {
    let distance_m = DistanceMeters(directions.distance_meters);
    LoopRoute {
        id: Uuid::new_v4(),
        waypoints,
        distance_m: distance_m.as_meters(),
        distance_miles: distance_m.to_miles().as_miles(),
        duration_minutes: directions.duration_minutes(),
        path: directions.to_coordinates(),
        steps: directions.steps,
        attempts: state.attempt,
        radius_m: radius.as_meters(),
        within_tolerance,
    }
}
