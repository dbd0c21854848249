use super::geometry::{active_boundary, nearest_point_on_polygon, point_in_polygon};
use crate::config::LoopGeneratorConfig;
use crate::constants::*;
use crate::models::{Coordinates, DistanceMiles, RadiusMeters};
use rand::{Rng, RngExt};
use std::f64::consts::TAU;

/// Number of intermediate waypoints for a loop of the given length.
/// Depends on distance only, never on radius or boundary.
pub fn waypoint_count(target_miles: f64) -> usize {
    if target_miles < MEDIUM_LOOP_THRESHOLD_MILES {
        WAYPOINTS_SHORT
    } else if target_miles < LONG_LOOP_THRESHOLD_MILES {
        WAYPOINTS_MEDIUM
    } else {
        WAYPOINTS_LONG
    }
}

/// Radius of the circle whose winding-corrected circumference is the target.
pub fn base_radius(target: DistanceMiles, config: &LoopGeneratorConfig) -> RadiusMeters {
    target.to_meters() / (TAU * config.winding_factor)
}

/// Inputs for one waypoint placement
#[derive(Debug, Clone, Copy)]
pub struct WaypointParams<'a> {
    pub start: Coordinates,
    pub target: DistanceMiles,
    /// Used instead of [`base_radius`] when set
    pub radius: Option<RadiusMeters>,
    pub boundary: Option<&'a [Coordinates]>,
}

/// Place waypoints on a jittered circle around `start`.
///
/// The whole ring is rotated by one random offset, and each waypoint gets its
/// own radius multiplier from the configured jitter range, so repeated calls
/// give differently shaped loops. With an active boundary, any point that
/// lands outside is pulled back to the nearest boundary point and nudged
/// toward the centroid.
pub fn generate_waypoints<R: Rng + ?Sized>(
    params: &WaypointParams<'_>,
    config: &LoopGeneratorConfig,
    rng: &mut R,
) -> Vec<Coordinates> {
    let count = waypoint_count(params.target.as_miles());
    let radius_m = params
        .radius
        .unwrap_or_else(|| base_radius(params.target, config))
        .as_meters();
    let boundary = active_boundary(params.boundary);

    let offset = rng.random_range(0.0..TAU);
    let meters_per_degree_lng = (config.meters_per_degree_lat * params.start.lat.to_radians().cos())
        .max(MIN_METERS_PER_DEGREE_LNG);

    (0..count)
        .map(|i| {
            let angle = offset + TAU * i as f64 / count as f64;
            let jitter = rng.random_range(config.radius_jitter_min..=config.radius_jitter_max);
            let r = radius_m * jitter;

            let lat = params.start.lat + r * angle.cos() / config.meters_per_degree_lat;
            let lng = params.start.lng + r * angle.sin() / meters_per_degree_lng;
            let point = Coordinates::normalized(lat, lng);

            match boundary {
                Some(polygon) if !point_in_polygon(&point, polygon) => {
                    constrain_to_boundary(&point, polygon, config.boundary_nudge_fraction)
                }
                _ => point,
            }
        })
        .collect()
}

fn constrain_to_boundary(
    point: &Coordinates,
    polygon: &[Coordinates],
    nudge_fraction: f64,
) -> Coordinates {
    let placed = nearest_point_on_polygon(point, polygon, nudge_fraction);
    if point_in_polygon(&placed, polygon) {
        tracing::debug!(
            from_lat = point.lat,
            from_lng = point.lng,
            to_lat = placed.lat,
            to_lng = placed.lng,
            "Waypoint outside boundary, moved to ({:.5}, {:.5})",
            placed.lat,
            placed.lng
        );
    } else {
        // only a ring with no area gets here
        tracing::warn!(
            lat = placed.lat,
            lng = placed.lng,
            vertices = polygon.len(),
            "Boundary has no interior, waypoint left on its edge"
        );
    }
    placed
}
