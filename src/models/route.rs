use crate::constants::{MAX_LOOP_DISTANCE_MILES, MIN_LOOP_DISTANCE_MILES};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Walk,
    Bike,
}

impl TransportMode {
    /// Returns the Mapbox profile name for this transport mode
    pub fn mapbox_profile(&self) -> &str {
        match self {
            TransportMode::Walk => "walking",
            TransportMode::Bike => "cycling",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Walk => write!(f, "walk"),
            TransportMode::Bike => write!(f, "bike"),
        }
    }
}

/// One turn-by-turn instruction from the routing provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopRouteRequest {
    pub start_point: Coordinates,
    pub distance_miles: f64,
    #[serde(default)]
    pub mode: TransportMode,
    /// Polygon the waypoints must stay inside; fewer than 3 vertices is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Vec<Coordinates>>,
    /// Explicit first-attempt radius; 0 means derive it from the distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_override_m: Option<f64>,
    /// Seed for reproducible waypoint placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl LoopRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        Coordinates::new(self.start_point.lat, self.start_point.lng)?;

        if !self.distance_miles.is_finite()
            || !(MIN_LOOP_DISTANCE_MILES..=MAX_LOOP_DISTANCE_MILES).contains(&self.distance_miles)
        {
            return Err(format!(
                "Distance must be between {} and {} miles",
                MIN_LOOP_DISTANCE_MILES, MAX_LOOP_DISTANCE_MILES
            ));
        }

        if let Some(radius) = self.radius_override_m {
            if !radius.is_finite() || radius < 0.0 {
                return Err("radius_override_m must be a non-negative number".to_string());
            }
        }

        if let Some(ref boundary) = self.boundary {
            for vertex in boundary {
                Coordinates::new(vertex.lat, vertex.lng)
                    .map_err(|e| format!("Invalid boundary vertex: {}", e))?;
            }
        }

        Ok(())
    }

    /// Radius override with the "0 means derive" convention applied
    pub fn effective_radius_override(&self) -> Option<f64> {
        self.radius_override_m.filter(|r| *r > 0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub waypoints: Vec<Coordinates>,
    #[serde(default)]
    pub mode: TransportMode,
}

impl DirectionsRequest {
    pub fn validate(&self) -> Result<(), String> {
        for waypoint in &self.waypoints {
            Coordinates::new(waypoint.lat, waypoint.lng)?;
        }
        Ok(())
    }
}

/// The accepted result of a refinement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopRoute {
    pub id: Uuid,
    /// Intermediate stops in loop order, excluding the shared start/end
    pub waypoints: Vec<Coordinates>,
    pub distance_m: f64,
    pub distance_miles: f64,
    pub duration_minutes: u32,
    /// GeoJSON LineString path
    pub path: Vec<Coordinates>,
    pub steps: Vec<RouteStep>,
    /// Routing calls spent on this route
    pub attempts: u32,
    /// Base radius used for the accepted waypoints
    pub radius_m: f64,
    /// False when the attempt budget ran out before the distance converged
    pub within_tolerance: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoopRouteResponse {
    pub route: LoopRoute,
}
