use crate::constants::MAX_DIRECTIONS_WAYPOINTS;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, RouteStep, TransportMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MAPBOX_DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

/// Anything that can snap an ordered waypoint list to real roads.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Route through `waypoints` in order. An empty result is
    /// `AppError::NoRouteFound`, never an empty response.
    async fn get_directions(
        &self,
        waypoints: &[Coordinates],
        mode: &TransportMode,
    ) -> Result<DirectionsResponse>;

    fn name(&self) -> &str;
}

/// How the client authenticates with the directions API.
#[derive(Clone, Debug)]
pub enum AuthMode {
    /// Send `access_token` query param (direct Mapbox).
    DirectToken,
    /// Proxy mode: send `Authorization: Bearer` header.
    BearerHeader,
}

#[derive(Clone)]
pub struct MapboxClient {
    client: Client,
    api_key: String,
    base_url: String,
    auth_mode: AuthMode,
}

impl MapboxClient {
    pub fn new(api_key: String) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_DIRECTIONS_BASE_URL.to_string(),
            auth_mode: AuthMode::DirectToken,
        }
    }

    pub fn with_config(api_key: String, base_url: String, auth_mode: AuthMode) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url,
            auth_mode,
        }
    }
}

#[async_trait]
impl RoutingProvider for MapboxClient {
    /// Get directions between waypoints
    /// Returns the first route with full geometry, distance, duration and steps
    async fn get_directions(
        &self,
        waypoints: &[Coordinates],
        mode: &TransportMode,
    ) -> Result<DirectionsResponse> {
        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints required".to_string(),
            ));
        }

        if waypoints.len() > MAX_DIRECTIONS_WAYPOINTS {
            return Err(AppError::InvalidRequest(format!(
                "Maximum {} waypoints allowed",
                MAX_DIRECTIONS_WAYPOINTS
            )));
        }

        // Format coordinates as "lng,lat;lng,lat;..."
        let coordinates_str = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/{}/{}",
            self.base_url,
            mode.mapbox_profile(),
            coordinates_str
        );

        tracing::debug!(
            waypoints = waypoints.len(),
            mode = %mode.mapbox_profile(),
            "Mapbox API request: {} waypoints, profile {}",
            waypoints.len(), mode.mapbox_profile()
        );

        let mut request = self.client.get(&url).query(&[
            ("geometries", "geojson"),
            ("overview", "full"),
            ("steps", "true"),
        ]);

        match self.auth_mode {
            AuthMode::DirectToken => {
                request = request.query(&[("access_token", &self.api_key)]);
            }
            AuthMode::BearerHeader => {
                request = request.bearer_auth(&self.api_key);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                waypoints = waypoints.len(),
                "Mapbox API HTTP error {}: {}",
                status, error_text
            );
            if is_no_route_body(&error_text) {
                return Err(AppError::no_route_found());
            }
            return Err(AppError::RoutingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: MapboxDirectionsApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))?;

        let parsed = directions.into_directions();
        if matches!(parsed, Err(AppError::NoRouteFound(_))) {
            tracing::warn!(
                waypoints = waypoints.len(),
                mode = %mode.mapbox_profile(),
                "Mapbox returned 0 routes for {} waypoints ({})",
                waypoints.len(), mode.mapbox_profile()
            );
        }
        let parsed = parsed?;

        tracing::debug!(
            distance_m = %format!("{:.0}", parsed.distance_meters),
            duration_min = %format!("{:.0}", parsed.duration_seconds / 60.0),
            path_points = parsed.geometry.len(),
            "Mapbox response: {:.0}m, {:.0}min, {} path points",
            parsed.distance_meters, parsed.duration_seconds / 60.0, parsed.geometry.len()
        );
        Ok(parsed)
    }

    fn name(&self) -> &str {
        "mapbox"
    }
}

/// Mapbox signals unroutable input with these codes, on 200 or 4xx responses.
fn is_no_route_code(code: &str) -> bool {
    matches!(code, "NoRoute" | "NoSegment")
}

fn is_no_route_body(body: &str) -> bool {
    serde_json::from_str::<MapboxErrorBody>(body)
        .ok()
        .and_then(|b| b.code)
        .is_some_and(|code| is_no_route_code(&code))
}

// Mapbox API response types

#[derive(Debug, Deserialize)]
struct MapboxErrorBody {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapboxDirectionsApiResponse {
    #[serde(default)]
    routes: Vec<MapboxRoute>,
    code: String,
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: MapboxGeometry,
    #[serde(default)]
    legs: Vec<MapboxLeg>,
}

#[derive(Debug, Deserialize)]
struct MapboxGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
    #[allow(dead_code)]
    #[serde(rename = "type")]
    geometry_type: String,
}

#[derive(Debug, Deserialize)]
struct MapboxLeg {
    #[serde(default)]
    steps: Vec<MapboxStep>,
}

#[derive(Debug, Deserialize)]
struct MapboxStep {
    distance: f64,
    maneuver: MapboxManeuver,
}

#[derive(Debug, Deserialize)]
struct MapboxManeuver {
    #[serde(default)]
    instruction: String,
}

impl MapboxDirectionsApiResponse {
    fn into_directions(self) -> Result<DirectionsResponse> {
        if is_no_route_code(&self.code) {
            return Err(AppError::no_route_found());
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(AppError::no_route_found)?;

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| RouteStep {
                instruction: step.maneuver.instruction,
                distance_m: step.distance,
            })
            .collect();

        Ok(DirectionsResponse {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.coordinates,
            steps,
        })
    }
}

// Our simplified response type

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

impl DirectionsResponse {
    pub fn duration_minutes(&self) -> u32 {
        (self.duration_seconds / 60.0).round() as u32
    }

    /// Convert GeoJSON coordinates to our Coordinates type
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        self.geometry
            .iter()
            .filter_map(|coord| Coordinates::new(coord[1], coord[0]).ok())
            .collect()
    }
}
