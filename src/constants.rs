//! Stable application-wide constants.
//!
//! Values here are structural invariants, unit conversions, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! The empirical tuning knobs of the loop generator have their defaults here
//! but are read at runtime through
//! [`LoopGeneratorConfig`](crate::config::LoopGeneratorConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Unit conversions ---

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

// --- Request limits (enforced by the HTTP layer, not the generator) ---

/// Shortest loop the API accepts, in miles.
pub const MIN_LOOP_DISTANCE_MILES: f64 = 0.5;
/// Longest loop the API accepts, in miles.
pub const MAX_LOOP_DISTANCE_MILES: f64 = 50.0;

// --- Waypoint count bands ---
// Waypoint count is a step function of target distance only, which keeps the
// directions request small regardless of radius or boundary.

/// Routes shorter than this (miles) use `WAYPOINTS_SHORT`.
pub const MEDIUM_LOOP_THRESHOLD_MILES: f64 = 5.0;
/// Routes at or above this (miles) use `WAYPOINTS_LONG`.
pub const LONG_LOOP_THRESHOLD_MILES: f64 = 13.0;
pub const WAYPOINTS_SHORT: usize = 4;
pub const WAYPOINTS_MEDIUM: usize = 6;
pub const WAYPOINTS_LONG: usize = 8;

/// A boundary needs at least this many vertices to constrain anything.
pub const MIN_BOUNDARY_VERTICES: usize = 3;

// --- Routing provider limits ---

/// Mapbox Directions accepts at most 25 coordinates per request.
pub const MAX_DIRECTIONS_WAYPOINTS: usize = 25;

// --- Loop generator defaults (overridable via LOOP_* env vars) ---

/// Road paths between waypoints are longer than the straight chords between
/// them. The circumference-derived radius is divided by this factor.
pub const DEFAULT_WINDING_FACTOR: f64 = 1.3;
/// Lower bound of the per-waypoint radius multiplier.
pub const DEFAULT_RADIUS_JITTER_MIN: f64 = 0.85;
/// Upper bound of the per-waypoint radius multiplier.
pub const DEFAULT_RADIUS_JITTER_MAX: f64 = 1.15;
/// Fraction of the way from a boundary point toward the centroid that a
/// projected waypoint is moved, so it tests as interior.
pub const DEFAULT_BOUNDARY_NUDGE_FRACTION: f64 = 0.02;
/// Meters per degree of latitude (and of longitude at the equator).
pub const DEFAULT_METERS_PER_DEGREE_LAT: f64 = 111_320.0;
/// Floor for the longitude scale so loops started at a pole stay finite.
pub const MIN_METERS_PER_DEGREE_LNG: f64 = 1.0;
/// Attempt budget for one refinement run.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
/// Accept routes up to this fraction longer than the target.
pub const DEFAULT_TOLERANCE_OVER_PCT: f64 = 0.10;
/// Accept routes up to this fraction shorter than the target (asymmetric policy).
pub const DEFAULT_TOLERANCE_UNDER_PCT: f64 = 0.03;
/// Target multiplier used when correcting the radius (asymmetric policy).
/// Road networks tend to under-deliver, so corrections aim slightly long.
pub const DEFAULT_OVERSHOOT_BIAS: f64 = 1.05;
