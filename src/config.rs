use crate::constants::*;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TolerancePolicy {
    /// +over / -under around the target, with an overshoot bias on corrections
    #[default]
    Asymmetric,
    /// ±over around the target, corrections aim at the exact target
    Symmetric,
}

impl TolerancePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TolerancePolicy::Asymmetric => "asymmetric",
            TolerancePolicy::Symmetric => "symmetric",
        }
    }
}

impl std::str::FromStr for TolerancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asymmetric" => Ok(TolerancePolicy::Asymmetric),
            "symmetric" => Ok(TolerancePolicy::Symmetric),
            _ => Err(format!(
                "Invalid tolerance policy: {}. Use 'asymmetric' or 'symmetric'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mapbox_api_key: String,
    /// Directions endpoint override; when set the key is sent as a bearer header
    pub mapbox_base_url: Option<String>,
    /// Directory served for any path the API does not handle
    pub static_dir: Option<String>,
    pub loop_generator: LoopGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct LoopGeneratorConfig {
    /// Divisor applied to the circumference-derived radius.
    /// Real roads wind, so a loop through the waypoints is longer than the circle.
    pub winding_factor: f64,

    /// Lower bound of the per-waypoint radius multiplier
    pub radius_jitter_min: f64,

    /// Upper bound of the per-waypoint radius multiplier
    pub radius_jitter_max: f64,

    /// How far (0..1) a boundary-projected waypoint moves toward the centroid
    pub boundary_nudge_fraction: f64,

    /// Meters per degree of latitude
    pub meters_per_degree_lat: f64,

    /// Maximum routing calls per refinement run
    pub max_attempts: u32,

    pub tolerance_policy: TolerancePolicy,

    /// Accepted overshoot as a fraction of the target (0.10 = +10%)
    pub tolerance_over_pct: f64,

    /// Accepted undershoot as a fraction of the target, asymmetric policy only
    pub tolerance_under_pct: f64,

    /// Target multiplier for radius corrections, asymmetric policy only
    pub overshoot_bias: f64,
}

impl Default for LoopGeneratorConfig {
    fn default() -> Self {
        Self {
            winding_factor: DEFAULT_WINDING_FACTOR,
            radius_jitter_min: DEFAULT_RADIUS_JITTER_MIN,
            radius_jitter_max: DEFAULT_RADIUS_JITTER_MAX,
            boundary_nudge_fraction: DEFAULT_BOUNDARY_NUDGE_FRACTION,
            meters_per_degree_lat: DEFAULT_METERS_PER_DEGREE_LAT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tolerance_policy: TolerancePolicy::default(),
            tolerance_over_pct: DEFAULT_TOLERANCE_OVER_PCT,
            tolerance_under_pct: DEFAULT_TOLERANCE_UNDER_PCT,
            overshoot_bias: DEFAULT_OVERSHOOT_BIAS,
        }
    }
}

impl LoopGeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            winding_factor: env::var("LOOP_WINDING_FACTOR")
                .unwrap_or_else(|_| defaults.winding_factor.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_WINDING_FACTOR")?,

            radius_jitter_min: env::var("LOOP_RADIUS_JITTER_MIN")
                .unwrap_or_else(|_| defaults.radius_jitter_min.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_RADIUS_JITTER_MIN")?,

            radius_jitter_max: env::var("LOOP_RADIUS_JITTER_MAX")
                .unwrap_or_else(|_| defaults.radius_jitter_max.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_RADIUS_JITTER_MAX")?,

            boundary_nudge_fraction: env::var("LOOP_BOUNDARY_NUDGE_FRACTION")
                .unwrap_or_else(|_| defaults.boundary_nudge_fraction.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_BOUNDARY_NUDGE_FRACTION")?,

            meters_per_degree_lat: env::var("LOOP_METERS_PER_DEGREE_LAT")
                .unwrap_or_else(|_| defaults.meters_per_degree_lat.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_METERS_PER_DEGREE_LAT")?,

            max_attempts: env::var("LOOP_MAX_ATTEMPTS")
                .unwrap_or_else(|_| defaults.max_attempts.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_MAX_ATTEMPTS")?,

            tolerance_policy: env::var("LOOP_TOLERANCE_POLICY")
                .unwrap_or_else(|_| defaults.tolerance_policy.as_str().to_string())
                .parse()?,

            tolerance_over_pct: env::var("LOOP_TOLERANCE_OVER_PCT")
                .unwrap_or_else(|_| defaults.tolerance_over_pct.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_TOLERANCE_OVER_PCT")?,

            tolerance_under_pct: env::var("LOOP_TOLERANCE_UNDER_PCT")
                .unwrap_or_else(|_| defaults.tolerance_under_pct.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_TOLERANCE_UNDER_PCT")?,

            overshoot_bias: env::var("LOOP_OVERSHOOT_BIAS")
                .unwrap_or_else(|_| defaults.overshoot_bias.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_OVERSHOOT_BIAS")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.winding_factor > 0.0 && self.winding_factor.is_finite()) {
            return Err("LOOP_WINDING_FACTOR must be a positive number".to_string());
        }
        if !(self.radius_jitter_min > 0.0 && self.radius_jitter_min <= self.radius_jitter_max) {
            return Err(
                "LOOP_RADIUS_JITTER_MIN must be positive and not above LOOP_RADIUS_JITTER_MAX"
                    .to_string(),
            );
        }
        if !self.radius_jitter_max.is_finite() {
            return Err("LOOP_RADIUS_JITTER_MAX must be finite".to_string());
        }
        if !(self.boundary_nudge_fraction > 0.0 && self.boundary_nudge_fraction < 1.0) {
            return Err("LOOP_BOUNDARY_NUDGE_FRACTION must be between 0 and 1".to_string());
        }
        if !(self.meters_per_degree_lat > 0.0 && self.meters_per_degree_lat.is_finite()) {
            return Err("LOOP_METERS_PER_DEGREE_LAT must be a positive number".to_string());
        }
        if self.max_attempts == 0 {
            return Err("LOOP_MAX_ATTEMPTS must be at least 1".to_string());
        }
        if !(self.tolerance_over_pct >= 0.0 && self.tolerance_under_pct >= 0.0) {
            return Err("Tolerance percentages cannot be negative".to_string());
        }
        if !(self.overshoot_bias > 0.0 && self.overshoot_bias.is_finite()) {
            return Err("LOOP_OVERSHOOT_BIAS must be a positive number".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            mapbox_api_key: env::var("MAPBOX_API_KEY").map_err(|_| "MAPBOX_API_KEY must be set")?,
            mapbox_base_url: env::var("MAPBOX_BASE_URL").ok(),
            static_dir: env::var("STATIC_DIR").ok(),
            loop_generator: LoopGeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
