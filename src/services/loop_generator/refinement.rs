use crate::config::{LoopGeneratorConfig, TolerancePolicy};
use crate::models::{DistanceMeters, RadiusMeters};

/// Feedback carried from one attempt to the next. Lives for one run only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RefinementState {
    /// Attempts already sent to the routing provider
    pub attempt: u32,
    pub last_radius: Option<RadiusMeters>,
    pub last_observed: Option<DistanceMeters>,
}

impl RefinementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State after an attempt at `radius` came back `observed` long
    pub fn record(self, radius: RadiusMeters, observed: DistanceMeters) -> Self {
        RefinementState {
            attempt: self.attempt + 1,
            last_radius: Some(radius),
            last_observed: Some(observed),
        }
    }

    /// Radius for the next attempt.
    ///
    /// The first attempt uses `initial` unchanged. Later attempts scale the
    /// previous radius by `sqrt(biased_target / observed)`.
    pub fn next_radius(
        &self,
        initial: RadiusMeters,
        target: DistanceMeters,
        tolerance: &Tolerance,
    ) -> RadiusMeters {
        let previous = self.last_radius.unwrap_or(initial);
        match self.last_observed {
            Some(observed) if observed.as_meters() > 0.0 => {
                let ratio = target.as_meters() * tolerance.overshoot_bias / observed.as_meters();
                previous * ratio.sqrt()
            }
            _ => previous,
        }
    }
}

/// Acceptance band around the target distance, resolved from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub policy: TolerancePolicy,
    /// Largest accepted `pct_diff`
    pub max_over: f64,
    /// Largest accepted shortfall, as a positive fraction
    pub max_under: f64,
    pub overshoot_bias: f64,
}

impl Tolerance {
    pub fn from_config(config: &LoopGeneratorConfig) -> Self {
        match config.tolerance_policy {
            TolerancePolicy::Asymmetric => Tolerance {
                policy: TolerancePolicy::Asymmetric,
                max_over: config.tolerance_over_pct,
                max_under: config.tolerance_under_pct,
                overshoot_bias: config.overshoot_bias,
            },
            TolerancePolicy::Symmetric => Tolerance {
                policy: TolerancePolicy::Symmetric,
                max_over: config.tolerance_over_pct,
                max_under: config.tolerance_over_pct,
                overshoot_bias: 1.0,
            },
        }
    }

    /// Bounds are inclusive.
    pub fn accepts(&self, pct_diff: f64) -> bool {
        (-self.max_under..=self.max_over).contains(&pct_diff)
    }
}

/// Signed relative error of `observed` against `target` (0.1 = 10% long).
pub fn pct_diff(observed: DistanceMeters, target: DistanceMeters) -> f64 {
    (observed.as_meters() - target.as_meters()) / target.as_meters()
}
