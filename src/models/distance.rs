use crate::constants::METERS_PER_MILE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// Distance in statute miles, the unit loop targets are requested in
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMiles(pub f64);

impl DistanceMiles {
    /// Targets must be strictly positive; a zero-length loop has no radius.
    pub fn new(miles: f64) -> Result<Self, String> {
        if !miles.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        if miles <= 0.0 {
            return Err("Distance must be positive".to_string());
        }
        Ok(DistanceMiles(miles))
    }

    pub fn to_meters(self) -> DistanceMeters {
        DistanceMeters(self.0 * METERS_PER_MILE)
    }

    pub fn as_miles(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceMiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}mi", self.0)
    }
}

impl From<DistanceMeters> for DistanceMiles {
    fn from(meters: DistanceMeters) -> Self {
        DistanceMiles(meters.0 / METERS_PER_MILE)
    }
}

/// Distance in meters
/// Used for radii and for what the routing provider reports
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    pub fn new(meters: f64) -> Result<Self, String> {
        if meters < 0.0 {
            return Err("Distance cannot be negative".to_string());
        }
        if !meters.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        Ok(DistanceMeters(meters))
    }

    pub fn to_miles(self) -> DistanceMiles {
        DistanceMiles::from(self)
    }

    pub fn as_meters(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m", self.0)
    }
}

impl From<DistanceMiles> for DistanceMeters {
    fn from(miles: DistanceMiles) -> Self {
        miles.to_meters()
    }
}

impl Mul<f64> for DistanceMeters {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        DistanceMeters(self.0 * scalar)
    }
}

impl Div<f64> for DistanceMeters {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        DistanceMeters(self.0 / scalar)
    }
}

/// Radius in meters - semantically similar to DistanceMeters but clearer intent
pub type RadiusMeters = DistanceMeters;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_miles_creation() {
        assert!(DistanceMiles::new(5.0).is_ok());
        assert!(DistanceMiles::new(0.0).is_err());
        assert!(DistanceMiles::new(-1.0).is_err());
        assert!(DistanceMiles::new(f64::INFINITY).is_err());
        assert!(DistanceMiles::new(f64::NAN).is_err());
    }

    #[test]
    fn test_miles_to_meters() {
        let miles = DistanceMiles::new(5.0).unwrap();
        assert!((miles.to_meters().as_meters() - 8046.7).abs() < 1e-6);

        let back: DistanceMiles = DistanceMeters(1609.34).into();
        assert!((back.as_miles() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_meters_arithmetic() {
        let d = DistanceMeters::new(1000.0).unwrap();
        assert_eq!((d * 1.5).as_meters(), 1500.0);
        assert_eq!((d / 4.0).as_meters(), 250.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DistanceMiles(5.126)), "5.13mi");
        assert_eq!(format!("{}", DistanceMeters(150.54)), "150.5m");
    }
}
