//! Spherical geometry for radius lookups
//!
//! Coordinates follow the GeoJSON convention everywhere in this crate:
//! longitude first, latitude second. A [`SphereRegion`] is the equivalent
//! of a `$centerSphere` query: a center point plus an angular radius in
//! radians, obtained by dividing a linear distance by the Earth's radius
//! expressed in the same unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

/// Mean Earth radius used for mile distances
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Mean Earth radius used for kilometre distances
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Unit of a linear search distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn earth_radius(self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miles => write!(f, "mi"),
            Self::Kilometers => write!(f, "km"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Ok(Self::Kilometers),
            _ => Err(DomainError::cast("unit", s)),
        }
    }
}

/// A point on the globe, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Build from a GeoJSON `[lng, lat]` pair
    pub fn from_coordinates(coordinates: [f64; 2]) -> Self {
        Self {
            lng: coordinates[0],
            lat: coordinates[1],
        }
    }

    /// GeoJSON `[lng, lat]` pair
    pub fn coordinates(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Great-circle angle between two points, in radians (haversine)
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Axis-aligned pre-filter for a [`SphereRegion`], in degrees.
///
/// `lng` is `None` when the region touches a pole or wraps the
/// antimeridian; every longitude must then be considered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub lng: Option<(f64, f64)>,
}

// Slack so that boundary points are never dropped by float rounding;
// the exact check happens in `SphereRegion::contains`.
const BOX_EPSILON_DEG: f64 = 1e-9;

/// Points whose great-circle distance from `center` is at most `radius` radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereRegion {
    pub center: GeoPoint,
    pub radius: f64,
}

impl SphereRegion {
    /// Region for a linear distance measured in `unit`.
    pub fn from_distance(center: GeoPoint, distance: f64, unit: DistanceUnit) -> DomainResult<Self> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(DomainError::Validation(format!(
                "Distance must be a non-negative number, got {}",
                distance
            )));
        }
        Ok(Self {
            center,
            radius: distance / unit.earth_radius(),
        })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        central_angle(&self.center, point) <= self.radius
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let radius_deg = self.radius.to_degrees();
        let min_lat = self.center.lat - radius_deg - BOX_EPSILON_DEG;
        let max_lat = self.center.lat + radius_deg + BOX_EPSILON_DEG;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return BoundingBox {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                lng: None,
            };
        }

        let ratio = self.radius.sin() / self.center.lat.to_radians().cos();
        if self.radius >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
            return BoundingBox {
                min_lat,
                max_lat,
                lng: None,
            };
        }

        let d_lng = ratio.asin().to_degrees() + BOX_EPSILON_DEG;
        let min_lng = self.center.lng - d_lng;
        let max_lng = self.center.lng + d_lng;
        let lng = if min_lng < -180.0 || max_lng > 180.0 {
            None
        } else {
            Some((min_lng, max_lng))
        };

        BoundingBox {
            min_lat,
            max_lat,
            lng,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
