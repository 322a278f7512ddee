//! Fundamental geographic and simulation types.

use serde::{Deserialize, Serialize};

/// Geographic position in degrees (WGS84-ish, no datum handling).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Map viewport: where the display is centred and how far it is zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Bring the point back into the valid lat/lng domain.
    /// Latitude is clamped to [-90, 90], longitude wrapped to [-180, 180).
    pub fn normalized(self) -> Self {
        Self {
            latitude: self.latitude.clamp(-90.0, 90.0),
            longitude: (self.longitude + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    /// Whether both coordinates are finite and inside the valid domain.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..180.0).contains(&self.longitude)
    }

    /// Offset by a bearing (degrees, 0 = North, clockwise) and a distance
    /// in degrees of latitude. The east component is widened by `1/cos(lat)`
    /// so the offset covers the same ground distance in both axes.
    pub fn offset(&self, bearing_deg: f64, distance_deg: f64) -> Self {
        let bearing = bearing_deg.to_radians();
        let lon_scale = lon_scale(self.latitude);
        Self {
            latitude: self.latitude + distance_deg * bearing.cos(),
            longitude: self.longitude + distance_deg * bearing.sin() / lon_scale,
        }
        .normalized()
    }
}

/// Longitude stretch factor at a latitude: `cos(lat)`, floored so that
/// dividing by it near the poles stays finite.
pub fn lon_scale(latitude_deg: f64) -> f64 {
    latitude_deg
        .to_radians()
        .cos()
        .abs()
        .max(crate::constants::MIN_LON_SCALE)
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(
                crate::constants::DEFAULT_CENTER_LAT,
                crate::constants::DEFAULT_CENTER_LON,
            ),
            zoom: crate::constants::DEFAULT_ZOOM,
        }
    }
}
