//! Parametric motion models.
//!
//! Each model owns its private state and advances one tick at a time.
//! No ECS dependency; operates on plain data.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use overwatch_core::components::normalize_heading;
use overwatch_core::constants::*;
use overwatch_core::enums::MotionModelKind;
use overwatch_core::types::{lon_scale, GeoPoint};

/// Where a model puts its track after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: GeoPoint,
    /// Degrees in [0, 360).
    pub heading: f64,
    /// False once the model has stopped for good.
    pub moving: bool,
}

/// The single capability both motion models share.
pub trait MotionModel {
    /// Advance one tick and report the new state.
    fn advance(&mut self) -> MotionSample;

    /// Current state without advancing.
    fn sample(&self) -> MotionSample;
}

/// Closed elliptical patrol.
///
/// `lat = c_lat + ry·sin θ`, `lng = c_lng + rx·cos θ`. Increasing θ runs
/// counterclockwise (east → north → west).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipticalOrbit {
    pub center: GeoPoint,
    /// Longitude radius in degrees, already widened by `1/cos(lat)`.
    pub radius_x: f64,
    /// Latitude radius in degrees.
    pub radius_y: f64,
    /// Radians per tick, always positive.
    pub angular_speed: f64,
    /// Radians in [0, 2π).
    pub angle: f64,
    pub clockwise: bool,
}

/// Forward transit along a gently curving path, frozen after a tick cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CappedTransit {
    pub start: GeoPoint,
    /// Initial direction, degrees from North.
    pub direction: f64,
    /// Ground distance per tick, degrees of latitude.
    pub step: f64,
    /// Lateral offset per squared degree travelled.
    pub curvature: f64,
    /// Distance travelled so far (degrees). Never decreases.
    pub distance: f64,
    pub ticks_travelled: u32,
    pub tick_cap: u32,
}

/// Per-track motion component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Orbit(EllipticalOrbit),
    Transit(CappedTransit),
}

impl EllipticalOrbit {
    /// Build an orbit around `center`.
    ///
    /// Both radii are given in ground degrees and clamped to
    /// `MIN_ORBIT_RADIUS_DEG`; the longitude radius is then corrected by
    /// `cos(lat)` so the patrol keeps its shape on the map.
    pub fn new(
        center: GeoPoint,
        radius_x_deg: f64,
        radius_y_deg: f64,
        angular_speed: f64,
        start_angle: f64,
        clockwise: bool,
    ) -> Self {
        let radius_x = positive_or(radius_x_deg, MIN_ORBIT_RADIUS_DEG) / lon_scale(center.latitude);
        let radius_y = positive_or(radius_y_deg, MIN_ORBIT_RADIUS_DEG);
        let angular_speed = positive_or(angular_speed.abs(), MIN_ANGULAR_SPEED);
        let angle = if start_angle.is_finite() {
            start_angle.rem_euclid(TAU)
        } else {
            0.0
        };
        Self {
            center,
            radius_x,
            radius_y,
            angular_speed,
            angle,
            clockwise,
        }
    }

    fn direction_sign(&self) -> f64 {
        if self.clockwise {
            -1.0
        } else {
            1.0
        }
    }

    fn position_at(&self, angle: f64) -> GeoPoint {
        GeoPoint::new(
            self.center.latitude + self.radius_y * angle.sin(),
            self.center.longitude + self.radius_x * angle.cos(),
        )
        .normalized()
    }

    /// Tangent direction from the derivative of the parametric ellipse.
    fn heading_at(&self, angle: f64) -> f64 {
        let d_lat = self.radius_y * angle.cos();
        let d_lng = -self.radius_x * angle.sin();
        // (north, east) in ground degrees
        let tangent = DVec2::new(d_lat, d_lng * lon_scale(self.center.latitude))
            * self.direction_sign();
        normalize_heading(tangent.y.atan2(tangent.x).to_degrees())
    }
}

impl MotionModel for EllipticalOrbit {
    fn advance(&mut self) -> MotionSample {
        self.angle = (self.angle + self.direction_sign() * self.angular_speed).rem_euclid(TAU);
        // rem_euclid may round to exactly TAU
        if self.angle >= TAU {
            self.angle = 0.0;
        }
        self.sample()
    }

    fn sample(&self) -> MotionSample {
        MotionSample {
            position: self.position_at(self.angle),
            heading: self.heading_at(self.angle),
            moving: true,
        }
    }
}

impl CappedTransit {
    pub fn new(start: GeoPoint, direction: f64, step: f64, curvature: f64, tick_cap: u32) -> Self {
        Self {
            start,
            direction: normalize_heading(if direction.is_finite() { direction } else { 0.0 }),
            step: positive_or(step, MIN_TRANSIT_STEP_DEG),
            curvature: if curvature.is_finite() { curvature } else { 0.0 },
            distance: 0.0,
            ticks_travelled: 0,
            tick_cap: tick_cap.max(1),
        }
    }

    pub fn is_capped(&self) -> bool {
        self.ticks_travelled >= self.tick_cap
    }

    fn position_at(&self, distance: f64) -> GeoPoint {
        let d = self.direction.to_radians();
        let forward = DVec2::new(d.cos(), d.sin());
        let lateral = DVec2::new(-d.sin(), d.cos());
        let offset = forward * distance + lateral * (self.curvature * distance * distance);
        GeoPoint::new(
            self.start.latitude + offset.x,
            self.start.longitude + offset.y / lon_scale(self.start.latitude),
        )
        .normalized()
    }

    fn heading_at(&self, distance: f64) -> f64 {
        let bend = (2.0 * self.curvature * distance).atan().to_degrees();
        normalize_heading(self.direction + bend)
    }
}

impl MotionModel for CappedTransit {
    fn advance(&mut self) -> MotionSample {
        if !self.is_capped() {
            self.ticks_travelled += 1;
            self.distance = self.step * self.ticks_travelled as f64;
        }
        self.sample()
    }

    fn sample(&self) -> MotionSample {
        MotionSample {
            position: self.position_at(self.distance),
            heading: self.heading_at(self.distance),
            moving: !self.is_capped(),
        }
    }
}

impl Motion {
    pub fn kind(&self) -> MotionModelKind {
        match self {
            Motion::Orbit(_) => MotionModelKind::EllipticalOrbit,
            Motion::Transit(_) => MotionModelKind::CappedTransit,
        }
    }
}

impl MotionModel for Motion {
    fn advance(&mut self) -> MotionSample {
        match self {
            Motion::Orbit(m) => m.advance(),
            Motion::Transit(m) => m.advance(),
        }
    }

    fn sample(&self) -> MotionSample {
        match self {
            Motion::Orbit(m) => m.sample(),
            Motion::Transit(m) => m.sample(),
        }
    }
}

fn positive_or(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}
