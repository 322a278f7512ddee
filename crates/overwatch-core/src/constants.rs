//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 10;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Geography ---

/// Default map centre (Taipei).
pub const DEFAULT_CENTER_LAT: f64 = 25.047;
pub const DEFAULT_CENTER_LON: f64 = 121.532;

/// Default map zoom level.
pub const DEFAULT_ZOOM: u8 = 7;

/// Floor for `cos(lat)` when stretching longitude offsets.
pub const MIN_LON_SCALE: f64 = 0.01;

// --- Threat attributes ---

/// Lower bound for threat, armament and strategic value.
pub const ATTRIBUTE_MIN: f64 = 1.0;

/// Upper bound for threat, armament and strategic value.
pub const ATTRIBUTE_MAX: f64 = 10.0;

/// Weight of threat level in the strategic value composite.
pub const STRATEGIC_THREAT_WEIGHT: f64 = 0.6;

/// Weight of armament level in the strategic value composite.
pub const STRATEGIC_ARMAMENT_WEIGHT: f64 = 0.4;

/// Strategic value bonus for designated high-value entities.
pub const HIGH_VALUE_BONUS: f64 = 1.0;

/// Attribution base confidence before threat scaling.
pub const ATTRIBUTION_BASE: f64 = 0.35;

/// Attribution gained per threat level point.
pub const ATTRIBUTION_PER_THREAT: f64 = 0.06;

/// Half-width of the uniform attribution jitter.
pub const ATTRIBUTION_JITTER: f64 = 0.05;

// --- Generator ---

/// Default spread radius for generated scenarios (degrees).
pub const DEFAULT_SPREAD_DEG: f64 = 1.5;

/// Formation centres are placed within this fraction of the spread radius.
pub const FORMATION_CENTER_SPREAD: f64 = 0.7;

/// Wingmen scatter within this fraction of the spread radius around their lead.
pub const FORMATION_SCATTER: f64 = 0.25;

/// Minimum and maximum number of random formations.
pub const MIN_FORMATIONS: usize = 3;
pub const MAX_FORMATIONS: usize = 4;

// --- Elliptical orbit ---

/// Orbit radius range (degrees of latitude).
pub const ORBIT_RADIUS_MIN_DEG: f64 = 0.08;
pub const ORBIT_RADIUS_MAX_DEG: f64 = 0.35;

/// Orbit angular speed range (radians per tick).
pub const ORBIT_ANGULAR_SPEED_MIN: f64 = 0.01;
pub const ORBIT_ANGULAR_SPEED_MAX: f64 = 0.03;

/// Smallest radius an orbit is allowed to have after clamping.
pub const MIN_ORBIT_RADIUS_DEG: f64 = 1.0e-4;

/// Smallest angular speed an orbit is allowed to have after clamping.
pub const MIN_ANGULAR_SPEED: f64 = 1.0e-4;

// --- Capped transit ---

/// Per-tick step range (degrees).
pub const TRANSIT_STEP_MIN_DEG: f64 = 0.002;
pub const TRANSIT_STEP_MAX_DEG: f64 = 0.006;

/// Curvature coefficient range (1/degree). Sign picked at random.
pub const TRANSIT_CURVATURE_MAX: f64 = 0.4;

/// Default number of ticks a transit runs before freezing.
pub const TRANSIT_TICK_CAP: u32 = 300;

/// Smallest per-tick step a transit is allowed to have after clamping.
pub const MIN_TRANSIT_STEP_DEG: f64 = 1.0e-5;

// --- Kinematics ---

/// Cruise altitude range (metres).
pub const ALTITUDE_MIN_M: f64 = 3_000.0;
pub const ALTITUDE_MAX_M: f64 = 12_000.0;

/// Cruise speed range (knots).
pub const SPEED_MIN_KT: f64 = 350.0;
pub const SPEED_MAX_KT: f64 = 650.0;

// --- Styling ---

/// Icon size for a strategic value of zero (pixels).
pub const ICON_BASE_PX: f64 = 20.0;

/// Icon size gained per strategic value point (pixels).
pub const ICON_PX_PER_VALUE: f64 = 2.0;

/// Icon size clamp (pixels).
pub const ICON_MIN_PX: f64 = 20.0;
pub const ICON_MAX_PX: f64 = 40.0;

// --- Heat layers ---

/// Heat intensity for plain replay points that carry no strategic value.
pub const PLAIN_POINT_INTENSITY: f64 = 0.5;

/// Primary heat layer radius and blur (pixels).
pub const HEAT_RADIUS_PX: f64 = 25.0;
pub const HEAT_BLUR_PX: f64 = 15.0;

/// Attribution heat layer radius and blur (pixels).
pub const ATTRIBUTION_HEAT_RADIUS_PX: f64 = 45.0;
pub const ATTRIBUTION_HEAT_BLUR_PX: f64 = 30.0;

/// How long overlay construction waits for the map surface before
/// giving up on the ready signal and drawing anyway (milliseconds).
pub const SURFACE_READY_TIMEOUT_MS: u64 = 1_000;
