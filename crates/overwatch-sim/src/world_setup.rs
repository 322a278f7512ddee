//! Track spawn factories for setting up the simulation world.
//!
//! Turns generator output into hecs entities, each with its own freshly
//! initialized motion model.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use overwatch_core::components::*;
use overwatch_core::constants::*;
use overwatch_core::enums::{Allegiance, MotionModelKind};
use overwatch_core::types::GeoPoint;

use crate::generator::{self, TrackSpec};
use crate::motion::{CappedTransit, EllipticalOrbit, Motion, MotionModel};
use crate::scenario::{Layout, ScenarioDef};

/// Clear the world and spawn every track of a scenario.
/// Returns the number of tracks spawned.
pub fn setup_scenario(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    def: &ScenarioDef,
    motion: MotionModelKind,
) -> usize {
    world.clear();

    let center = def.viewport.center;
    let specs = match def.layout {
        Layout::Fixed { radius_deg } => generator::fixed_layout(rng, center, radius_deg),
        Layout::Random { count, radius_deg } => {
            generator::randomized(rng, center, radius_deg, count)
        }
    };

    let count = specs.len();
    for spec in specs {
        spawn_track(world, rng, spec, motion, center);
    }
    count
}

/// Spawn one track. Its kinematics start at the motion model's initial
/// sample so the first snapshot is already on the model's path.
pub fn spawn_track(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spec: TrackSpec,
    motion: MotionModelKind,
    scenario_center: GeoPoint,
) -> hecs::Entity {
    let motion = build_motion(rng, &spec, motion, scenario_center);
    let sample = motion.sample();

    let mut kinematics = Kinematics::at(sample.position, spec.altitude, spec.cruise_speed);
    kinematics.heading = sample.heading;

    world.spawn((
        spec.identity,
        spec.threat,
        kinematics,
        CruiseSpeed(spec.cruise_speed),
        motion,
    ))
}

/// Build fresh motion state for a spawned track.
fn build_motion(
    rng: &mut ChaCha8Rng,
    spec: &TrackSpec,
    kind: MotionModelKind,
    scenario_center: GeoPoint,
) -> Motion {
    match kind {
        MotionModelKind::EllipticalOrbit => {
            let radius_y = rng.gen_range(ORBIT_RADIUS_MIN_DEG..=ORBIT_RADIUS_MAX_DEG);
            // Racetrack-ish: the long axis is up to twice the short one.
            let radius_x = radius_y * rng.gen_range(1.0..=2.0);
            Motion::Orbit(EllipticalOrbit::new(
                spec.position,
                radius_x,
                radius_y,
                rng.gen_range(ORBIT_ANGULAR_SPEED_MIN..=ORBIT_ANGULAR_SPEED_MAX),
                rng.gen_range(0.0..std::f64::consts::TAU),
                rng.gen_bool(0.5),
            ))
        }
        MotionModelKind::CappedTransit => {
            // Enemies push toward the scenario centre; friendlies push out to meet them.
            let inbound = bearing_between(spec.position, scenario_center);
            let base = match spec.identity.allegiance {
                Allegiance::Enemy => inbound,
                Allegiance::Friendly => inbound + 180.0,
            };
            let direction = base + rng.gen_range(-20.0..=20.0);
            let curvature = rng.gen_range(-TRANSIT_CURVATURE_MAX..=TRANSIT_CURVATURE_MAX);
            Motion::Transit(CappedTransit::new(
                spec.position,
                direction,
                rng.gen_range(TRANSIT_STEP_MIN_DEG..=TRANSIT_STEP_MAX_DEG),
                curvature,
                TRANSIT_TICK_CAP,
            ))
        }
    }
}

/// Initial bearing in degrees (0 = North, clockwise) from `from` to `to`,
/// on the same flattened grid the motion models use.
pub fn bearing_between(from: GeoPoint, to: GeoPoint) -> f64 {
    let north = to.latitude - from.latitude;
    let east = (to.longitude - from.longitude) * overwatch_core::types::lon_scale(from.latitude);
    if north == 0.0 && east == 0.0 {
        return 0.0;
    }
    normalize_heading(east.atan2(north).to_degrees())
}
