//! Motion integration system.
//!
//! Advances every track's motion model by one tick and writes the result
//! back into its `Kinematics`.

use hecs::World;

use overwatch_core::components::{CruiseSpeed, Kinematics};

use crate::motion::{Motion, MotionModel};

/// Run one integration step for all entities with Motion + Kinematics.
pub fn run(world: &mut World, current_tick: u64) {
    for (_entity, (motion, kinematics, cruise)) in
        world.query_mut::<(&mut Motion, &mut Kinematics, &CruiseSpeed)>()
    {
        let sample = motion.advance();
        kinematics.position = sample.position;
        kinematics.heading = sample.heading;
        kinematics.speed = if sample.moving { cruise.0 } else { 0.0 };
        kinematics.last_updated = current_tick;
    }
}
