//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::enums::*;
use overwatch_core::state::*;
use overwatch_core::types::{SimTime, Viewport};

/// Everything besides the world that goes into a snapshot.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: SimPhase,
    pub scenario: Option<ScenarioId>,
    pub motion_model: Option<MotionModelKind>,
    pub viewport: Viewport,
    /// Points from an active replay, already converted.
    pub replay_points: &'a [TrackPoint],
}

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext<'_>) -> SimSnapshot {
    let mut tracks = build_jets(world);
    tracks.extend(ctx.replay_points.iter().cloned());
    tracks.sort_by(|a, b| a.id().cmp(b.id()));

    SimSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        scenario: ctx.scenario,
        motion_model: ctx.motion_model,
        viewport: ctx.viewport,
        tracks,
    }
}

/// Build a Jet track point for every generated track.
fn build_jets(world: &World) -> Vec<TrackPoint> {
    world
        .query::<(&TrackIdentity, &ThreatAttributes, &Kinematics)>()
        .iter()
        .map(|(_, (identity, threat, kinematics))| {
            TrackPoint::Jet(FighterJet {
                identity: identity.clone(),
                threat: *threat,
                kinematics: *kinematics,
            })
        })
        .collect()
}
