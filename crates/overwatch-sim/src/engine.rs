//! Simulation engine, the tick driver.
//!
//! `SimulationEngine` owns the hecs ECS world, processes control commands,
//! runs the motion system and produces `SimSnapshot`s. Completely headless
//! (no renderer dependency), enabling deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use overwatch_core::commands::ControlCommand;
use overwatch_core::enums::{MotionModelKind, ScenarioId, SimPhase};
use overwatch_core::replay::ReplayScript;
use overwatch_core::state::{SimSnapshot, TrackPoint};
use overwatch_core::types::{SimTime, Viewport};

use crate::scenario;
use crate::systems;
use crate::systems::replay::ReplayCursor;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Force a motion model for every scenario instead of the catalog's.
    pub motion_override: Option<MotionModelKind>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            motion_override: None,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: SimPhase,
    seed: u64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<ControlCommand>,
    scenario: Option<ScenarioId>,
    motion_override: Option<MotionModelKind>,
    active_motion: Option<MotionModelKind>,
    viewport: Viewport,
    replay: Option<ReplayCursor>,
    replay_points: Vec<TrackPoint>,
    latest: Arc<SimSnapshot>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SimPhase::default(),
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            scenario: None,
            motion_override: config.motion_override,
            active_motion: None,
            viewport: Viewport::default(),
            replay: None,
            replay_points: Vec::new(),
            latest: Arc::new(SimSnapshot::default()),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: ControlCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = ControlCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// The snapshot is built fresh and swapped in whole; holders of the
    /// previous `Arc` keep seeing the previous tick.
    pub fn tick(&mut self) -> Arc<SimSnapshot> {
        self.process_commands();

        if self.phase == SimPhase::Running {
            self.run_systems();
            self.time.advance();
        }

        let snapshot = systems::snapshot::build_snapshot(
            &self.world,
            systems::snapshot::SnapshotContext {
                time: self.time,
                phase: self.phase,
                scenario: self.scenario,
                motion_model: self.active_motion,
                viewport: self.viewport,
                replay_points: &self.replay_points,
            },
        );
        self.latest = Arc::new(snapshot);
        Arc::clone(&self.latest)
    }

    /// Most recent snapshot without ticking.
    pub fn latest(&self) -> Arc<SimSnapshot> {
        Arc::clone(&self.latest)
    }

    /// Get the current run phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Scenario currently loaded, if any.
    pub fn scenario(&self) -> Option<ScenarioId> {
        self.scenario
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single control command.
    fn handle_command(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::SelectScenario { scenario } => self.load_scenario(scenario),
            ControlCommand::StartReplay { script } => self.load_replay(script),
            ControlCommand::SetMotionModel { model } => {
                self.motion_override = model;
            }
            ControlCommand::Pause => {
                if self.phase == SimPhase::Running {
                    self.phase = SimPhase::Paused;
                }
            }
            ControlCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Running;
                }
            }
            ControlCommand::Stop => {
                self.discard_tracks();
                self.scenario = None;
                self.active_motion = None;
                self.phase = SimPhase::Stopped;
                info!("simulation stopped");
            }
        }
    }

    /// Discard every track and rebuild the scenario from scratch.
    ///
    /// The RNG is reseeded so that loading the same scenario twice
    /// yields the same tracks with the same initial motion state.
    fn load_scenario(&mut self, id: ScenarioId) {
        let def = scenario::definition(id);
        let motion = self.motion_override.unwrap_or(def.motion);

        self.discard_tracks();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        let count = world_setup::setup_scenario(&mut self.world, &mut self.rng, &def, motion);

        self.scenario = Some(id);
        self.active_motion = Some(motion);
        self.viewport = def.viewport;
        self.time = SimTime::default();
        self.phase = SimPhase::Running;
        info!(scenario = def.name, tracks = count, ?motion, "scenario loaded");
    }

    fn load_replay(&mut self, script: ReplayScript) {
        self.discard_tracks();
        let cursor = ReplayCursor::new(script);
        if cursor.is_empty() {
            warn!("replay script has no timesteps; nothing to show");
        }
        info!(timesteps = cursor.len(), "replay loaded");

        self.replay = Some(cursor);
        self.scenario = None;
        self.active_motion = None;
        self.time = SimTime::default();
        self.phase = SimPhase::Running;
    }

    fn discard_tracks(&mut self) {
        self.world.clear();
        self.replay = None;
        self.replay_points.clear();
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick + 1;

        // 1. Replay playback (simulation mode)
        if let Some(cursor) = self.replay.as_mut() {
            self.replay_points = cursor
                .advance()
                .map(systems::replay::to_points)
                .unwrap_or_default();
        }
        // 2. Motion integration (generated tracks)
        systems::motion::run(&mut self.world, tick);

        debug!(
            tick,
            tracks = self.world.len() as usize + self.replay_points.len(),
            "tick"
        );
    }
}
