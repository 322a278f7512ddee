//! Application state shared between the control surface and the loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use overwatch_core::commands::ControlCommand;
use overwatch_core::enums::{Allegiance, SimPhase};
use overwatch_core::state::SimSnapshot;
use overwatch_render::{LayerStack, MapSurface, RenderOutcome};

/// Commands sent from the control surface to the loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A control command to forward to the simulation engine.
    Control(ControlCommand),
    /// Tear down everything drawn and stop the loop thread.
    Shutdown,
}

/// What one tick produced, in numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub tick: u64,
    pub phase: SimPhase,
    pub tracks: usize,
    pub friendly: usize,
    pub enemy: usize,
    /// Layers of any kind on the surface after rendering.
    pub surface_layers: usize,
    pub markers: usize,
    pub heat_layers: usize,
    /// Render held back by the readiness gate.
    pub deferred: bool,
}

impl FrameSummary {
    pub fn new(snapshot: &SimSnapshot, outcome: RenderOutcome, surface: &LayerStack) -> Self {
        Self {
            tick: snapshot.time.tick,
            phase: snapshot.phase,
            tracks: snapshot.tracks.len(),
            friendly: snapshot.count(Allegiance::Friendly),
            enemy: snapshot.count(Allegiance::Enemy),
            surface_layers: surface.layer_count(),
            markers: surface.markers().count(),
            heat_layers: surface.heat_layers().count(),
            deferred: outcome == RenderOutcome::Deferred,
        }
    }
}

/// Latest tick output: the snapshot itself plus its summary.
#[derive(Debug, Clone)]
pub struct Frame {
    pub snapshot: Arc<SimSnapshot>,
    pub summary: FrameSummary,
}

/// Why the loop thread ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Shutdown,
    /// Every command sender was dropped.
    Disconnected,
    TickLimit,
}

/// Returned by the loop thread when it exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopReport {
    pub ticks: u64,
    pub reason: StopReason,
    /// Summary of the last tick before teardown.
    pub last: Option<FrameSummary>,
    /// Layers left on the surface after teardown.
    pub residual_layers: usize,
}

pub type SharedFrame = Arc<Mutex<Option<Frame>>>;

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` for state that does not exist before start
/// - `Arc<Mutex<...>>` for the latest frame (shared with the loop thread)
pub struct AppState {
    /// `None` before `start_simulation` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Updated by the loop thread after each tick.
    pub latest_frame: SharedFrame,
    pub loop_thread: Mutex<Option<JoinHandle<LoopReport>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_frame: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
