//! Tick loop: drives the engine at a fixed interval and redraws the overlay.
//!
//! `Driver` owns the engine, the map surface and the overlay pipeline and
//! runs one tick at a time; it is used directly for headless runs. The loop
//! thread wraps a driver, takes commands over an `mpsc` channel and stores
//! each frame in shared state.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use overwatch_core::commands::ControlCommand;
use overwatch_render::style::IconRegistry;
use overwatch_render::{LayerStack, MapSurface, OverlayPipeline};
use overwatch_sim::SimulationEngine;

use crate::config::AppConfig;
use crate::state::{Frame, FrameSummary, LoopCommand, LoopReport, SharedFrame, StopReason};

/// Engine plus everything drawn from it.
pub struct Driver {
    engine: SimulationEngine,
    surface: LayerStack,
    pipeline: OverlayPipeline,
    last: Option<FrameSummary>,
}

impl Driver {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_surface(config, LayerStack::new())
    }

    pub fn with_surface(config: &AppConfig, surface: LayerStack) -> Self {
        Self {
            engine: SimulationEngine::new(config.sim()),
            surface,
            pipeline: OverlayPipeline::new(config.overlay(), IconRegistry::default()),
            last: None,
        }
    }

    /// Queue a command for the next tick. Commands that replace the track
    /// set tear the overlay down first so nothing from the old set lingers.
    pub fn apply(&mut self, command: ControlCommand) {
        if matches!(
            command,
            ControlCommand::SelectScenario { .. }
                | ControlCommand::StartReplay { .. }
                | ControlCommand::Stop
        ) {
            self.pipeline.teardown(&mut self.surface);
        }
        self.engine.queue_command(command);
    }

    /// Advance one tick and redraw from the new snapshot.
    pub fn step(&mut self, now: Instant) -> Frame {
        let snapshot = self.engine.tick();
        let outcome = self.pipeline.render(&mut self.surface, &snapshot, now);
        let summary = FrameSummary::new(&snapshot, outcome, &self.surface);
        self.last = Some(summary);
        Frame { snapshot, summary }
    }

    /// Tear down the overlay, then discard every track.
    pub fn shutdown(&mut self) {
        self.pipeline.teardown(&mut self.surface);
        self.engine.queue_command(ControlCommand::Stop);
        self.engine.tick();
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn surface(&self) -> &LayerStack {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut LayerStack {
        &mut self.surface
    }

    fn finish(mut self, ticks: u64, reason: StopReason) -> LoopReport {
        self.shutdown();
        let report = LoopReport {
            ticks,
            reason,
            last: self.last,
            residual_layers: self.surface.layer_count(),
        };
        info!(ticks, ?reason, "tick loop finished");
        report
    }
}

/// Handle to a running loop thread.
pub struct LoopHandle {
    pub commands: mpsc::Sender<LoopCommand>,
    pub thread: JoinHandle<LoopReport>,
}

/// Spawn the tick loop on its own thread.
///
/// `initial` commands are applied before the first tick. The loop runs
/// until `Shutdown`, until every sender is dropped, or for `max_ticks`
/// ticks when given.
pub fn spawn_game_loop(
    config: AppConfig,
    initial: Vec<ControlCommand>,
    max_ticks: Option<u64>,
    latest_frame: SharedFrame,
) -> io::Result<LoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let thread = std::thread::Builder::new()
        .name("overwatch-tick-loop".into())
        .spawn(move || {
            let mut driver = Driver::new(&config);
            for command in initial {
                driver.apply(command);
            }
            run_game_loop(driver, config.tick_interval(), max_ticks, cmd_rx, &latest_frame)
        })?;

    Ok(LoopHandle {
        commands: cmd_tx,
        thread,
    })
}

fn run_game_loop(
    mut driver: Driver,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_frame: &SharedFrame,
) -> LoopReport {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Control(command)) => driver.apply(command),
                Ok(LoopCommand::Shutdown) => return driver.finish(ticks, StopReason::Shutdown),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return driver.finish(ticks, StopReason::Disconnected)
                }
            }
        }

        if max_ticks.is_some_and(|limit| ticks >= limit) {
            return driver.finish(ticks, StopReason::TickLimit);
        }

        // 2. Tick and redraw
        let frame = driver.step(Instant::now());
        ticks += 1;
        debug!(tick = frame.summary.tick, layers = frame.summary.surface_layers, "frame");

        // 3. Publish for polling
        if let Ok(mut lock) = latest_frame.lock() {
            *lock = Some(frame);
        }

        if max_ticks.is_some_and(|limit| ticks >= limit) {
            return driver.finish(ticks, StopReason::TickLimit);
        }

        // 4. Sleep until next tick
        next_tick_time += tick_interval;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_interval * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Run `ticks` ticks on the calling thread, with no pacing.
/// Returns the last frame, or `None` when `ticks` is zero.
pub fn run_headless(driver: &mut Driver, commands: Vec<ControlCommand>, ticks: u64) -> Option<Frame> {
    for command in commands {
        driver.apply(command);
    }
    let mut last = None;
    for _ in 0..ticks {
        last = Some(driver.step(Instant::now()));
    }
    last
}
