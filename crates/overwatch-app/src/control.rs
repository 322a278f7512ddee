//! Control surface: start, command and stop the tick loop thread.
//!
//! These are the entry points an operator-facing shell calls. They bridge
//! requests to the loop thread via its command channel.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};

use overwatch_core::commands::ControlCommand;
use overwatch_core::state::SimSnapshot;

use crate::config::AppConfig;
use crate::game_loop;
use crate::state::{AppState, FrameSummary, LoopCommand, LoopReport};

/// Start the simulation on a new loop thread.
///
/// Fails if a loop is already running.
pub fn start_simulation(
    state: &AppState,
    config: AppConfig,
    initial: Vec<ControlCommand>,
    max_ticks: Option<u64>,
) -> anyhow::Result<()> {
    let mut thread = state.loop_thread.lock().map_err(|e| anyhow!(e.to_string()))?;
    if thread.is_some() {
        bail!("simulation already running");
    }

    let handle = game_loop::spawn_game_loop(
        config,
        initial,
        max_ticks,
        Arc::clone(&state.latest_frame),
    )
    .context("spawning tick loop thread")?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
    *tx_lock = Some(handle.commands);
    *thread = Some(handle.thread);
    Ok(())
}

/// Forward a control command to the running simulation.
pub fn send_command(state: &AppState, command: ControlCommand) -> anyhow::Result<()> {
    let tx_lock = state.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(LoopCommand::Control(command))
            .map_err(|e| anyhow!("failed to send command: {e}")),
        None => bail!("simulation not started"),
    }
}

/// Latest snapshot, for polling.
pub fn get_snapshot(state: &AppState) -> anyhow::Result<Option<Arc<SimSnapshot>>> {
    let lock = state.latest_frame.lock().map_err(|e| anyhow!(e.to_string()))?;
    Ok(lock.as_ref().map(|frame| Arc::clone(&frame.snapshot)))
}

pub fn get_summary(state: &AppState) -> anyhow::Result<Option<FrameSummary>> {
    let lock = state.latest_frame.lock().map_err(|e| anyhow!(e.to_string()))?;
    Ok(lock.as_ref().map(|frame| frame.summary))
}

/// Ask the loop to shut down and wait for it. A loop that already ended
/// on its own (tick limit) is just joined.
pub fn stop_simulation(state: &AppState) -> anyhow::Result<LoopReport> {
    if let Some(tx) = state
        .command_tx
        .lock()
        .map_err(|e| anyhow!(e.to_string()))?
        .take()
    {
        // The loop may already be gone; joining below reports how it ended.
        let _ = tx.send(LoopCommand::Shutdown);
    }
    wait_for_loop(state)
}

/// Wait for the loop thread to end without asking it to.
pub fn wait_for_loop(state: &AppState) -> anyhow::Result<LoopReport> {
    let handle = state
        .loop_thread
        .lock()
        .map_err(|e| anyhow!(e.to_string()))?
        .take()
        .context("simulation not started")?;
    handle
        .join()
        .map_err(|_| anyhow!("tick loop thread panicked"))
}
