//! Replay file loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use overwatch_core::replay::ReplayScript;

use crate::error::{FeedError, FeedResult};

/// Parse a replay script from JSON text.
///
/// A script without timesteps is an error: there would be nothing to show.
/// Entity ids must be unique within a timestep.
pub fn parse_replay(json: &str) -> FeedResult<ReplayScript> {
    let script: ReplayScript = serde_json::from_str(json)?;
    if script.timesteps.is_empty() {
        return Err(FeedError::EmptyReplay);
    }
    for timestep in &script.timesteps {
        let mut seen = HashSet::new();
        if let Some(dup) = timestep.entities.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(FeedError::DuplicateEntity {
                time: timestep.time,
                id: dup.id.clone(),
            });
        }
    }

    let out_of_range = out_of_range(&script);
    if out_of_range > 0 {
        warn!(out_of_range, "replay entities outside lat/lng range will be normalized");
    }
    Ok(script)
}

/// Entities whose coordinates normalization will rewrite.
pub(crate) fn out_of_range(script: &ReplayScript) -> usize {
    script
        .timesteps
        .iter()
        .flat_map(|t| &t.entities)
        .filter(|e| !(-90.0..=90.0).contains(&e.latitude) || !(-180.0..180.0).contains(&e.longitude))
        .count()
}

pub fn load_replay(path: impl AsRef<Path>) -> FeedResult<ReplayScript> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let script = parse_replay(&json)?;
    info!(
        path = %path.display(),
        timesteps = script.timesteps.len(),
        looping = script.looping,
        "replay file loaded"
    );
    Ok(script)
}
