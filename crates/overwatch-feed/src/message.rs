//! Live feed messages.
//!
//! One JSON object per event. Field names vary between producers, so the
//! vehicle and call sign fields accept both spellings, and the category
//! accepts both the `positive/negative/neutral` and `Good/Bad` vocabularies.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeedResult;

/// Tone of a message, as shown in the transmission log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum MessageCategory {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl From<Option<String>> for MessageCategory {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("positive") || s.eq_ignore_ascii_case("good") => {
                MessageCategory::Positive
            }
            Some(s) if s.eq_ignore_ascii_case("negative") || s.eq_ignore_ascii_case("bad") => {
                MessageCategory::Negative
            }
            _ => MessageCategory::Neutral,
        }
    }
}

/// Model explanation attached to one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceAnalysis {
    /// Most influential input features, strongest first.
    pub top_features: Vec<String>,
    /// Influence weight per entity id or call sign.
    pub entity_influence: BTreeMap<String, f64>,
    pub visibility: Option<String>,
    pub mission_impact: Option<String>,
}

/// One decoded feed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub action: String,
    #[serde(default, alias = "vehicle_type")]
    pub vehicle: Option<String>,
    #[serde(default, alias = "callSign")]
    pub call_sign: Option<String>,
    #[serde(default)]
    pub enemy_type: Option<String>,
    #[serde(default)]
    pub enemy_callsign: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub category: MessageCategory,
    /// Keyed by action name.
    #[serde(default)]
    pub influence_analysis: BTreeMap<String, InfluenceAnalysis>,
}

impl FeedMessage {
    /// Influence analysis for this message's own action, if present.
    pub fn influence(&self) -> Option<&InfluenceAnalysis> {
        self.influence_analysis.get(&self.action)
    }
}

/// Decode one raw payload.
pub fn decode_message(raw: &str) -> FeedResult<FeedMessage> {
    Ok(serde_json::from_str(raw)?)
}

impl fmt::Display for FeedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = self.call_sign.as_deref().unwrap_or("UNKNOWN");
        match &self.vehicle {
            Some(vehicle) => write!(f, "{who} ({vehicle}): {}", self.action)?,
            None => write!(f, "{who}: {}", self.action)?,
        }
        match (&self.enemy_callsign, &self.enemy_type) {
            (Some(cs), Some(ty)) => write!(f, " -> {cs} ({ty})")?,
            (Some(cs), None) => write!(f, " -> {cs}")?,
            (None, Some(ty)) => write!(f, " -> {ty}")?,
            (None, None) => {}
        }
        if let Some(explanation) = &self.explanation {
            write!(f, " | {explanation}")?;
        }
        Ok(())
    }
}
