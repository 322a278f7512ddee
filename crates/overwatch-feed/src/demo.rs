//! Built-in transcript used when no live feed is configured.

use crate::error::FeedResult;
use crate::log::MessageLog;

pub const DEMO_TRANSCRIPT: &str = r#"{"action":"scramble","vehicle":"F-16V","call_sign":"VIPER","explanation":"Unidentified formation crossing the median line","category":"neutral"}
{"action":"intercept","vehicle_type":"Mirage 2000-5","callSign":"FALCON","enemy_type":"J-16","enemy_callsign":"BANDIT 1","explanation":"Closing to visual identification range","category":"Good","influence_analysis":{"intercept":{"top_features":["range","closure_rate","attribution"],"entity_influence":{"BANDIT 1":0.72,"BANDIT 2":0.18},"visibility":"radar contact, no visual","mission_impact":"high"}}}
{"action":"shadow","vehicle":"F-CK-1 IDF","call_sign":"RAPTOR","enemy_type":"KJ-500","enemy_callsign":"BANDIT 4","explanation":"AEW aircraft holding racetrack east of the strait","category":"neutral"}
{"action":"break_off","vehicle":"F-16V","call_sign":"GHOST","enemy_type":"Su-30MKK","explanation":"Fuel state below joker","category":"Bad"}
{"action":"escort","vehicle":"Mirage 2000-5","call_sign":"SABRE","enemy_callsign":"BANDIT 2","explanation":"Hostile turning away toward the mainland","category":"positive","influence_analysis":{"escort":{"top_features":["heading_change","distance_to_coast"],"entity_influence":{"BANDIT 2":0.9}}}}
{"action":"lock_warning","vehicle":"F-16V","call_sign":"TALON","enemy_type":"J-20","enemy_callsign":"BANDIT 6","explanation":"Fire-control radar illumination detected","category":"negative"}
"#;

/// Load the demo transcript into a log.
pub fn play_demo(log: &mut MessageLog) -> FeedResult<usize> {
    log.pump(DEMO_TRANSCRIPT.as_bytes())
}
