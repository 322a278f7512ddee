//! Tests for the simulation engine, generator, scenarios and motion system.

use std::f64::consts::TAU;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use overwatch_core::commands::ControlCommand;
use overwatch_core::components::TrackIdentity;
use overwatch_core::enums::*;
use overwatch_core::replay::{ReplayEntity, ReplayScript, Timestep};
use overwatch_core::state::{SimSnapshot, TrackPoint};
use overwatch_core::types::GeoPoint;

use crate::engine::{SimConfig, SimulationEngine};
use crate::generator::{self, CALL_SIGNS};
use crate::motion::{Motion, MotionModel};
use crate::scenario::{self, Layout};

fn engine_with(scenario: ScenarioId) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(ControlCommand::SelectScenario { scenario });
    engine
}

fn jets(snapshot: &SimSnapshot) -> Vec<&overwatch_core::state::FighterJet> {
    snapshot
        .tracks
        .iter()
        .filter_map(|t| match t {
            TrackPoint::Jet(j) => Some(j),
            TrackPoint::Plain(_) => None,
        })
        .collect()
}

// ---- Generator ----

#[test]
fn test_fixed_layout_example() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let specs = generator::fixed_layout(&mut rng, GeoPoint::new(25.047, 121.532), 1.5);

    assert_eq!(specs.len(), 12);
    let friendly = specs
        .iter()
        .filter(|s| s.identity.allegiance == Allegiance::Friendly)
        .count();
    assert_eq!(friendly, 6);
    assert_eq!(specs.len() - friendly, 6);

    let call_signs: Vec<&str> = specs
        .iter()
        .map(|s| s.identity.call_sign.as_deref().unwrap())
        .collect();
    assert_eq!(call_signs, CALL_SIGNS.to_vec());
}

#[test]
fn test_fixed_layout_positions_reproducible() {
    let center = GeoPoint::new(25.047, 121.532);
    let a = generator::fixed_layout(&mut ChaCha8Rng::seed_from_u64(1), center, 1.5);
    let b = generator::fixed_layout(&mut ChaCha8Rng::seed_from_u64(2), center, 1.5);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.identity, y.identity);
        assert_eq!(x.threat.strategic_value, y.threat.strategic_value);
    }
}

#[test]
fn test_randomized_count_and_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let center = GeoPoint::new(15.0, 114.0);
    for count in [0usize, 1, 2, 5, 40, 101] {
        let specs = generator::randomized(&mut rng, center, 3.0, count);
        assert_eq!(specs.len(), count);
        for s in &specs {
            let t = &s.threat;
            assert!((1.0..=10.0).contains(&t.threat_level));
            assert!((1.0..=10.0).contains(&t.armament_level));
            assert!((1.0..=10.0).contains(&t.strategic_value));
            match s.identity.allegiance {
                Allegiance::Friendly => assert!(t.attribution.is_none()),
                Allegiance::Enemy => {
                    let a = t.attribution.expect("enemy attribution");
                    assert!((0.0..=1.0).contains(&a));
                }
            }
            assert!(s.position.is_valid());
        }
    }
}

#[test]
fn test_randomized_formations_have_high_value_leads() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let specs = generator::randomized(&mut rng, GeoPoint::new(29.5, 125.0), 2.0, 24);
    let leads: Vec<_> = specs.iter().filter(|s| s.threat.high_value).collect();
    assert!((3..=4).contains(&leads.len()), "{} leads", leads.len());
    for lead in &leads {
        assert!(lead.threat.threat_level >= 8.0);
        assert!(lead.identity.call_sign.as_deref().unwrap().ends_with(" 1"));
    }
    // First formation is enemy, so its lead is E-01.
    assert_eq!(specs[0].identity.id, "E-01");
    assert!(specs[0].threat.high_value);
}

#[test]
fn test_randomized_ids_unique() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let specs = generator::randomized(&mut rng, GeoPoint::new(0.0, 0.0), 1.0, 60);
    let mut ids: Vec<&str> = specs.iter().map(|s| s.identity.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 60);
}

#[test]
fn test_attribution_rises_with_threat() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let low = generator::attribution_for(&mut rng, Allegiance::Enemy, 1.0).unwrap();
    let high = generator::attribution_for(&mut rng, Allegiance::Enemy, 10.0).unwrap();
    assert!(high > low);
    assert!((0.35..=0.47).contains(&low), "low {low}");
    assert!((0.89..=1.0).contains(&high), "high {high}");
    assert_eq!(generator::attribution_for(&mut rng, Allegiance::Friendly, 10.0), None);
}

// ---- Scenario catalog ----

#[test]
fn test_catalog_covers_every_scenario() {
    let catalog = scenario::catalog();
    assert_eq!(catalog.len(), ScenarioId::ALL.len());
    let taiwan = scenario::definition(ScenarioId::TaiwanStrait);
    assert!(matches!(taiwan.layout, Layout::Fixed { .. }));
    assert_eq!(taiwan.track_count(), 12);
    assert_eq!(taiwan.viewport.center, GeoPoint::new(25.047, 121.532));
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine_with(ScenarioId::EastChinaSea);
    let mut engine_b = engine_with(ScenarioId::EastChinaSea);

    for _ in 0..200 {
        let json_a = serde_json::to_string(&*engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&*engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    let select = ControlCommand::SelectScenario {
        scenario: ScenarioId::SouthChinaSea,
    };
    engine_a.queue_command(select.clone());
    engine_b.queue_command(select);
    assert_ne!(*engine_a.tick(), *engine_b.tick());
}

// ---- Engine lifecycle ----

#[test]
fn test_idle_engine_has_no_tracks() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Idle);
    assert!(snap.tracks.is_empty());
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_select_scenario_spawns_tracks() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Running);
    assert_eq!(snap.scenario, Some(ScenarioId::TaiwanStrait));
    assert_eq!(snap.motion_model, Some(MotionModelKind::EllipticalOrbit));
    assert_eq!(snap.tracks.len(), 12);
    assert_eq!(snap.count(Allegiance::Friendly), 6);
    assert_eq!(snap.time.tick, 1);

    // Sorted by id, all jets.
    let ids: Vec<&str> = snap.tracks.iter().map(|t| t.id()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(jets(&snap).len(), 12);
}

#[test]
fn test_pause_resume() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    engine.tick();
    engine.queue_command(ControlCommand::Pause);
    let paused = engine.tick();
    assert_eq!(paused.phase, SimPhase::Paused);

    let again = engine.tick();
    assert_eq!(again.time.tick, paused.time.tick);
    assert_eq!(again.tracks, paused.tracks);

    engine.queue_command(ControlCommand::Resume);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, SimPhase::Running);
    assert!(resumed.time.tick > paused.time.tick);
}

#[test]
fn test_stop_discards_everything() {
    let mut engine = engine_with(ScenarioId::SouthChinaSea);
    engine.tick();
    engine.queue_command(ControlCommand::Stop);
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Stopped);
    assert!(snap.tracks.is_empty());
    assert_eq!(snap.scenario, None);
    assert_eq!(engine.world().len(), 0);
}

#[test]
fn test_previous_snapshot_untouched_by_next_tick() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    let first = engine.tick();
    let frozen = (*first).clone();
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(*first, frozen);
    assert_ne!(engine.latest().tracks, first.tracks);
}

// ---- Motion properties ----

#[test]
fn test_tracks_stay_valid_over_many_ticks() {
    for id in ScenarioId::ALL {
        let mut engine = engine_with(id);
        for _ in 0..400 {
            let snap = engine.tick();
            for jet in jets(&snap) {
                let k = &jet.kinematics;
                assert!(k.position.is_valid(), "{:?} {:?}", id, k.position);
                assert!((0.0..360.0).contains(&k.heading), "heading {}", k.heading);
                assert_eq!(k.last_updated, snap.time.tick);
            }
        }
    }
}

#[test]
fn test_generated_orbits_close_after_full_revolution() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    engine.tick();

    let orbits: Vec<_> = engine
        .world()
        .query::<&Motion>()
        .iter()
        .filter_map(|(_, m)| match m {
            Motion::Orbit(o) => Some(o.clone()),
            Motion::Transit(_) => None,
        })
        .collect();
    assert_eq!(orbits.len(), 12);

    for mut orbit in orbits {
        orbit.angular_speed = TAU / 90.0;
        let start = orbit.sample().position;
        for _ in 0..90 {
            orbit.advance();
        }
        let end = orbit.sample().position;
        assert!((start.latitude - end.latitude).abs() < 1e-9);
        assert!((start.longitude - end.longitude).abs() < 1e-9);
    }
}

#[test]
fn test_capped_transit_freezes_in_engine() {
    let mut engine = engine_with(ScenarioId::KoreanPeninsula);
    let cap = overwatch_core::constants::TRANSIT_TICK_CAP as u64;

    let mut last_distance = std::collections::HashMap::new();
    let mut frozen_positions = None;

    for _ in 0..(cap + 40) {
        let snap = engine.tick();
        for (_, (identity, motion)) in engine.world().query::<(&TrackIdentity, &Motion)>().iter() {
            let Motion::Transit(transit) = motion else {
                panic!("Korean Peninsula flies capped transits");
            };
            let prev = last_distance.insert(identity.id.clone(), transit.distance);
            assert!(transit.distance >= prev.unwrap_or(0.0));
        }

        if snap.time.tick == cap {
            frozen_positions = Some(snap.tracks.clone());
        } else if snap.time.tick > cap {
            let frozen = frozen_positions.as_ref().unwrap();
            for (now, then) in snap.tracks.iter().zip(frozen) {
                assert_eq!(now.position(), then.position());
            }
            for jet in jets(&snap) {
                assert_eq!(jet.kinematics.speed, 0.0);
            }
        }
    }
}

#[test]
fn test_motion_override_applies_on_next_selection() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    engine.tick();
    engine.queue_command(ControlCommand::SetMotionModel {
        model: Some(MotionModelKind::CappedTransit),
    });
    let snap = engine.tick();
    assert_eq!(snap.motion_model, Some(MotionModelKind::EllipticalOrbit));

    engine.queue_command(ControlCommand::SelectScenario {
        scenario: ScenarioId::TaiwanStrait,
    });
    let snap = engine.tick();
    assert_eq!(snap.motion_model, Some(MotionModelKind::CappedTransit));
    let all_transit = engine
        .world()
        .query::<&Motion>()
        .iter()
        .all(|(_, m)| m.kind() == MotionModelKind::CappedTransit);
    assert!(all_transit);
}

// ---- Scenario switching ----

#[test]
fn test_scenario_switch_resets_motion_state() {
    let mut fresh = engine_with(ScenarioId::EastChinaSea);
    let first_tick = fresh.tick();

    let mut engine = engine_with(ScenarioId::EastChinaSea);
    for _ in 0..75 {
        engine.tick();
    }
    engine.queue_command(ControlCommand::SelectScenario {
        scenario: ScenarioId::SouthChinaSea,
    });
    engine.tick();
    engine.queue_command(ControlCommand::SelectScenario {
        scenario: ScenarioId::EastChinaSea,
    });
    let reloaded = engine.tick();

    assert_eq!(reloaded.time.tick, 1);
    assert_eq!(*reloaded, *first_tick);
}

#[test]
fn test_scenario_switch_changes_track_count() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    assert_eq!(engine.tick().tracks.len(), 12);

    engine.queue_command(ControlCommand::SelectScenario {
        scenario: ScenarioId::SouthChinaSea,
    });
    let snap = engine.tick();
    assert_eq!(snap.tracks.len(), 40);
    assert_eq!(engine.world().len(), 40);
    assert!(snap.track("F-01").is_some());
}

// ---- Replay ----

fn replay_script() -> ReplayScript {
    ReplayScript {
        looping: true,
        timesteps: vec![
            Timestep {
                time: 0.0,
                entities: vec![
                    ReplayEntity {
                        id: "e1".into(),
                        latitude: 24.9,
                        longitude: 121.0,
                        side: Allegiance::Enemy,
                        attribution: Some(0.82),
                    },
                    ReplayEntity {
                        id: "f1".into(),
                        latitude: 25.1,
                        longitude: 121.6,
                        side: Allegiance::Friendly,
                        attribution: None,
                    },
                ],
            },
            Timestep {
                time: 1.0,
                entities: vec![ReplayEntity {
                    id: "e1".into(),
                    latitude: 24.95,
                    longitude: 121.05,
                    side: Allegiance::Enemy,
                    attribution: Some(0.85),
                }],
            },
        ],
    }
}

#[test]
fn test_replay_replaces_generated_tracks() {
    let mut engine = engine_with(ScenarioId::TaiwanStrait);
    engine.tick();
    engine.queue_command(ControlCommand::StartReplay {
        script: replay_script(),
    });

    let snap = engine.tick();
    assert_eq!(snap.scenario, None);
    assert_eq!(snap.tracks.len(), 2);
    assert!(snap.tracks.iter().all(|t| matches!(t, TrackPoint::Plain(_))));
    assert_eq!(engine.world().len(), 0);

    let snap = engine.tick();
    assert_eq!(snap.tracks.len(), 1);
    assert_eq!(snap.tracks[0].attribution(), Some(0.85));

    // Loops back to the first timestep.
    let snap = engine.tick();
    assert_eq!(snap.tracks.len(), 2);
}

#[test]
fn test_scenario_selection_ends_replay() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(ControlCommand::StartReplay {
        script: replay_script(),
    });
    engine.tick();
    engine.queue_command(ControlCommand::SelectScenario {
        scenario: ScenarioId::KoreanPeninsula,
    });
    let snap = engine.tick();
    assert_eq!(snap.tracks.len(), 16);
    assert!(snap.tracks.iter().all(|t| matches!(t, TrackPoint::Jet(_))));
}
