//! Tests for classification, heat layers, markers and the overlay pipeline.

use std::time::{Duration, Instant};

use overwatch_core::commands::ControlCommand;
use overwatch_core::components::{Kinematics, ThreatAttributes, TrackIdentity};
use overwatch_core::enums::*;
use overwatch_core::state::{FighterJet, PlainPoint, SimSnapshot, TrackPoint};
use overwatch_core::types::GeoPoint;
use overwatch_sim::{SimConfig, SimulationEngine};

use crate::heat::{self, HeatConfig, HeatLayerKind, HeatLayerRenderer};
use crate::markers::{tooltip_for, MarkerRenderer, MarkerStrategy};
use crate::overlay::{OverlayConfig, OverlayPipeline, RenderOutcome};
use crate::style::*;
use crate::surface::{GateOpened, LayerStack, MapSurface, ReadinessGate};

fn jet(id: &str, allegiance: Allegiance, level: f64, attribution: Option<f64>) -> TrackPoint {
    let mut kinematics = Kinematics::at(GeoPoint::new(25.0, 121.5), 9_000.0, 480.0);
    kinematics.heading = 45.0;
    TrackPoint::Jet(FighterJet {
        identity: TrackIdentity {
            id: id.to_string(),
            allegiance,
            aircraft_type: "J-16".to_string(),
            call_sign: Some("VIPER".to_string()),
        },
        threat: ThreatAttributes::new(allegiance, level, level, false, attribution),
        kinematics,
    })
}

fn plain(id: &str, allegiance: Allegiance, attribution: Option<f64>) -> TrackPoint {
    TrackPoint::Plain(PlainPoint::new(
        id,
        GeoPoint::new(24.9, 121.0),
        allegiance,
        attribution,
    ))
}

fn snapshot_of(tracks: Vec<TrackPoint>) -> SimSnapshot {
    SimSnapshot {
        tracks,
        ..Default::default()
    }
}

fn running(scenario: ScenarioId) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(ControlCommand::SelectScenario { scenario });
    engine
}

// ---- Classification ----

#[test]
fn test_attribution_bucket_edges() {
    assert_eq!(attribution_bucket(0.8), SeverityBucket::Critical);
    assert_eq!(attribution_bucket(0.7999), SeverityBucket::High);
    assert_eq!(attribution_bucket(0.6), SeverityBucket::High);
    assert_eq!(attribution_bucket(0.5999), SeverityBucket::Elevated);
    assert_eq!(attribution_bucket(0.4), SeverityBucket::Elevated);
    assert_eq!(attribution_bucket(0.3999), SeverityBucket::Low);
    assert_eq!(attribution_bucket(0.0), SeverityBucket::Low);
    assert_eq!(attribution_bucket(1.0), SeverityBucket::Critical);
}

#[test]
fn test_strategic_bucket_edges() {
    assert_eq!(strategic_bucket(8.0), SeverityBucket::Critical);
    assert_eq!(strategic_bucket(7.99), SeverityBucket::High);
    assert_eq!(strategic_bucket(6.0), SeverityBucket::High);
    assert_eq!(strategic_bucket(5.99), SeverityBucket::Elevated);
    assert_eq!(strategic_bucket(4.0), SeverityBucket::Elevated);
    assert_eq!(strategic_bucket(3.99), SeverityBucket::Low);
}

#[test]
fn test_attribution_takes_precedence_over_strategic_value() {
    // Strategic value 10 would be critical; attribution 0.45 says elevated.
    let style = classify(&jet("E-01", Allegiance::Enemy, 10.0, Some(0.45)));
    assert_eq!(style.bucket, SeverityBucket::Elevated);
    assert_eq!(style.source, ScoreSource::Attribution);
    assert_eq!(style.color, ATTRIBUTION_PALETTE[1]);

    let style = classify(&jet("E-02", Allegiance::Enemy, 10.0, None));
    assert_eq!(style.bucket, SeverityBucket::Critical);
    assert_eq!(style.source, ScoreSource::Strategic);
    assert_eq!(style.color, STRATEGIC_PALETTE[3]);
}

#[test]
fn test_replay_point_at_attribution_edge() {
    let style = classify(&plain("e1", Allegiance::Enemy, Some(0.8)));
    assert_eq!(style.bucket, SeverityBucket::Critical);
    assert_eq!(style.icon_size_px, 20.0);

    let style = classify(&plain("e2", Allegiance::Enemy, None));
    assert_eq!(style.bucket, SeverityBucket::Low);
    assert_eq!(style.source, ScoreSource::Strategic);
}

#[test]
fn test_friendly_colour_invariant() {
    for level in 1..=10 {
        let style = classify(&jet("F-01", Allegiance::Friendly, level as f64, Some(0.9)));
        assert_eq!(style.color, FRIENDLY_COLOR);
        assert_eq!(style.bucket, SeverityBucket::Friendly);
    }
    assert_eq!(classify(&plain("f1", Allegiance::Friendly, Some(0.99))).color, FRIENDLY_COLOR);
}

#[test]
fn test_icon_size_grows_and_clamps() {
    assert_eq!(icon_size(None), 20.0);
    assert_eq!(icon_size(Some(1.0)), 22.0);
    assert_eq!(icon_size(Some(5.0)), 30.0);
    assert_eq!(icon_size(Some(10.0)), 40.0);
    assert_eq!(icon_size(Some(50.0)), 40.0);
    assert_eq!(icon_size(Some(-50.0)), 20.0);
}

#[test]
fn test_icon_size_independent_of_bucket() {
    let a = classify(&jet("E-01", Allegiance::Enemy, 6.0, Some(0.1)));
    let b = classify(&jet("E-02", Allegiance::Enemy, 6.0, Some(0.95)));
    assert_ne!(a.bucket, b.bucket);
    assert_eq!(a.icon_size_px, b.icon_size_px);
}

#[test]
fn test_style_sheet_covers_every_class() {
    let sheet = StyleSheet::tracks();
    let samples = [
        jet("F-01", Allegiance::Friendly, 5.0, None),
        jet("E-01", Allegiance::Enemy, 2.0, None),
        jet("E-02", Allegiance::Enemy, 9.0, None),
        jet("E-03", Allegiance::Enemy, 5.0, Some(0.3)),
        jet("E-04", Allegiance::Enemy, 5.0, Some(0.65)),
        plain("e1", Allegiance::Enemy, Some(0.9)),
    ];
    for point in &samples {
        let style = classify(point);
        let rule = sheet.rule(&style.class_name()).expect("class has a rule");
        assert_eq!(rule.color, style.color);
    }
    assert_eq!(sheet.rules.len(), 9);
}

#[test]
fn test_icon_registry() {
    let icons = IconRegistry::default();
    assert_eq!(icons.icon_for(&jet("F-01", Allegiance::Friendly, 5.0, None)), "icon-jet-friendly");
    assert_eq!(icons.icon_for(&plain("e1", Allegiance::Enemy, None)), "icon-dot-hostile");

    let sparse = IconRegistry::empty().with_icon(Allegiance::Enemy, TrackKind::Jet, "custom");
    assert_eq!(sparse.icon_for(&jet("E-01", Allegiance::Enemy, 5.0, None)), "custom");
    assert_eq!(sparse.icon_for(&plain("f1", Allegiance::Friendly, None)), FALLBACK_ICON);
}

// ---- Heat layers ----

#[test]
fn test_heat_intensity() {
    let j = jet("E-01", Allegiance::Enemy, 5.0, None);
    assert!((heat::intensity(&j) - 0.5).abs() < 1e-9);
    assert_eq!(heat::intensity(&plain("e1", Allegiance::Enemy, None)), 0.5);
}

#[test]
fn test_heat_layers_split_by_side() {
    let snap = snapshot_of(vec![
        jet("E-01", Allegiance::Enemy, 8.0, Some(0.9)),
        jet("E-02", Allegiance::Enemy, 4.0, None),
        jet("F-01", Allegiance::Friendly, 6.0, None),
    ]);
    let layers = heat::build_layers(&snap, &HeatConfig::default());
    let kinds: Vec<HeatLayerKind> = layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![HeatLayerKind::Friendly, HeatLayerKind::Enemy, HeatLayerKind::Attribution]
    );
    assert_eq!(layers[1].points.len(), 2);
    assert_eq!(layers[2].points.len(), 1);
    assert_eq!(layers[2].points[0].intensity, 0.9);
    assert!(layers[2].radius_px > layers[1].radius_px);
    assert_ne!(layers[0].gradient, layers[1].gradient);
}

#[test]
fn test_empty_point_sets_produce_no_layer() {
    assert!(heat::build_layers(&SimSnapshot::default(), &HeatConfig::default()).is_empty());

    let friendly_only = snapshot_of(vec![jet("F-01", Allegiance::Friendly, 6.0, None)]);
    let layers = heat::build_layers(&friendly_only, &HeatConfig::default());
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].kind, HeatLayerKind::Friendly);
}

#[test]
fn test_attribution_layer_can_be_disabled() {
    let snap = snapshot_of(vec![jet("E-01", Allegiance::Enemy, 8.0, Some(0.9))]);
    let config = HeatConfig {
        attribution_layer: false,
        ..Default::default()
    };
    let layers = heat::build_layers(&snap, &config);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].kind, HeatLayerKind::Enemy);
}

#[test]
fn test_heat_config_partial_json() {
    let config: HeatConfig = serde_json::from_str(r#"{"radius_px": 30.0}"#).unwrap();
    assert_eq!(config.radius_px, 30.0);
    assert_eq!(config.blur_px, HeatConfig::default().blur_px);
    assert!(config.attribution_layer);
}

#[test]
fn test_no_heat_layer_accumulation() {
    let mut engine = running(ScenarioId::TaiwanStrait);
    let mut surface = LayerStack::new();
    let mut renderer = HeatLayerRenderer::new(HeatConfig::default());

    for _ in 0..50 {
        let snap = engine.tick();
        let report = renderer.render(&mut surface, &snap);
        assert_eq!(report.drawn, 3);
        assert_eq!(surface.layer_count(), 3);
    }
    renderer.clear(&mut surface);
    assert_eq!(surface.layer_count(), 0);
}

#[test]
fn test_rejected_heat_layer_is_skipped() {
    let mut surface = LayerStack::new().reject_named("heat:friendly");
    let mut renderer = HeatLayerRenderer::new(HeatConfig::default());
    let snap = snapshot_of(vec![
        jet("F-01", Allegiance::Friendly, 6.0, None),
        jet("E-01", Allegiance::Enemy, 8.0, Some(0.7)),
    ]);

    let report = renderer.render(&mut surface, &snap);
    assert_eq!(report.drawn, 2);
    assert_eq!(report.skipped, 1);
    assert!(surface.heat_layers().all(|l| l.kind != HeatLayerKind::Friendly));
}

// ---- Markers ----

#[test]
fn test_tooltip_lines_for_enemy_jet() {
    let lines = tooltip_for(&jet("E-01", Allegiance::Enemy, 7.0, Some(0.82))).lines;
    assert_eq!(
        lines,
        vec![
            "Type: J-16",
            "Call sign: VIPER",
            "Side: HOSTILE",
            "Threat: 7/10",
            "Armament: 7/10",
            "Attribution: 82%",
            "Altitude: 9000 m",
            "Speed: 480 kt",
            "Heading: 045°",
        ]
    );
}

#[test]
fn test_tooltip_omits_attribution_for_friendly() {
    let tooltip = tooltip_for(&jet("F-01", Allegiance::Friendly, 7.0, Some(0.82)));
    assert!(tooltip.text().contains("Side: FRIENDLY"));
    assert!(!tooltip.text().contains("Attribution"));

    let replay = tooltip_for(&plain("e1", Allegiance::Enemy, Some(0.5))).lines;
    assert_eq!(replay, vec!["Track: e1", "Side: HOSTILE", "Attribution: 50%"]);
}

#[test]
fn test_marker_count_follows_snapshot_across_switch() {
    for strategy in [MarkerStrategy::Rebuild, MarkerStrategy::Keyed] {
        let mut engine = running(ScenarioId::TaiwanStrait);
        let mut surface = LayerStack::new();
        let mut renderer = MarkerRenderer::new(IconRegistry::default(), strategy);

        for tick in 0..30 {
            if tick == 10 {
                engine.queue_command(ControlCommand::SelectScenario {
                    scenario: ScenarioId::SouthChinaSea,
                });
            }
            if tick == 20 {
                engine.queue_command(ControlCommand::SelectScenario {
                    scenario: ScenarioId::KoreanPeninsula,
                });
            }
            let snap = engine.tick();
            renderer.render(&mut surface, &snap);
            assert_eq!(renderer.len(), snap.tracks.len(), "{strategy:?} tick {tick}");
            assert_eq!(surface.markers().count(), snap.tracks.len());
        }
    }
}

#[test]
fn test_repeated_track_id_does_not_strand_markers() {
    let snap = snapshot_of(vec![
        plain("dup", Allegiance::Enemy, Some(0.5)),
        plain("dup", Allegiance::Enemy, Some(0.9)),
    ]);
    for strategy in [MarkerStrategy::Rebuild, MarkerStrategy::Keyed] {
        let mut surface = LayerStack::new();
        let mut renderer = MarkerRenderer::new(IconRegistry::default(), strategy);

        for _ in 0..5 {
            renderer.render(&mut surface, &snap);
            assert_eq!(surface.markers().count(), 1, "{strategy:?}");
            assert_eq!(renderer.len(), 1);
        }

        renderer.clear(&mut surface);
        assert_eq!(surface.layer_count(), 0, "{strategy:?}");
    }
}

#[test]
fn test_keyed_markers_update_in_place() {
    let mut engine = running(ScenarioId::EastChinaSea);
    let mut surface = LayerStack::new();
    let mut renderer = MarkerRenderer::new(IconRegistry::default(), MarkerStrategy::Keyed);

    let first = renderer.render(&mut surface, &engine.tick());
    assert_eq!(first.added, 24);
    let handles: Vec<_> = surface.layers().map(|(h, _)| *h).collect();

    let snap = engine.tick();
    let second = renderer.render(&mut surface, &snap);
    assert_eq!(second.updated, 24);
    assert_eq!(second.added + second.removed, 0);
    assert_eq!(surface.layers().map(|(h, _)| *h).collect::<Vec<_>>(), handles);

    let moved = surface.markers().find(|m| m.id == "E-01").unwrap();
    assert_eq!(moved.position, snap.track("E-01").unwrap().position());
}

#[test]
fn test_keyed_markers_recover_lost_layer() {
    let mut surface = LayerStack::new();
    let mut renderer = MarkerRenderer::new(IconRegistry::default(), MarkerStrategy::Keyed);
    let snap = snapshot_of(vec![plain("e1", Allegiance::Enemy, Some(0.5))]);

    renderer.render(&mut surface, &snap);
    let (&handle, _) = surface.layers().next().unwrap();
    surface.remove_layer(handle).unwrap();

    let report = renderer.render(&mut surface, &snap);
    assert_eq!(report.added, 1);
    assert_eq!(surface.markers().count(), 1);
}

#[test]
fn test_markers_skipped_when_surface_full() {
    let mut surface = LayerStack::new().with_capacity_limit(5);
    let mut renderer = MarkerRenderer::new(IconRegistry::default(), MarkerStrategy::Rebuild);
    let mut engine = running(ScenarioId::TaiwanStrait);

    let report = renderer.render(&mut surface, &engine.tick());
    assert_eq!(report.added, 5);
    assert_eq!(report.skipped, 7);
    assert_eq!(surface.layer_count(), 5);
}

// ---- Readiness gate ----

#[test]
fn test_gate_opens_on_signal() {
    let start = Instant::now();
    let mut gate = ReadinessGate::new(Duration::from_millis(1_000));
    assert!(!gate.poll(false, start));
    assert!(gate.poll(true, start + Duration::from_millis(10)));
    assert_eq!(gate.opened(), Some(GateOpened::Signalled));
    // Stays open.
    assert!(gate.poll(false, start + Duration::from_millis(20)));
}

#[test]
fn test_gate_opens_on_timeout() {
    let start = Instant::now();
    let mut gate = ReadinessGate::new(Duration::from_millis(1_000));
    assert!(!gate.poll(false, start));
    assert!(!gate.poll(false, start + Duration::from_millis(999)));
    assert!(gate.poll(false, start + Duration::from_millis(1_000)));
    assert_eq!(gate.opened(), Some(GateOpened::TimedOut));

    gate.reset();
    assert_eq!(gate.opened(), None);
    assert!(!gate.poll(false, start + Duration::from_millis(1_001)));
}

// ---- Pipeline ----

#[test]
fn test_pipeline_defers_until_ready() {
    let start = Instant::now();
    let mut engine = running(ScenarioId::TaiwanStrait);
    let mut surface = LayerStack::loading();
    let mut pipeline = OverlayPipeline::new(OverlayConfig::default(), IconRegistry::default());

    let snap = engine.tick();
    assert_eq!(pipeline.render(&mut surface, &snap, start), RenderOutcome::Deferred);
    assert_eq!(surface.layer_count(), 0);

    surface.set_ready(true);
    let snap = engine.tick();
    let outcome = pipeline.render(&mut surface, &snap, start + Duration::from_millis(100));
    assert!(matches!(outcome, RenderOutcome::Drawn { .. }));
    assert_eq!(surface.layer_count(), 3 + 12);
    assert_eq!(surface.style_count(), 1);
}

#[test]
fn test_pipeline_draws_after_timeout_and_tolerates_failures() {
    let start = Instant::now();
    let mut engine = running(ScenarioId::TaiwanStrait);
    let mut surface = LayerStack::loading();
    let config = OverlayConfig {
        readiness_timeout_ms: 50,
        ..Default::default()
    };
    let mut pipeline = OverlayPipeline::new(config, IconRegistry::default());

    assert_eq!(pipeline.render(&mut surface, &engine.tick(), start), RenderOutcome::Deferred);

    // Timed out: drawing is attempted, the still-loading surface refuses
    // every layer, and the tick carries on.
    let outcome = pipeline.render(&mut surface, &engine.tick(), start + Duration::from_millis(60));
    let RenderOutcome::Drawn { heat, markers } = outcome else {
        panic!("gate should have timed out");
    };
    assert_eq!(heat.drawn, 0);
    assert_eq!(heat.skipped, 3);
    assert_eq!(markers.skipped, 12);
    assert_eq!(pipeline.gate().opened(), Some(GateOpened::TimedOut));

    surface.set_ready(true);
    pipeline.render(&mut surface, &engine.tick(), start + Duration::from_millis(160));
    assert_eq!(surface.layer_count(), 15);
}

#[test]
fn test_pipeline_teardown_leaves_surface_empty() {
    let now = Instant::now();
    let mut engine = running(ScenarioId::SouthChinaSea);
    let mut surface = LayerStack::new();
    let mut pipeline = OverlayPipeline::new(
        OverlayConfig {
            marker_strategy: MarkerStrategy::Keyed,
            ..Default::default()
        },
        IconRegistry::default(),
    );

    for _ in 0..5 {
        pipeline.render(&mut surface, &engine.tick(), now);
    }
    assert!(surface.layer_count() > 0);
    assert_eq!(pipeline.marker_count(), 40);

    pipeline.teardown(&mut surface);
    assert_eq!(surface.layer_count(), 0);
    assert_eq!(surface.style_count(), 0);
    assert_eq!(pipeline.marker_count(), 0);
    assert_eq!(pipeline.heat_layer_count(), 0);
}

#[test]
fn test_pipeline_renders_replay_points() {
    let now = Instant::now();
    let mut surface = LayerStack::new();
    let mut pipeline = OverlayPipeline::new(OverlayConfig::default(), IconRegistry::default());
    let snap = snapshot_of(vec![
        plain("e1", Allegiance::Enemy, Some(0.7)),
        plain("e2", Allegiance::Enemy, None),
        plain("f1", Allegiance::Friendly, None),
    ]);

    pipeline.render(&mut surface, &snap, now);
    assert_eq!(surface.markers().count(), 3);
    assert_eq!(surface.heat_layers().count(), 3);
    let e1 = surface.markers().find(|m| m.id == "e1").unwrap();
    assert_eq!(e1.heading, None);
    assert_eq!(e1.icon, "icon-dot-hostile");
    assert_eq!(e1.class, "track-enemy-attribution-high");
}
