//! Entity model generator.
//!
//! Produces the initial track list for a scenario, either from a fixed
//! formation layout or by scattering formations at random. Generation is
//! pure data construction: nothing is spawned here.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use overwatch_core::components::{ThreatAttributes, TrackIdentity};
use overwatch_core::constants::*;
use overwatch_core::enums::Allegiance;
use overwatch_core::types::GeoPoint;

/// Call signs assigned in slot order by the fixed layout.
pub const CALL_SIGNS: [&str; 12] = [
    "VIPER", "EAGLE", "FALCON", "HAWK", "RAPTOR", "COBRA", "GHOST", "REAPER", "SABRE", "TALON",
    "LANCER", "WRAITH",
];

/// Aircraft types flown by each side.
pub const FRIENDLY_TYPES: [&str; 3] = ["F-16V", "Mirage 2000-5", "F-CK-1 IDF"];
pub const ENEMY_TYPES: [&str; 6] = ["J-16", "J-10C", "Su-30MKK", "J-20", "KJ-500", "H-6K"];

/// Everything needed to spawn one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSpec {
    pub identity: TrackIdentity,
    pub threat: ThreatAttributes,
    pub position: GeoPoint,
    /// Metres.
    pub altitude: f64,
    /// Knots.
    pub cruise_speed: f64,
}

/// One slot of the fixed layout.
struct Slot {
    bearing_deg: f64,
    radius_mult: f64,
    allegiance: Allegiance,
    aircraft_type: &'static str,
    threat: f64,
    armament: f64,
    high_value: bool,
    altitude: f64,
    speed: f64,
}

#[allow(clippy::too_many_arguments)]
const fn slot(
    bearing_deg: f64,
    radius_mult: f64,
    allegiance: Allegiance,
    aircraft_type: &'static str,
    threat: f64,
    armament: f64,
    high_value: bool,
    altitude: f64,
    speed: f64,
) -> Slot {
    Slot {
        bearing_deg,
        radius_mult,
        allegiance,
        aircraft_type,
        threat,
        armament,
        high_value,
        altitude,
        speed,
    }
}

/// Six friendly/enemy pairs. The friendly of each pair holds the inner
/// ring; its opposite number sits further out on a bearing 15° off.
const FIXED_LAYOUT: [Slot; 12] = [
    slot(0.0, 0.45, Allegiance::Friendly, "F-16V", 6.0, 7.0, true, 9_000.0, 480.0),
    slot(15.0, 0.9, Allegiance::Enemy, "J-16", 8.0, 8.0, false, 8_500.0, 520.0),
    slot(60.0, 0.45, Allegiance::Friendly, "Mirage 2000-5", 5.0, 6.0, false, 10_000.0, 500.0),
    slot(75.0, 0.9, Allegiance::Enemy, "J-10C", 7.0, 6.0, false, 9_500.0, 540.0),
    slot(120.0, 0.45, Allegiance::Friendly, "F-CK-1 IDF", 4.0, 5.0, false, 7_500.0, 450.0),
    slot(135.0, 0.9, Allegiance::Enemy, "Su-30MKK", 6.0, 7.0, false, 8_000.0, 500.0),
    slot(180.0, 0.45, Allegiance::Friendly, "F-16V", 6.0, 6.0, false, 9_000.0, 480.0),
    slot(195.0, 0.9, Allegiance::Enemy, "J-20", 9.0, 9.0, false, 11_000.0, 600.0),
    slot(240.0, 0.45, Allegiance::Friendly, "Mirage 2000-5", 5.0, 5.0, false, 10_500.0, 500.0),
    slot(255.0, 0.9, Allegiance::Enemy, "KJ-500", 3.0, 2.0, true, 9_000.0, 380.0),
    slot(300.0, 0.45, Allegiance::Friendly, "F-CK-1 IDF", 4.0, 4.0, false, 7_000.0, 450.0),
    slot(315.0, 0.9, Allegiance::Enemy, "H-6K", 7.0, 10.0, true, 10_000.0, 420.0),
];

/// Fixed, reproducible layout of twelve tracks around `center`.
///
/// Positions, types and call signs never vary. Only the attribution
/// jitter of enemy tracks is drawn from `rng`.
pub fn fixed_layout(rng: &mut ChaCha8Rng, center: GeoPoint, radius_deg: f64) -> Vec<TrackSpec> {
    let mut friendly_n = 0;
    let mut enemy_n = 0;

    FIXED_LAYOUT
        .iter()
        .zip(CALL_SIGNS)
        .map(|(slot, call_sign)| {
            let id = next_id(slot.allegiance, &mut friendly_n, &mut enemy_n);
            let attribution = attribution_for(rng, slot.allegiance, slot.threat);
            TrackSpec {
                identity: TrackIdentity {
                    id,
                    allegiance: slot.allegiance,
                    aircraft_type: slot.aircraft_type.to_string(),
                    call_sign: Some(call_sign.to_string()),
                },
                threat: ThreatAttributes::new(
                    slot.allegiance,
                    slot.threat,
                    slot.armament,
                    slot.high_value,
                    attribution,
                ),
                position: center.offset(slot.bearing_deg, radius_deg * slot.radius_mult),
                altitude: slot.altitude,
                cruise_speed: slot.speed,
            }
        })
        .collect()
}

/// Scatter `count` tracks across 3–4 random formations within `radius_deg`.
///
/// The first track of each formation is its high-value lead, placed on the
/// formation centre; the rest are wingmen scattered around it. Formations
/// alternate sides, starting with the enemy.
pub fn randomized(
    rng: &mut ChaCha8Rng,
    center: GeoPoint,
    radius_deg: f64,
    count: usize,
) -> Vec<TrackSpec> {
    if count == 0 {
        return Vec::new();
    }
    let radius_deg = radius_deg.abs();
    let formations = rng.gen_range(MIN_FORMATIONS..=MAX_FORMATIONS).min(count);
    let mut friendly_n = 0;
    let mut enemy_n = 0;
    let mut specs = Vec::with_capacity(count);

    for f in 0..formations {
        let allegiance = if f % 2 == 0 {
            Allegiance::Enemy
        } else {
            Allegiance::Friendly
        };
        let formation_center = center.offset(
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..=radius_deg * FORMATION_CENTER_SPREAD),
        );
        let members = count / formations + usize::from(f < count % formations);

        for m in 0..members {
            let lead = m == 0;
            let (threat, armament, position) = if lead {
                (
                    rng.gen_range(8.0..=10.0),
                    rng.gen_range(7.0..=10.0),
                    formation_center,
                )
            } else {
                let offset = formation_center.offset(
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(0.0..=radius_deg * FORMATION_SCATTER),
                );
                (rng.gen_range(3.0..=8.0), rng.gen_range(2.0..=8.0), offset)
            };
            let aircraft_type = pick_type(rng, allegiance);
            let attribution = attribution_for(rng, allegiance, threat);
            let id = next_id(allegiance, &mut friendly_n, &mut enemy_n);

            specs.push(TrackSpec {
                identity: TrackIdentity {
                    id,
                    allegiance,
                    aircraft_type: aircraft_type.to_string(),
                    call_sign: Some(format!("{} {}", CALL_SIGNS[f % CALL_SIGNS.len()], m + 1)),
                },
                threat: ThreatAttributes::new(allegiance, threat, armament, lead, attribution),
                position,
                altitude: rng.gen_range(ALTITUDE_MIN_M..=ALTITUDE_MAX_M).round(),
                cruise_speed: rng.gen_range(SPEED_MIN_KT..=SPEED_MAX_KT).round(),
            });
        }
    }
    specs
}

/// Attribution for enemy tracks: a base confidence scaled by threat level,
/// plus a little jitter, clamped to [0, 1]. Friendlies get none.
pub fn attribution_for(rng: &mut ChaCha8Rng, allegiance: Allegiance, threat: f64) -> Option<f64> {
    match allegiance {
        Allegiance::Friendly => None,
        Allegiance::Enemy => {
            let jitter = rng.gen_range(-ATTRIBUTION_JITTER..=ATTRIBUTION_JITTER);
            Some((ATTRIBUTION_BASE + threat * ATTRIBUTION_PER_THREAT + jitter).clamp(0.0, 1.0))
        }
    }
}

fn pick_type(rng: &mut ChaCha8Rng, allegiance: Allegiance) -> &'static str {
    match allegiance {
        Allegiance::Friendly => FRIENDLY_TYPES[rng.gen_range(0..FRIENDLY_TYPES.len())],
        Allegiance::Enemy => ENEMY_TYPES[rng.gen_range(0..ENEMY_TYPES.len())],
    }
}

fn next_id(allegiance: Allegiance, friendly_n: &mut u32, enemy_n: &mut u32) -> String {
    match allegiance {
        Allegiance::Friendly => {
            *friendly_n += 1;
            format!("F-{:02}", friendly_n)
        }
        Allegiance::Enemy => {
            *enemy_n += 1;
            format!("E-{:02}", enemy_n)
        }
    }
}
