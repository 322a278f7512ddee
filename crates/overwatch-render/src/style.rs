//! Track classification and styling.
//!
//! `classify` is the single source of visuals for both renderers: it maps a
//! track to a severity bucket, a colour and an icon size. Enemy tracks that
//! carry an attribution score are graded on it; all other enemies fall back
//! to strategic value. The two paths keep their own palettes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use overwatch_core::constants::*;
use overwatch_core::enums::{Allegiance, SeverityBucket};
use overwatch_core::state::TrackPoint;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Every friendly track, whatever its value.
pub const FRIENDLY_COLOR: Rgb = Rgb(0x1e, 0x90, 0xff);

/// Enemy colours graded on attribution, indexed Low..Critical.
pub const ATTRIBUTION_PALETTE: [Rgb; 4] = [
    Rgb(0xff, 0xd1, 0x66),
    Rgb(0xff, 0x9f, 0x1c),
    Rgb(0xf3, 0x4a, 0x29),
    Rgb(0xb5, 0x00, 0x2b),
];

/// Enemy colours graded on strategic value, indexed Low..Critical.
pub const STRATEGIC_PALETTE: [Rgb; 4] = [
    Rgb(0xff, 0xcc, 0xcc),
    Rgb(0xff, 0x80, 0x80),
    Rgb(0xff, 0x33, 0x33),
    Rgb(0x99, 0x00, 0x00),
];

/// Which score an enemy colour was graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreSource {
    /// Friendly: not graded.
    None,
    Attribution,
    Strategic,
}

/// Visual treatment of one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackStyle {
    pub bucket: SeverityBucket,
    pub source: ScoreSource,
    pub color: Rgb,
    pub icon_size_px: f64,
}

impl TrackStyle {
    /// Style-sheet class name for this style, e.g. `track-enemy-attribution-high`.
    pub fn class_name(&self) -> String {
        match self.source {
            ScoreSource::None => "track-friendly".to_string(),
            ScoreSource::Attribution => format!("track-enemy-attribution-{}", bucket_slug(self.bucket)),
            ScoreSource::Strategic => format!("track-enemy-strategic-{}", bucket_slug(self.bucket)),
        }
    }
}

/// Classify a track for display.
pub fn classify(point: &TrackPoint) -> TrackStyle {
    let icon_size_px = icon_size(point.strategic_value());

    if point.allegiance() == Allegiance::Friendly {
        return TrackStyle {
            bucket: SeverityBucket::Friendly,
            source: ScoreSource::None,
            color: FRIENDLY_COLOR,
            icon_size_px,
        };
    }

    match point.attribution() {
        Some(attribution) => {
            let bucket = attribution_bucket(attribution);
            TrackStyle {
                bucket,
                source: ScoreSource::Attribution,
                color: ATTRIBUTION_PALETTE[palette_index(bucket)],
                icon_size_px,
            }
        }
        None => {
            // Plain points without attribution have no value to grade.
            let bucket = point
                .strategic_value()
                .map_or(SeverityBucket::Low, strategic_bucket);
            TrackStyle {
                bucket,
                source: ScoreSource::Strategic,
                color: STRATEGIC_PALETTE[palette_index(bucket)],
                icon_size_px,
            }
        }
    }
}

pub fn attribution_bucket(attribution: f64) -> SeverityBucket {
    if attribution >= 0.8 {
        SeverityBucket::Critical
    } else if attribution >= 0.6 {
        SeverityBucket::High
    } else if attribution >= 0.4 {
        SeverityBucket::Elevated
    } else {
        SeverityBucket::Low
    }
}

pub fn strategic_bucket(strategic_value: f64) -> SeverityBucket {
    if strategic_value >= 8.0 {
        SeverityBucket::Critical
    } else if strategic_value >= 6.0 {
        SeverityBucket::High
    } else if strategic_value >= 4.0 {
        SeverityBucket::Elevated
    } else {
        SeverityBucket::Low
    }
}

/// Icon edge length in pixels. Grows with strategic value, clamped;
/// tracks without a value get the base size.
pub fn icon_size(strategic_value: Option<f64>) -> f64 {
    match strategic_value {
        Some(value) => {
            (ICON_BASE_PX + value * ICON_PX_PER_VALUE).clamp(ICON_MIN_PX, ICON_MAX_PX)
        }
        None => ICON_BASE_PX,
    }
}

fn palette_index(bucket: SeverityBucket) -> usize {
    match bucket {
        SeverityBucket::Friendly | SeverityBucket::Low => 0,
        SeverityBucket::Elevated => 1,
        SeverityBucket::High => 2,
        SeverityBucket::Critical => 3,
    }
}

fn bucket_slug(bucket: SeverityBucket) -> &'static str {
    match bucket {
        SeverityBucket::Friendly => "friendly",
        SeverityBucket::Low => "low",
        SeverityBucket::Elevated => "elevated",
        SeverityBucket::High => "high",
        SeverityBucket::Critical => "critical",
    }
}

const GRADED: [SeverityBucket; 4] = [
    SeverityBucket::Low,
    SeverityBucket::Elevated,
    SeverityBucket::High,
    SeverityBucket::Critical,
];

// ---- Style sheet ----

/// One class rule in a style sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub class: String,
    pub color: Rgb,
}

/// Named set of class rules. Owned by whoever attaches it, and detached
/// by the same owner; nothing is installed globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    pub name: String,
    pub rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// The track sheet: one rule per class `TrackStyle::class_name` can produce.
    pub fn tracks() -> Self {
        let mut rules = vec![StyleRule {
            class: "track-friendly".to_string(),
            color: FRIENDLY_COLOR,
        }];
        for bucket in GRADED {
            rules.push(StyleRule {
                class: format!("track-enemy-attribution-{}", bucket_slug(bucket)),
                color: ATTRIBUTION_PALETTE[palette_index(bucket)],
            });
            rules.push(StyleRule {
                class: format!("track-enemy-strategic-{}", bucket_slug(bucket)),
                color: STRATEGIC_PALETTE[palette_index(bucket)],
            });
        }
        Self {
            name: "overwatch-tracks".to_string(),
            rules,
        }
    }

    pub fn rule(&self, class: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.class == class)
    }
}

// ---- Icons ----

/// Shape of a track, as far as icons are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Plain,
    Jet,
}

impl TrackKind {
    pub fn of(point: &TrackPoint) -> Self {
        match point {
            TrackPoint::Plain(_) => TrackKind::Plain,
            TrackPoint::Jet(_) => TrackKind::Jet,
        }
    }
}

/// Icon used when the registry has no entry for a track.
pub const FALLBACK_ICON: &str = "icon-unknown";

/// Maps (allegiance, kind) to an icon key. Passed explicitly to the
/// marker renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct IconRegistry {
    icons: HashMap<(Allegiance, TrackKind), String>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::empty()
            .with_icon(Allegiance::Friendly, TrackKind::Jet, "icon-jet-friendly")
            .with_icon(Allegiance::Enemy, TrackKind::Jet, "icon-jet-hostile")
            .with_icon(Allegiance::Friendly, TrackKind::Plain, "icon-dot-friendly")
            .with_icon(Allegiance::Enemy, TrackKind::Plain, "icon-dot-hostile")
    }
}

impl IconRegistry {
    pub fn empty() -> Self {
        Self {
            icons: HashMap::new(),
        }
    }

    pub fn with_icon(
        mut self,
        allegiance: Allegiance,
        kind: TrackKind,
        icon: impl Into<String>,
    ) -> Self {
        self.icons.insert((allegiance, kind), icon.into());
        self
    }

    pub fn icon_for(&self, point: &TrackPoint) -> &str {
        self.icons
            .get(&(point.allegiance(), TrackKind::of(point)))
            .map_or(FALLBACK_ICON, String::as_str)
    }
}
