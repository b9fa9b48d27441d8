//! Canonical forms for label text, volumes and alcohol content.
//!
//! All entry points accept `Option<&str>` so a partially extracted label
//! (fields the vision service could not read) compares as empty text.

use std::sync::LazyLock;

use regex::Regex;

/// US customary fluid ounce in millilitres.
const ML_PER_FL_OZ: f64 = 29.5735;

/// Volume units tried in order against the whitespace-stripped input.
/// `fl oz` must come before bare `oz`. Digits are ASCII only.
static VOLUME_UNITS: LazyLock<Vec<(Regex, f64)>> = LazyLock::new(|| {
    [
        (r"([0-9]+\.?[0-9]*)ml", 1.0),
        (r"([0-9]+\.?[0-9]*)l", 1000.0),
        (r"([0-9]+\.?[0-9]*)cl", 10.0),
        (r"([0-9]+\.?[0-9]*)floz", ML_PER_FL_OZ),
        (r"([0-9]+\.?[0-9]*)oz", ML_PER_FL_OZ),
    ]
    .into_iter()
    .map(|(pattern, factor)| (Regex::new(pattern).expect("valid volume regex"), factor))
    .collect()
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)").expect("valid number regex"));

/// Normalized net contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
    /// Parsed and converted, rounded to two decimals.
    Milliliters(f64),
    /// No recognizable unit; the lower-cased text with whitespace removed.
    Unparsed(String),
}

impl Volume {
    /// Tolerance below which two parsed volumes are considered equal.
    pub const TOLERANCE_ML: f64 = 1.0;

    pub fn milliliters(&self) -> Option<f64> {
        match self {
            Volume::Milliliters(ml) => Some(*ml),
            Volume::Unparsed(_) => None,
        }
    }

    /// Parsed volumes match within [`Self::TOLERANCE_ML`] (exclusive), unparsed
    /// ones only by exact text. A parsed volume never matches an unparsed one.
    pub fn matches(&self, other: &Volume) -> bool {
        match (self, other) {
            (Volume::Milliliters(a), Volume::Milliliters(b)) => {
                a == b || (a - b).abs() < Self::TOLERANCE_ML
            }
            (Volume::Unparsed(a), Volume::Unparsed(b)) => a == b,
            _ => false,
        }
    }
}

/// Lower-cases, keeps only word characters, whitespace and `.`, collapses
/// whitespace runs and trims.
pub fn normalize_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '.' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a net contents declaration such as `750 mL`, `1.75L`, `75 cl` or
/// `25.4 fl oz` into millilitres.
pub fn normalize_volume(text: Option<&str>) -> Volume {
    let compact: String = text
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    for (pattern, factor) in VOLUME_UNITS.iter() {
        let Some(value) = pattern
            .captures(&compact)
            .and_then(|caps| caps[1].parse::<f64>().ok())
        else {
            continue;
        };
        let ml = (value * factor * 100.0).round() / 100.0;
        return Volume::Milliliters(ml);
    }

    Volume::Unparsed(compact)
}

/// First numeric token of an alcohol-content string (`45%`, `ABV 40.5`),
/// or `None` when there is none.
pub fn normalize_abv(text: Option<&str>) -> Option<f64> {
    NUMBER_RE
        .captures(text?)
        .and_then(|caps| caps[1].parse().ok())
}
