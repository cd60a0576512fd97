//! Threshold Configuration and Classification
//!
//! Maps a probability to "Stable" / "À risque". The comparison is
//! inclusive on the at-risk side; the threshold itself is not range-checked.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THRESHOLD, THRESHOLD_MAX, THRESHOLD_MIN, THRESHOLD_STEP};

/// Threshold Configuration (interactive slider bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Default threshold (0.0 - 1.0)
    pub default: f64,

    /// Lowest value offered interactively
    pub min: f64,

    /// Highest value offered interactively
    pub max: f64,

    /// Slider step
    pub step: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_THRESHOLD,
            min: THRESHOLD_MIN,
            max: THRESHOLD_MAX,
            step: THRESHOLD_STEP,
        }
    }
}

impl ThresholdConfig {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    /// Whether a value lies within the interactive range
    pub fn in_range(&self, threshold: f64) -> bool {
        (self.min..=self.max).contains(&threshold)
    }
}

/// Two-valued risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Stable")]
    Stable,
    #[serde(rename = "À risque")]
    AtRisk,
}

impl RiskLabel {
    /// Labels in display order
    pub const ALL: [RiskLabel; 2] = [RiskLabel::Stable, RiskLabel::AtRisk];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Stable => "Stable",
            RiskLabel::AtRisk => "À risque",
        }
    }

    /// Classify a probability in [0, 1]
    pub fn classify(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            RiskLabel::AtRisk
        } else {
            RiskLabel::Stable
        }
    }

    pub fn is_at_risk(&self) -> bool {
        *self == RiskLabel::AtRisk
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a probability expressed as a percentage (0–100)
pub fn label(probability_percent: f64, threshold: f64) -> RiskLabel {
    RiskLabel::classify(probability_percent / 100.0, threshold)
}
