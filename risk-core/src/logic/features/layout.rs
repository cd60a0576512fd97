//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared with model artifacts.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Model artifacts record the version and hash they were trained against;
//! the loader rejects an artifact whose layout differs.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Total number of scoring features
pub const FEATURE_COUNT: usize = 5;

/// Feature names in the exact order they enter the model
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "stress",      // 0: Stress level, real in [1, 5]
    "ics",         // 1: Cardio-risk index, integer in 0..=4
    "scg",         // 2: Cognition score, real in [0, 10]
    "age",         // 3: Age in years, integer
    "poste_nuit",  // 4: Night shift flag, 0 or 1
];

/// Identifier column (not a feature)
pub const ID_COLUMN: &str = "id";

/// Columns every batch table must carry
pub const REQUIRED_COLUMNS: [&str; FEATURE_COUNT + 1] =
    [ID_COLUMN, "stress", "ics", "scg", "age", "poste_nuit"];

/// Columns appended to scored output
pub const PROBABILITY_COLUMN: &str = "probabilite";
pub const CLASS_COLUMN: &str = "classe";

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when an artifact's feature layout doesn't match ours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that an artifact's layout matches the current one
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Short reading guide for each feature, as shown next to importances
pub fn feature_description(name: &str) -> Option<&'static str> {
    match name {
        "stress" => Some("Stress (1–5) : plus élevé → risque ↑"),
        "ics" => Some("ICS (0–4) : facteurs cardio (HTA, diabète, tabac, ATCD) → risque ↑"),
        "scg" => Some("SCG (0–10) : cognition (attention, vigilance) → protecteur si élevé"),
        "age" => Some("Âge : facteur contextuel"),
        "poste_nuit" => Some("Poste de nuit : facteur contextuel"),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
