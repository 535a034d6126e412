//! Feature Layout - Canonical injury feature definition
//!
//! **This file mirrors the layout the injury model was trained on.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The schema artifact loaded at runtime is authoritative; this layout is
//! what the static player table is keyed by and what fixtures are built on.

use serde::{Deserialize, Serialize};

use crate::logic::artifacts::schema::layout_hash;
use crate::logic::artifacts::{ArtifactError, FeatureSchema};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u32 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Feature names in exact training order
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Per-game activity (0-8) ===
    "total_actions",          // 0
    "made_shots",             // 1
    "missed_shots",           // 2
    "free_throws",            // 3
    "rebounds",               // 4
    "fouls",                  // 5
    "turnovers",              // 6
    "total_shot_attempts",    // 7
    "shooting_efficiency",    // 8

    // === 30-day rolling load (9-12) ===
    "total_actions_30d",      // 9
    "shooting_load_30d",      // 10
    "defensive_load_30d",     // 11
    "substitution_rate_30d",  // 12

    // === Usage and contact (13-14) ===
    "contact_usage_rate",     // 13
    "substitution_frequency", // 14

    // === Performance vs season (15-21) ===
    "shots_vs_season_avg",    // 15
    "rebounds_vs_season_avg", // 16
    "performance_drop_7vs30", // 17
    "current_vs_14day_avg",   // 18
    "shooting_eff_decline",   // 19
    "is_low_performance",     // 20
    "consecutive_low_games",  // 21

    // === Trends (22-23) ===
    "actions_trend_7d",       // 22
    "efficiency_trend_7d",    // 23

    // === Rest and fatigue (24-28) ===
    "rest_days_since_last",   // 24
    "games_last_14_days",     // 25
    "is_back_to_back",        // 26
    "cumulative_actions_30d", // 27
    "fatigue_score",          // 28

    // === Physical (29-30) ===
    "bmi",                    // 29
    "age_at_game",            // 30

    // === Schedule context (31-33) ===
    "game_day_of_week",       // 31
    "is_weekend_game",        // 32
    "is_christmas_period",    // 33
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 34;

/// CRC32 of the canonical layout
pub fn canonical_layout_hash() -> u32 {
    layout_hash(FEATURE_VERSION, FEATURE_LAYOUT)
}

/// The canonical layout as a schema
pub fn canonical_schema() -> Result<FeatureSchema, ArtifactError> {
    FeatureSchema::new(
        FEATURE_VERSION,
        FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
    )
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u32,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: canonical_layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_canonical_schema_matches_layout() {
        let schema = canonical_schema().unwrap();
        assert_eq!(schema.len(), FEATURE_COUNT);
        assert_eq!(schema.layout_hash(), canonical_layout_hash());
        assert_eq!(LayoutInfo::current().hash, schema.layout_hash());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("total_actions"), Some(0));
        assert_eq!(feature_index("contact_usage_rate"), Some(13));
        assert_eq!(feature_index("fatigue_score"), Some(28));
        assert_eq!(feature_index("age_at_game"), Some(30));
        assert_eq!(feature_index("is_christmas_period"), Some(33));
        assert_eq!(feature_index("nonexistent"), None);
    }
}
