//! Static player table
//!
//! Known per-player values for the five sample players, keyed by the
//! canonical layout. Rows are assembled by name in whatever order the
//! loaded schema asks for.

use serde::Serialize;

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};
use super::{FeatureBatch, FeatureSource, Subject};
use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::FeatureSchema;

struct PlayerRow {
    name: &'static str,
    position: &'static str,
    values: [f64; FEATURE_COUNT],
}

#[rustfmt::skip]
const PLAYERS: &[PlayerRow] = &[
    PlayerRow {
        name: "LeBron James",
        position: "SF",
        values: [
            85.2, 9.8, 12.1, 4.2, 7.8, 1.8, 3.8, 21.9, 0.448,
            2556.0, 657.0, 234.0, 0.15,
            0.72, 2.1,
            1.05, 1.12, 0.02, 0.98, -0.01, 0.0, 0.0,
            0.01, -0.005,
            1.2, 12.0, 0.0, 2556.0, 0.68,
            27.5, 39.8,
            3.0, 0.0, 0.0,
        ],
    },
    PlayerRow {
        name: "Stephen Curry",
        position: "PG",
        values: [
            78.5, 10.1, 12.8, 3.9, 5.1, 2.2, 3.2, 22.9, 0.441,
            2355.0, 687.0, 153.0, 0.18,
            0.45, 2.8,
            1.15, 0.88, 0.05, 1.02, 0.01, 0.0, 0.0,
            0.02, 0.01,
            1.4, 11.0, 0.0, 2355.0, 0.52,
            23.8, 36.2,
            5.0, 1.0, 0.0,
        ],
    },
    PlayerRow {
        name: "Kevin Durant",
        position: "PF",
        values: [
            82.1, 11.2, 10.5, 5.8, 6.6, 2.1, 3.5, 21.7, 0.516,
            2463.0, 651.0, 198.0, 0.16,
            0.58, 2.4,
            1.08, 0.95, 0.08, 0.95, 0.02, 0.0, 1.0,
            -0.01, 0.005,
            1.8, 10.0, 0.0, 2463.0, 0.61,
            26.1, 36.5,
            2.0, 0.0, 0.0,
        ],
    },
    PlayerRow {
        name: "Giannis Antetokounmpo",
        position: "PF",
        values: [
            92.8, 11.8, 11.2, 7.2, 11.2, 3.1, 4.2, 23.0, 0.513,
            2784.0, 690.0, 336.0, 0.12,
            0.85, 1.8,
            1.12, 1.25, 0.03, 1.01, -0.005, 0.0, 0.0,
            0.015, 0.008,
            1.1, 13.0, 0.0, 2784.0, 0.73,
            28.2, 29.8,
            6.0, 1.0, 0.0,
        ],
    },
    PlayerRow {
        name: "Luka Doncic",
        position: "PG",
        values: [
            89.5, 9.8, 13.7, 6.1, 8.9, 2.8, 4.6, 23.5, 0.417,
            2685.0, 705.0, 267.0, 0.14,
            0.68, 2.2,
            1.18, 1.15, 0.06, 0.97, 0.01, 0.0, 1.0,
            0.005, -0.01,
            1.3, 12.0, 1.0, 2685.0, 0.71,
            26.8, 25.9,
            1.0, 0.0, 1.0,
        ],
    },
];

/// Min / max / mean of one feature across the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRange {
    pub feature: &'static str,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StaticSource;

impl StaticSource {
    pub fn new() -> Self {
        Self
    }

    pub fn subjects(&self) -> Vec<Subject> {
        PLAYERS
            .iter()
            .map(|p| Subject::new(p.name, p.position, player_age(p)))
            .collect()
    }

    /// Value of `feature` for `player`, if both are in the table
    pub fn value(&self, player: &str, feature: &str) -> Option<f64> {
        let index = feature_index(feature)?;
        PLAYERS
            .iter()
            .find(|p| p.name == player)
            .map(|p| p.values[index])
    }

    pub fn feature_ranges(&self) -> Vec<FeatureRange> {
        let n = PLAYERS.len() as f64;
        FEATURE_LAYOUT
            .iter()
            .enumerate()
            .map(|(i, &feature)| {
                let column = PLAYERS.iter().map(|p| p.values[i]);
                FeatureRange {
                    feature,
                    min: column.clone().fold(f64::INFINITY, f64::min),
                    max: column.clone().fold(f64::NEG_INFINITY, f64::max),
                    mean: column.sum::<f64>() / n,
                }
            })
            .collect()
    }
}

fn player_age(player: &PlayerRow) -> Option<f64> {
    feature_index("age_at_game").map(|i| player.values[i].floor())
}

impl FeatureSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn build(&self, schema: &FeatureSchema) -> PipelineResult<FeatureBatch> {
        let columns: Vec<usize> = schema
            .names()
            .iter()
            .map(|name| {
                feature_index(name).ok_or_else(|| {
                    PipelineError::SchemaMismatch(format!(
                        "feature '{}' is not in the static player table",
                        name
                    ))
                })
            })
            .collect::<PipelineResult<_>>()?;

        let rows = PLAYERS
            .iter()
            .map(|p| columns.iter().map(|&c| p.values[c]).collect())
            .collect();

        log::info!(
            "Loaded static features: {} players x {} features",
            PLAYERS.len(),
            columns.len()
        );

        FeatureBatch::from_rows(schema, self.subjects(), rows)
    }
}
