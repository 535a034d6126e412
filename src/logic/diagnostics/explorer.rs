use std::path::Path;

use super::report::{CandidateTable, ExplorationReport, TableError};
use super::validator::KEY_TABLES;
use super::{
    columns_containing, list_tables, open_snapshot, result_columns, row_count, sample_rows,
    DiagnosticResult, Snapshot,
};

/// Looks for tables that carry per-player, per-game rows
pub struct PlayerDataExplorer {
    conn: Snapshot,
    label: String,
}

fn first_three(columns: Vec<String>) -> Vec<String> {
    columns.into_iter().take(3).collect()
}

impl PlayerDataExplorer {
    pub fn open(path: &Path) -> DiagnosticResult<Self> {
        Ok(Self {
            conn: open_snapshot(path)?,
            label: path.display().to_string(),
        })
    }

    fn candidate(&self, table: &str) -> DiagnosticResult<Option<CandidateTable>> {
        let columns = result_columns(&self.conn, table)?;
        let player_columns = columns_containing(&columns, &["player"]);
        let game_columns = columns_containing(&columns, &["game"]);
        if player_columns.is_empty() || game_columns.is_empty() {
            return Ok(None);
        }

        Ok(Some(CandidateTable {
            name: table.to_string(),
            player_columns: first_three(player_columns),
            game_columns: first_three(game_columns),
            row_count: row_count(&self.conn, table)?,
        }))
    }

    /// Per-table problems are recorded in the report, not returned
    pub fn explore(&self) -> DiagnosticResult<ExplorationReport> {
        let tables = list_tables(&self.conn)?;
        let mut report = ExplorationReport {
            path: self.label.clone(),
            ..ExplorationReport::default()
        };

        match result_columns(&self.conn, "play_by_play") {
            Ok(columns) => {
                report.play_by_play_player_columns = columns_containing(&columns, &["player"]);
                report.play_by_play_columns = Some(columns);
            }
            Err(e) => report.errors.push(TableError {
                table: "play_by_play".to_string(),
                error: e.to_string(),
            }),
        }

        let info = result_columns(&self.conn, "common_player_info")
            .and_then(|columns| Ok((sample_rows(&self.conn, "common_player_info", 3)?, columns)));
        match info {
            Ok((rows, columns)) => {
                report.common_player_info_shape = Some((rows, columns.len()));
                report.common_player_info_columns = Some(columns);
            }
            Err(e) => report.errors.push(TableError {
                table: "common_player_info".to_string(),
                error: e.to_string(),
            }),
        }

        for table in tables.iter().filter(|t| !KEY_TABLES.contains(&t.as_str())) {
            match self.candidate(table) {
                Ok(Some(candidate)) => report.candidates.push(candidate),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Could not analyze {}: {}", table, e);
                    report.errors.push(TableError {
                        table: table.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Explored {}: {} candidate tables, player-level data {}",
            self.label,
            report.candidates.len(),
            if report.has_player_level_data() { "found" } else { "not found" }
        );

        Ok(report)
    }
}
