use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;

use super::report::{
    DatasetReport, DateRange, KeyTable, Readiness, TableSummary, Verdict, VolumeAssessment, VolumeNote,
};
use super::{
    columns_containing, list_tables, open_snapshot, quote_ident, render_value, result_columns, row_count,
    sample_rows, table_columns, DiagnosticResult, Snapshot,
};

pub const KEY_TABLES: [&str; 4] = ["game", "other_stats", "player", "team"];
const VOLUME_TABLES: [&str; 3] = ["game", "other_stats", "player"];
const DATE_CANDIDATES: [&str; 3] = ["game_date", "date", "game_date_est"];
const WORKLOAD_NEEDLES: [&str; 5] = ["minutes", "mp", "min", "usage", "touches"];
const SAMPLE_COLUMNS: usize = 8;

/// Schema and volume check of a basketball statistics snapshot
pub struct DatasetValidator {
    conn: Snapshot,
    label: String,
}

impl DatasetValidator {
    pub fn open(path: &Path) -> DiagnosticResult<Self> {
        Ok(Self {
            conn: open_snapshot(path)?,
            label: path.display().to_string(),
        })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    fn summarize(&self, table: &str) -> DiagnosticResult<TableSummary> {
        let columns = table_columns(&self.conn, table)?;
        let sample_columns = result_columns(&self.conn, table)?
            .into_iter()
            .take(SAMPLE_COLUMNS)
            .collect();
        Ok(TableSummary {
            name: table.to_string(),
            columns,
            row_count: row_count(&self.conn, table)?,
            sample_columns,
        })
    }

    fn readiness(&self, tables: &[String]) -> DiagnosticResult<Readiness> {
        let has = |name: &str| tables.iter().any(|t| t == name);
        let mut readiness = Readiness::default();

        if has("game") {
            readiness.game_sample_rows = Some(sample_rows(&self.conn, "game", 5)?);
            readiness.date_columns = columns_containing(&result_columns(&self.conn, "game")?, &["date"]);
        }
        if has("other_stats") {
            readiness.has_player_stats = true;
            readiness.workload_columns =
                columns_containing(&result_columns(&self.conn, "other_stats")?, &WORKLOAD_NEEDLES);
        }
        if has("play_by_play") {
            readiness.play_by_play_sample_rows = Some(sample_rows(&self.conn, "play_by_play", 3)?);
        }

        Ok(readiness)
    }

    /// MIN/MAX over the first date column `game` actually has
    fn date_range(&self, tables: &[String]) -> Option<DateRange> {
        if !tables.iter().any(|t| t == "game") {
            return None;
        }
        let columns = table_columns(&self.conn, "game").ok()?;

        DATE_CANDIDATES
            .iter()
            .filter(|candidate| columns.iter().any(|c| c.as_str() == **candidate))
            .find_map(|column| {
                let sql = format!(
                    "SELECT MIN({col}), MAX({col}) FROM game",
                    col = quote_ident(column)
                );
                let result = self.conn.query_row(&sql, [], |row| {
                    Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
                });
                match result {
                    Ok((min, max)) => Some(DateRange {
                        column: column.to_string(),
                        min: render_value(min),
                        max: render_value(max),
                    }),
                    Err(e) => {
                        log::debug!("Date range on game.{} failed: {}", column, e);
                        None
                    }
                }
            })
    }

    pub fn validate(&self) -> DiagnosticResult<DatasetReport> {
        let tables = list_tables(&self.conn)?;
        let has = |name: &str| tables.iter().any(|t| t == name);
        log::info!("Validating {} ({} tables)", self.label, tables.len());

        let key_tables = KEY_TABLES
            .iter()
            .map(|&name| {
                let summary = if has(name) { Some(self.summarize(name)?) } else { None };
                Ok(KeyTable {
                    name: name.to_string(),
                    summary,
                })
            })
            .collect::<DiagnosticResult<Vec<_>>>()?;

        let readiness = self.readiness(&tables)?;
        let date_range = self.date_range(&tables);

        let volume = VOLUME_TABLES
            .iter()
            .filter(|name| has(**name))
            .map(|&name| {
                let count = row_count(&self.conn, name)?;
                Ok(VolumeNote {
                    table: name.to_string(),
                    count,
                    assessment: VolumeAssessment::assess(name, count),
                })
            })
            .collect::<DiagnosticResult<Vec<_>>>()?;

        let verdict = Verdict::from_tables(has("game"), has("other_stats"), has("player"));
        log::info!("Dataset verdict: {}", verdict);

        Ok(DatasetReport {
            path: self.label.clone(),
            tables,
            key_tables,
            readiness,
            date_range,
            volume,
            verdict,
        })
    }
}
