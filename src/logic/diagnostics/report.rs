//! Diagnostic report types and their console rendering

use std::fmt;

use serde::Serialize;

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// game, other_stats and player all present
    Excellent,
    /// game and other_stats present
    Good,
    Concerning,
}

impl Verdict {
    pub fn from_tables(has_games: bool, has_stats: bool, has_players: bool) -> Self {
        match (has_games, has_stats, has_players) {
            (true, true, true) => Verdict::Excellent,
            (true, true, false) => Verdict::Good,
            _ => Verdict::Concerning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT",
            Verdict::Good => "GOOD",
            Verdict::Concerning => "CONCERNING",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Verdict::Excellent => "All core tables present - proceed with project",
            Verdict::Good => "Core data available - project viable with some limitations",
            Verdict::Concerning => "Missing key tables - may need to find alternative dataset",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VOLUME
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeAssessment {
    Sufficient,
    Excellent,
    GoodCoverage,
    CheckIfSufficient,
}

impl VolumeAssessment {
    /// Thresholds: game >= 5 000, other_stats >= 50 000, player >= 1 000
    pub fn assess(table: &str, count: u64) -> Self {
        match table {
            "game" if count >= 5_000 => VolumeAssessment::Sufficient,
            "other_stats" if count >= 50_000 => VolumeAssessment::Excellent,
            "player" if count >= 1_000 => VolumeAssessment::GoodCoverage,
            _ => VolumeAssessment::CheckIfSufficient,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VolumeAssessment::Sufficient => "sufficient for ML",
            VolumeAssessment::Excellent => "excellent for ML",
            VolumeAssessment::GoodCoverage => "good coverage",
            VolumeAssessment::CheckIfSufficient => "check if sufficient",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeNote {
    pub table: String,
    pub count: u64,
    pub assessment: VolumeAssessment,
}

// ============================================================================
// DATASET REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: u64,
    /// First 8 result columns
    pub sample_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyTable {
    pub name: String,
    /// None when the table does not exist
    pub summary: Option<TableSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Readiness {
    /// Rows in a 5-row sample of `game`
    pub game_sample_rows: Option<usize>,
    pub date_columns: Vec<String>,
    pub has_player_stats: bool,
    pub workload_columns: Vec<String>,
    /// Rows in a 3-row sample of `play_by_play`
    pub play_by_play_sample_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub column: String,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub path: String,
    pub tables: Vec<String>,
    pub key_tables: Vec<KeyTable>,
    pub readiness: Readiness,
    pub date_range: Option<DateRange>,
    pub volume: Vec<VolumeNote>,
    pub verdict: Verdict,
}

impl DatasetReport {
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NBA Dataset Validation Report")?;
        writeln!(f, "Database: {}", self.path)?;

        writeln!(f, "\nAvailable Tables ({}):", self.tables.len())?;
        for table in &self.tables {
            writeln!(f, "  - {}", table)?;
        }

        for key in &self.key_tables {
            match &key.summary {
                Some(s) => {
                    writeln!(f, "\n{} TABLE:", key.name.to_uppercase())?;
                    writeln!(f, "   Columns: {:?}", s.columns)?;
                    writeln!(f, "   Rows: {} records", s.row_count)?;
                    writeln!(f, "   Sample: {:?}...", s.sample_columns)?;
                }
                None => writeln!(f, "\n{} TABLE: Not found", key.name.to_uppercase())?,
            }
        }

        writeln!(f, "\nINJURY PREDICTION READINESS:")?;
        let r = &self.readiness;
        if let Some(n) = r.game_sample_rows {
            writeln!(f, "   Game data available: {} sample records", n)?;
            writeln!(f, "   Date columns: {:?}", r.date_columns)?;
        }
        if r.has_player_stats {
            writeln!(f, "   Player stats available: other_stats")?;
            writeln!(f, "   Workload metrics: {:?}", r.workload_columns)?;
        }
        if let Some(n) = r.play_by_play_sample_rows {
            writeln!(f, "   Play-by-play data available: {} sample records", n)?;
        }

        writeln!(f, "\nDATA TIMEFRAME:")?;
        match &self.date_range {
            Some(range) => writeln!(
                f,
                "   Range: {} to {} ({})",
                or_dash(&range.min),
                or_dash(&range.max),
                range.column
            )?,
            None => writeln!(f, "   Could not determine date range - check other columns")?,
        }

        writeln!(f, "\nDATA VOLUME (for ML viability):")?;
        for note in &self.volume {
            writeln!(f, "   {}: {} records ({})", note.table, note.count, note.assessment.label())?;
        }

        writeln!(f, "\nPROJECT VIABILITY ASSESSMENT:")?;
        writeln!(f, "   {}: {}", self.verdict, self.verdict.summary())?;
        if self.verdict == Verdict::Excellent {
            writeln!(f, "      1. Explore 'other_stats' table for player workload features")?;
            writeln!(f, "      2. Check date formats in 'game' table")?;
            writeln!(f, "      3. Look for minutes played, usage rate in other_stats")?;
            writeln!(f, "      4. Consider performance decline as injury proxy")?;
            writeln!(f, "      5. Use play_by_play data for detailed analysis")?;
        }
        Ok(())
    }
}

// ============================================================================
// EXPLORATION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTable {
    pub name: String,
    /// First three player-related columns
    pub player_columns: Vec<String>,
    /// First three game-related columns
    pub game_columns: Vec<String>,
    pub row_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableError {
    pub table: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExplorationReport {
    pub path: String,
    pub play_by_play_columns: Option<Vec<String>>,
    pub play_by_play_player_columns: Vec<String>,
    pub common_player_info_columns: Option<Vec<String>>,
    /// (rows, columns) of a 3-row sample
    pub common_player_info_shape: Option<(usize, usize)>,
    pub candidates: Vec<CandidateTable>,
    pub errors: Vec<TableError>,
}

impl ExplorationReport {
    /// play_by_play carries player identifiers
    pub fn has_player_level_data(&self) -> bool {
        !self.play_by_play_player_columns.is_empty()
    }
}

impl fmt::Display for ExplorationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Searching for Player-Level Game Stats")?;
        writeln!(f, "Database: {}", self.path)?;

        writeln!(f, "\nPLAY_BY_PLAY TABLE:")?;
        match &self.play_by_play_columns {
            Some(columns) => {
                writeln!(f, "   Columns: {:?}", columns)?;
                writeln!(f, "   Player related columns: {:?}", self.play_by_play_player_columns)?;
            }
            None => writeln!(f, "   Not available")?,
        }

        writeln!(f, "\nCOMMON_PLAYER_INFO TABLE:")?;
        match (&self.common_player_info_columns, self.common_player_info_shape) {
            (Some(columns), Some((rows, cols))) => {
                writeln!(f, "   Columns: {:?}", columns)?;
                writeln!(f, "   Sample data shape: ({}, {})", rows, cols)?;
            }
            _ => writeln!(f, "   Not available")?,
        }

        if self.has_player_level_data() {
            writeln!(f, "\nPOTENTIAL SOLUTION:")?;
            writeln!(f, "   Play-by-play contains player data")?;
            writeln!(f, "   Individual workload can be aggregated from play-by-play actions:")?;
            writeln!(f, "      - Minutes played (time stamps)")?;
            writeln!(f, "      - Shot attempts (workload)")?;
            writeln!(f, "      - Defensive actions (physical load)")?;
            writeln!(f, "      - Substitution patterns (fatigue indicators)")?;
        }

        writeln!(f, "\nOTHER TABLES WITH PLAYER STATS:")?;
        for c in &self.candidates {
            writeln!(f, "   {}: Has both player and game columns", c.name)?;
            writeln!(f, "      Player cols: {:?}...", c.player_columns)?;
            writeln!(f, "      Game cols: {:?}...", c.game_columns)?;
            writeln!(f, "      Records: {}", c.row_count)?;
        }
        for e in &self.errors {
            writeln!(f, "   {}: Could not analyze - {}", e.table, e.error)?;
        }

        writeln!(f, "\nRECOMMENDATION:")?;
        if self.has_player_level_data() {
            writeln!(f, "   play_by_play has player identifiers; this dataset is usable")?;
        } else {
            writeln!(f, "   No player identifiers in play_by_play; find a supplementary player stats dataset")?;
        }
        Ok(())
    }
}
