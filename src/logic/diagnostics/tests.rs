//! Diagnostics tests over small on-disk SQLite snapshots

#[cfg(test)]
mod sqlite_tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use rusqlite::Connection;
    use tempfile::TempDir;

    use crate::logic::diagnostics::{
        quote_ident, DatasetValidator, DiagnosticError, PlayerDataExplorer, Verdict, VolumeAssessment,
    };

    fn build(dir: &TempDir, sql: &str) -> PathBuf {
        let path = dir.path().join("nba.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        path
    }

    /// Zip `entries` (name, bytes) into `<dir>/<name>`
    fn archive(dir: &TempDir, name: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
        let path = dir.path().join(name);
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        for (entry, bytes) in entries {
            writer.start_file(*entry, zip::write::FileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    const FULL: &str = "
        CREATE TABLE game (game_id TEXT, season_id TEXT, game_date TEXT, team_id_home INTEGER);
        CREATE TABLE other_stats (game_id TEXT, team_id_home INTEGER, pts_paint_home INTEGER, minutes_home INTEGER);
        CREATE TABLE player (id INTEGER, full_name TEXT, is_active INTEGER);
        CREATE TABLE team (id INTEGER, full_name TEXT);
        CREATE TABLE play_by_play (game_id TEXT, eventnum INTEGER, player1_id INTEGER, player1_name TEXT);
        CREATE TABLE common_player_info (person_id INTEGER, display_first_last TEXT, height TEXT);
        CREATE TABLE draft_history (person_id INTEGER, season TEXT);

        WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 5000)
        INSERT INTO game SELECT printf('%010d', x), '22019', date('2000-01-01', '+' || x || ' days'), 1610612737 FROM c;

        INSERT INTO other_stats VALUES ('0000000001', 1610612737, 40, 240);
        INSERT INTO player VALUES (2544, 'LeBron James', 1), (201939, 'Stephen Curry', 1);
        INSERT INTO play_by_play VALUES ('0000000001', 1, 2544, 'LeBron James'), ('0000000001', 2, 201939, 'Stephen Curry');
        INSERT INTO common_player_info VALUES (2544, 'LeBron James', '6-9');
    ";

    #[test]
    fn test_full_dataset_is_excellent() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(&dir, FULL);
        let report = DatasetValidator::open(&path).unwrap().validate().unwrap();

        assert_eq!(report.verdict, Verdict::Excellent);
        assert_eq!(report.tables.len(), 7);
        assert!(report.has_table("draft_history"));

        let game = report.key_tables[0].summary.as_ref().unwrap();
        assert_eq!(game.row_count, 5000);
        assert_eq!(game.columns, vec!["game_id", "season_id", "game_date", "team_id_home"]);

        assert_eq!(report.readiness.game_sample_rows, Some(5));
        assert_eq!(report.readiness.date_columns, vec!["game_date"]);
        assert_eq!(report.readiness.workload_columns, vec!["minutes_home"]);
        assert_eq!(report.readiness.play_by_play_sample_rows, Some(2));

        let range = report.date_range.as_ref().unwrap();
        assert_eq!(range.column, "game_date");
        assert_eq!(range.min.as_deref(), Some("2000-01-02"));

        let volume: Vec<(&str, VolumeAssessment)> =
            report.volume.iter().map(|v| (v.table.as_str(), v.assessment)).collect();
        assert_eq!(
            volume,
            vec![
                ("game", VolumeAssessment::Sufficient),
                ("other_stats", VolumeAssessment::CheckIfSufficient),
                ("player", VolumeAssessment::CheckIfSufficient),
            ]
        );

        let text = report.to_string();
        assert!(text.contains("EXCELLENT"));
        assert!(text.contains("GAME TABLE:"));
        assert!(text.contains("5000 records (sufficient for ML)"));
    }

    #[test]
    fn test_missing_player_table_is_good() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(
            &dir,
            "CREATE TABLE game (game_id TEXT, date TEXT);
             CREATE TABLE other_stats (game_id TEXT);
             INSERT INTO game VALUES ('1', '2019-10-22'), ('2', '2020-03-11');",
        );
        let report = DatasetValidator::open(&path).unwrap().validate().unwrap();

        assert_eq!(report.verdict, Verdict::Good);
        assert!(report.key_tables[2].summary.is_none());
        assert!(report.to_string().contains("PLAYER TABLE: Not found"));

        // falls through to the second candidate column
        let range = report.date_range.unwrap();
        assert_eq!(range.column, "date");
        assert_eq!(range.max.as_deref(), Some("2020-03-11"));
    }

    #[test]
    fn test_unrelated_database_is_concerning() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(&dir, "CREATE TABLE team (id INTEGER);");
        let report = DatasetValidator::open(&path).unwrap().validate().unwrap();

        assert_eq!(report.verdict, Verdict::Concerning);
        assert!(report.date_range.is_none());
        assert!(report.volume.is_empty());
    }

    #[test]
    fn test_validator_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(&dir, FULL);
        let validator = DatasetValidator::open(&path).unwrap();

        assert!(validator.connection().execute("CREATE TABLE scratch (x INTEGER)", []).is_err());
        assert!(validator.connection().execute("DELETE FROM game", []).is_err());
    }

    #[test]
    fn test_open_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DatasetValidator::open(&dir.path().join("missing.sqlite")),
            Err(DiagnosticError::NotFound(_))
        ));

        let empty = archive(&dir, "empty.zip", &[("README.txt", b"no data".to_vec())]);
        assert!(matches!(
            DatasetValidator::open(&empty),
            Err(DiagnosticError::Unsupported(_))
        ));

        let junk = dir.path().join("junk.zip");
        std::fs::write(&junk, b"PK").unwrap();
        assert!(matches!(
            DatasetValidator::open(&junk),
            Err(DiagnosticError::Archive(_))
        ));
    }

    #[test]
    fn test_zipped_snapshot_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let db = build(&dir, FULL);
        let bytes = std::fs::read(&db).unwrap();
        let zipped = archive(
            &dir,
            "nba.zip",
            &[("README.md", b"basketball".to_vec()), ("data/nba.sqlite", bytes)],
        );

        let validator = DatasetValidator::open(&zipped).unwrap();
        let report = validator.validate().unwrap();
        assert_eq!(report.verdict, Verdict::Excellent);
        assert_eq!(report.key_tables[0].summary.as_ref().unwrap().row_count, 5000);
        assert!(validator.connection().execute("DELETE FROM game", []).is_err());

        let explored = PlayerDataExplorer::open(&zipped).unwrap().explore().unwrap();
        assert!(explored.has_player_level_data());
    }

    #[test]
    fn test_explorer_finds_player_game_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(&dir, FULL);
        let report = PlayerDataExplorer::open(&path).unwrap().explore().unwrap();

        assert!(report.has_player_level_data());
        assert_eq!(report.play_by_play_player_columns, vec!["player1_id", "player1_name"]);
        assert_eq!(report.common_player_info_shape, Some((1, 3)));

        let names: Vec<&str> = report.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["play_by_play"]);
        assert_eq!(report.candidates[0].row_count, 2);
        assert!(report.errors.is_empty());
        assert!(report.to_string().contains("POTENTIAL SOLUTION"));
    }

    #[test]
    fn test_explorer_records_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = build(&dir, "CREATE TABLE game (game_id TEXT);");
        let report = PlayerDataExplorer::open(Path::new(&path)).unwrap().explore().unwrap();

        assert!(!report.has_player_level_data());
        assert!(report.play_by_play_columns.is_none());
        let failed: Vec<&str> = report.errors.iter().map(|e| e.table.as_str()).collect();
        assert_eq!(failed, vec!["play_by_play", "common_player_info"]);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("game"), "\"game\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
