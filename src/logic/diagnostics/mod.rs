//! Diagnostics Module - SQLite dataset inspection
//!
//! Read-only reports over a sports-statistics snapshot, given either as a
//! `.sqlite` file or as a `.zip` archive holding one. Nothing here touches
//! the inference path; an archive is unpacked into a private temp dir.
//!
//! - `validator` - schema, volume and viability verdict
//! - `explorer` - where player-level game stats can be found

pub mod explorer;
pub mod report;
pub mod validator;

#[cfg(test)]
mod tests;

pub use explorer::PlayerDataExplorer;
pub use report::{DatasetReport, ExplorationReport, Verdict, VolumeAssessment};
pub use validator::DatasetValidator;

use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("database not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported input: {0}")]
    Unsupported(String),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type DiagnosticResult<T> = Result<T, DiagnosticError>;

// ============================================================================
// SQLITE HELPERS
// ============================================================================

/// Read-only connection; an extracted archive lives as long as this does
pub(crate) struct Snapshot {
    conn: Connection,
    _extracted: Option<TempDir>,
}

impl Deref for Snapshot {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("zip"))
}

/// Copy the first `*.sqlite` entry of `archive` into a fresh temp dir
fn extract_sqlite(archive: &Path) -> DiagnosticResult<(TempDir, PathBuf)> {
    let mut entries = zip::ZipArchive::new(File::open(archive)?)?;

    let mut found = None;
    for i in 0..entries.len() {
        let entry = entries.by_index(i)?;
        if entry.is_file() && entry.name().to_ascii_lowercase().ends_with(".sqlite") {
            log::info!("Found {} in {}", entry.name(), archive.display());
            found = Some(i);
            break;
        }
    }
    let index = found.ok_or_else(|| {
        DiagnosticError::Unsupported(format!("{} holds no .sqlite file", archive.display()))
    })?;

    let dir = tempfile::tempdir()?;
    let target = dir.path().join("snapshot.sqlite");
    let mut entry = entries.by_index(index)?;
    let mut out = File::create(&target)?;
    let bytes = std::io::copy(&mut entry, &mut out)?;
    log::debug!("Extracted {} bytes to {}", bytes, target.display());

    Ok((dir, target))
}

/// Open an existing database (or zipped database) without write access
pub(crate) fn open_snapshot(path: &Path) -> DiagnosticResult<Snapshot> {
    if !path.is_file() {
        return Err(DiagnosticError::NotFound(path.to_path_buf()));
    }

    let (extracted, db_path) = if is_zip(path) {
        let (dir, db) = extract_sqlite(path)?;
        (Some(dir), db)
    } else {
        (None, path.to_path_buf())
    };

    let conn = Connection::open_with_flags(
        &db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    log::info!("Opened {} read-only", path.display());
    Ok(Snapshot {
        conn,
        _extracted: extracted,
    })
}

/// Double-quoted SQL identifier
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn list_tables(conn: &Connection) -> DiagnosticResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY rowid")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Declared columns, via `PRAGMA table_info`
pub(crate) fn table_columns(conn: &Connection, table: &str) -> DiagnosticResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Columns of `SELECT *`, without reading rows
pub(crate) fn result_columns(conn: &Connection, table: &str) -> DiagnosticResult<Vec<String>> {
    let stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT 1", quote_ident(table)))?;
    Ok(stmt.column_names().into_iter().map(String::from).collect())
}

pub(crate) fn row_count(conn: &Connection, table: &str) -> DiagnosticResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}

/// Rows returned by `SELECT * ... LIMIT limit`
pub(crate) fn sample_rows(conn: &Connection, table: &str, limit: usize) -> DiagnosticResult<usize> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT {}", quote_ident(table), limit))?;
    let mut rows = stmt.query([])?;
    let mut n = 0;
    while rows.next()?.is_some() {
        n += 1;
    }
    Ok(n)
}

pub(crate) fn render_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        Value::Text(t) => Some(t),
        Value::Blob(b) => Some(format!("<{} byte blob>", b.len())),
    }
}

/// Names containing any of `needles`, case-insensitively
pub(crate) fn columns_containing(columns: &[String], needles: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
        .cloned()
        .collect()
}
