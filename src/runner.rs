//! Batch orchestration: walk series directories, decode each one, persist,
//! optionally export JSON. A fatal error in one series is logged and the
//! batch moves on; only setup failures stop the run.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::db;
use crate::models::SeriesReport;
use crate::report::{self, SeriesError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Process every given series directory. Returns how many series decoded
/// and persisted successfully versus failed.
pub fn run_batch(
    conn: &mut Connection,
    series_dirs: &[PathBuf],
    json_dir: Option<&Path>,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for dir in series_dirs {
        match process_series(conn, dir, json_dir) {
            Ok(report) => {
                summary.processed += 1;
                tracing::info!(
                    dir = %dir.display(),
                    series_uid = report.identifiers.series_uid.as_deref().unwrap_or("<none>"),
                    categories = report.categories.len(),
                    "series processed"
                );
            }
            Err(err) => {
                summary.failed += 1;
                tracing::error!(dir = %dir.display(), error = %err, "series failed");
            }
        }
    }
    summary
}

/// Decode and persist one series directory.
pub fn process_series(
    conn: &mut Connection,
    dir: &Path,
    json_dir: Option<&Path>,
) -> Result<SeriesReport, SeriesError> {
    let instances = report::load_series(dir)?;
    let report = report::decode_series(&instances)?;
    db::insert_series_report(conn, &report)?;

    if let Some(json_dir) = json_dir {
        write_json_export(json_dir, &report)?;
    }
    Ok(report)
}

/// Every subdirectory of the configured root is one series, in sorted order.
pub fn scan_series_dirs(root: &Path) -> Result<Vec<PathBuf>, SeriesError> {
    if !root.is_dir() {
        return Err(SeriesError::DirectoryMissing(root.to_path_buf()));
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn write_json_export(json_dir: &Path, report: &SeriesReport) -> Result<(), SeriesError> {
    let name = report
        .identifiers
        .series_uid
        .as_deref()
        .unwrap_or("unknown-series");
    fs::create_dir_all(json_dir)?;
    let path = json_dir.join(format!("{name}.json"));
    let payload = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    fs::write(&path, payload)?;
    tracing::debug!(path = %path.display(), "wrote JSON export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn scan_finds_only_subdirectories_sorted() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("series_b")).unwrap();
        fs::create_dir(root.path().join("series_a")).unwrap();
        fs::write(root.path().join("stray.txt"), b"x").unwrap();

        let dirs = scan_series_dirs(root.path()).unwrap();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[0].ends_with("series_a"));
        assert!(dirs[1].ends_with("series_b"));
    }

    #[test]
    fn scan_of_missing_root_is_fatal() {
        let err = scan_series_dirs(Path::new("/nonexistent/root")).unwrap_err();
        assert!(matches!(err, SeriesError::DirectoryMissing(_)));
    }

    #[test]
    fn batch_continues_past_failing_series() {
        let root = tempfile::tempdir().unwrap();
        let empty = root.path().join("empty_series");
        fs::create_dir(&empty).unwrap();

        let mut conn = open_memory_database().unwrap();
        let summary = run_batch(&mut conn, &[empty], None);
        assert_eq!(summary, BatchSummary { processed: 0, failed: 1 });
    }
}
