//! # Crash Artifact Manager
//!
//! This module translates an unexpected failure into two durable,
//! discoverable files: a crash log in a dedicated log directory and the
//! relocated in-flight output file in a dedicated crash-data directory.
//! Both operations are independent and callable in either order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::crash::log_sink::CrashLogSink;
use crate::error::{RemoteSerialError, Result};

/// Crash log directory name, created under the manager's base directory.
pub const CRASH_LOG_DIR: &str = "Crash Logs";

/// Crash data directory name, created under the manager's base directory.
pub const CRASH_DATA_DIR: &str = "Crash Data";

const CRASH_LOG_MARKER: &str = "_CRASHLOG";
const CRASH_DATA_MARKER: &str = "_CRASHDUMP";

/// Fixed record written when a caller asks for a synthetic crash log.
pub const SYNTHETIC_CRASH_MESSAGE: &str = "\n\
\n\
[Synthetic crash record]\n\
\n\
| No live failure was captured for this log.\n\
|\n\
|\n\
| The crash capture path itself is being exercised.\n\
|\n\
|";

/// What to write into a crash log.
pub enum CrashReport<'a> {
    /// Rendered text of the in-flight failure. An empty rendering is still
    /// written; the operation never silently no-ops.
    Captured(&'a str),
    /// The fixed placeholder message, for exercising the capture path
    /// without a live failure.
    Synthetic,
}

/// Manager for crash log and crash data directory creation, file naming,
/// and output file relocation.
pub struct CrashOutputManager {
    base_dir: PathBuf,
    sink: Arc<CrashLogSink>,
}

impl CrashOutputManager {
    /// Manager rooted one level above the current working directory, the
    /// layout operators are told to look in.
    pub fn new(sink: Arc<CrashLogSink>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let base_dir = match cwd.parent() {
            Some(parent) => parent.to_path_buf(),
            None => cwd,
        };
        Ok(Self::with_base_dir(base_dir, sink))
    }

    /// Manager rooted at an explicit base directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>, sink: Arc<CrashLogSink>) -> Self {
        CrashOutputManager {
            base_dir: base_dir.into(),
            sink,
        }
    }

    /// Capture a crash log for the failure described by `report`.
    ///
    /// Ensures the crash log directory exists, derives the log file name
    /// from `output_file_name` (extension stripped at the first `.`, crash
    /// marker appended), points the sink at that exact path discarding any
    /// previously configured target, and writes one error-level record.
    ///
    /// Returns the path of the written log file.
    pub fn record_crash_log(
        &self,
        output_file_name: &str,
        report: CrashReport<'_>,
    ) -> Result<PathBuf> {
        let dir = self.ensure_dir(CRASH_LOG_DIR)?;
        let path = dir.join(crash_file_name(output_file_name, CRASH_LOG_MARKER, "log"));

        self.sink.retarget(&path)?;
        let rendered = match report {
            CrashReport::Captured(text) => text,
            CrashReport::Synthetic => SYNTHETIC_CRASH_MESSAGE,
        };
        self.sink.error(rendered)?;

        info!("crash log captured at {}", path.display());
        Ok(path)
    }

    /// Relocate the in-flight output file into the crash-data directory.
    ///
    /// Ensures the crash data directory exists, derives the dump file name
    /// from `output_file_name`, and moves the file at `output_file_path` to
    /// it. The move is not retried; after success the file no longer exists
    /// at its original path.
    ///
    /// Returns the path of the relocated data file.
    pub fn record_crash_data(
        &self,
        output_file_name: &str,
        output_file_path: &Path,
    ) -> Result<PathBuf> {
        let dir = self.ensure_dir(CRASH_DATA_DIR)?;
        let path = dir.join(crash_file_name(output_file_name, CRASH_DATA_MARKER, "txt"));

        relocate(output_file_path, &path)?;

        info!(
            "crash data relocated from {} to {}",
            output_file_path.display(),
            path.display()
        );
        Ok(path)
    }

    fn ensure_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.base_dir.join(name);
        if !dir.is_dir() {
            fs::create_dir_all(&dir)
                .map_err(|e| RemoteSerialError::directory_create(&dir, e.to_string()))?;
        }
        Ok(dir)
    }
}

/// Derive a crash artifact file name: base name of `output_file_name`
/// (everything from the first `.` onward removed), plus marker and
/// extension. A name without a `.` is its own base.
fn crash_file_name(output_file_name: &str, marker: &str, extension: &str) -> String {
    let base = output_file_name
        .split('.')
        .next()
        .unwrap_or(output_file_name);
    format!("{base}{marker}.{extension}")
}

/// Move `from` to `to`. Rename first; copy-and-remove only when a plain
/// rename cannot work, e.g. when the crash directory sits on another
/// filesystem.
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    if !from.is_file() {
        return Err(RemoteSerialError::relocate(
            from,
            to,
            "source file does not exist",
        ));
    }
    fs::copy(from, to)
        .and_then(|_| fs::remove_file(from))
        .map_err(|e| RemoteSerialError::relocate(from, to, e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn manager(base: &Path) -> CrashOutputManager {
        CrashOutputManager::with_base_dir(base, Arc::new(CrashLogSink::new()))
    }

    #[test]
    fn test_crash_log_path_and_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let path = manager
            .record_crash_log("run_007.txt", CrashReport::Captured("device timed out"))
            .expect("record crash log");

        assert_eq!(path, dir.path().join(CRASH_LOG_DIR).join("run_007_CRASHLOG.log"));
        let content = fs::read_to_string(&path).expect("read log");
        assert!(content.contains("ERROR"));
        assert!(content.contains("device timed out"));
    }

    #[test]
    fn test_successive_logs_are_independent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let first = manager
            .record_crash_log("alpha.txt", CrashReport::Captured("first failure"))
            .expect("first log");
        let second = manager
            .record_crash_log("beta.txt", CrashReport::Captured("second failure"))
            .expect("second log");

        assert_ne!(first, second);
        let first_content = fs::read_to_string(&first).expect("read first");
        let second_content = fs::read_to_string(&second).expect("read second");
        assert!(first_content.contains("first failure"));
        assert!(!first_content.contains("second failure"));
        assert!(second_content.contains("second failure"));
        assert!(!second_content.contains("first failure"));
    }

    #[test]
    fn test_synthetic_log_contains_placeholder_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let path = manager
            .record_crash_log("data.bin", CrashReport::Synthetic)
            .expect("synthetic log");

        assert!(path.ends_with("data_CRASHLOG.log"));
        let content = fs::read_to_string(&path).expect("read log");
        assert!(content.contains(SYNTHETIC_CRASH_MESSAGE));
    }

    #[test]
    fn test_crash_data_moves_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let work = dir.path().join("work");
        fs::create_dir(&work).expect("mkdir work");
        let source = work.join("sample.txt");
        fs::write(&source, b"precious bytes").expect("write source");

        let manager = manager(dir.path());
        let path = manager
            .record_crash_data("sample.txt", &source)
            .expect("record crash data");

        assert_eq!(
            path,
            dir.path().join(CRASH_DATA_DIR).join("sample_CRASHDUMP.txt")
        );
        assert!(!source.exists());
        assert_eq!(fs::read(&path).expect("read dump"), b"precious bytes");
    }

    #[test]
    fn test_crash_data_missing_source_is_relocate_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let missing = dir.path().join("work").join("ghost.txt");
        let result = manager.record_crash_data("ghost.txt", &missing);
        assert!(matches!(result, Err(RemoteSerialError::Relocate { .. })));

        // The directory-ensure step already ran; nothing else was created.
        let data_dir = dir.path().join(CRASH_DATA_DIR);
        assert!(data_dir.is_dir());
        assert_eq!(fs::read_dir(&data_dir).expect("read dir").count(), 0);
    }

    #[test]
    fn test_directory_ensure_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let unrelated = dir.path().join(CRASH_LOG_DIR).join("keepsake.log");
        manager
            .record_crash_log("one.txt", CrashReport::Synthetic)
            .expect("first log");
        fs::write(&unrelated, b"keep me").expect("write unrelated");

        manager
            .record_crash_log("two.txt", CrashReport::Synthetic)
            .expect("second log");
        assert_eq!(fs::read(&unrelated).expect("reread unrelated"), b"keep me");
    }

    #[test]
    fn test_name_without_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let work = dir.path().join("report");
        fs::write(&work, b"x").expect("write source");
        let manager = manager(dir.path());

        let log = manager
            .record_crash_log("report", CrashReport::Synthetic)
            .expect("log");
        assert!(log.ends_with("report_CRASHLOG.log"));

        let data = manager
            .record_crash_data("report", &work)
            .expect("data");
        assert!(data.ends_with("report_CRASHDUMP.txt"));
    }

    #[test]
    fn test_name_splits_at_first_period() {
        assert_eq!(
            crash_file_name("archive.tar.gz", CRASH_DATA_MARKER, "txt"),
            "archive_CRASHDUMP.txt"
        );
        assert_eq!(
            crash_file_name("report", CRASH_LOG_MARKER, "log"),
            "report_CRASHLOG.log"
        );
    }

    #[test]
    fn test_empty_captured_text_still_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = manager(dir.path());

        let path = manager
            .record_crash_log("silent.txt", CrashReport::Captured(""))
            .expect("empty log");
        let content = fs::read_to_string(&path).expect("read log");
        assert!(content.contains("ERROR"));
    }
}
