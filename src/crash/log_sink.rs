//! Process-wide crash log target.
//!
//! There is a single "current log target" per sink; every retarget replaces
//! it, so the last caller owns where error records land. Collaborators must
//! not expect records written after a retarget to reach an earlier file.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// File-backed sink for crash error records.
pub struct CrashLogSink {
    target: Mutex<Option<LogTarget>>,
}

struct LogTarget {
    path: PathBuf,
    file: File,
}

impl CrashLogSink {
    /// sink with no target configured
    pub fn new() -> Self {
        CrashLogSink {
            target: Mutex::new(None),
        }
    }

    /// Point the sink at `path`.
    ///
    /// The file is created fresh (truncated if present) and the previously
    /// configured target is discarded, closing its handle. Each crash gets
    /// its own file with the intended name instead of appending to a handle
    /// opened for an earlier file name.
    pub fn retarget(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        *target = Some(LogTarget {
            path: path.to_path_buf(),
            file,
        });
        Ok(())
    }

    /// Write one error-level record to the current target.
    ///
    /// An empty message still produces a record; the sink never silently
    /// no-ops once a target is configured.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        let target = target.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no crash log target configured")
        })?;
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        writeln!(target.file, "[{time}] ERROR {message}")?;
        target.file.flush()
    }

    /// Path of the currently configured target, if any.
    pub fn current_target(&self) -> Option<PathBuf> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|target| target.path.clone())
    }
}

impl Default for CrashLogSink {
    fn default() -> Self {
        Self::new()
    }
}
