//! # Error Module
//!
//! This module provides custom error types for the `remote_serial` crate.
//! It uses the `thiserror` crate for ergonomic error handling.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for `remote_serial` operations.
pub type Result<T> = std::result::Result<T, RemoteSerialError>;

/// Main error type for the `remote_serial` crate.
#[derive(Debug, Error)]
pub enum RemoteSerialError {
    /// Failed to open the serial device while acquiring the channel.
    /// The channel lock is always released before this is returned.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// Failed to read from the serial device.
    #[error("Failed to read from serial port: {0}")]
    PortRead(String),

    /// Failed to write to the serial device.
    #[error("Failed to write to serial port: {0}")]
    PortWrite(String),

    /// A crash artifact directory could not be created for a reason other
    /// than already existing.
    #[error("Failed to create crash directory '{}': {}", .path.display(), .reason)]
    DirectoryCreate { path: PathBuf, reason: String },

    /// The in-flight output file could not be moved into the crash-data
    /// directory. Never retried.
    #[error("Failed to relocate '{}' to '{}': {}", .from.display(), .to.display(), .reason)]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// A transmission schedule was rejected during curation.
    #[error("Invalid schedule: {0}")]
    Schedule(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIo(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RemoteSerialError {
    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new port read error.
    #[must_use]
    pub fn port_read(msg: impl Into<String>) -> Self {
        Self::PortRead(msg.into())
    }

    /// Creates a new port write error.
    #[must_use]
    pub fn port_write(msg: impl Into<String>) -> Self {
        Self::PortWrite(msg.into())
    }

    /// Creates a new directory creation error.
    #[must_use]
    pub fn directory_create(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new relocation error.
    #[must_use]
    pub fn relocate(from: &Path, to: &Path, reason: impl Into<String>) -> Self {
        Self::Relocate {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Creates a new schedule error.
    #[must_use]
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Renders a failure and its source chain, outermost first, one cause per
/// indented line. This is the text captured into crash logs.
#[must_use]
pub fn render_error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = format!("{error}\n");
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(&format!("    caused by: {cause}\n"));
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_open_error() {
        let error = RemoteSerialError::port_open("/dev/ttyUSB0", "Permission denied");
        let msg = error.to_string();
        assert!(msg.contains("/dev/ttyUSB0"));
        assert!(msg.contains("Permission denied"));
    }

    #[test]
    fn test_port_write_error() {
        let error = RemoteSerialError::port_write("port is not open");
        assert!(error.to_string().contains("port is not open"));
    }

    #[test]
    fn test_directory_create_error() {
        let error = RemoteSerialError::directory_create("/somewhere/Crash Logs", "read-only");
        let msg = error.to_string();
        assert!(msg.contains("Crash Logs"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_relocate_error() {
        let error = RemoteSerialError::relocate(
            Path::new("/work/sample.txt"),
            Path::new("/crash/sample_CRASHDUMP.txt"),
            "source file does not exist",
        );
        let msg = error.to_string();
        assert!(msg.contains("/work/sample.txt"));
        assert!(msg.contains("sample_CRASHDUMP.txt"));
    }

    #[test]
    fn test_schedule_error() {
        let error = RemoteSerialError::schedule("empty schedule");
        assert!(error.to_string().contains("empty schedule"));
    }

    #[test]
    fn test_render_error_chain_includes_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::TimedOut, "device timed out");
        let error = RemoteSerialError::FileIo(inner);
        let rendered = render_error_chain(&error);
        assert!(rendered.contains("File I/O error"));
        assert!(rendered.contains("caused by: device timed out"));
    }
}
