//! Working output file for transmission records.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Append-only text file the schedule runner records into.
///
/// The file is reopened for every record, so crash handling can move it out
/// from under the writer between steps without fighting an open handle.
pub struct OutputFile {
    name: String,
    path: PathBuf,
}

impl OutputFile {
    /// Create `name` inside `dir`, or reopen it for appending.
    pub fn create(dir: &Path, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let path = dir.join(&name);
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(OutputFile { name, path })
    }

    /// get file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped record.
    pub fn append_record(&self, text: &str) -> Result<()> {
        let time = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string();
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut write = BufWriter::new(file);
        writeln!(write, "[{time}] {text}")?;
        write.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = OutputFile::create(dir.path(), "run_output.txt").expect("create");
        assert_eq!(output.name(), "run_output.txt");
        assert_eq!(output.path(), dir.path().join("run_output.txt"));

        output.append_record("abc123").expect("first record");
        output.append_record("def456").expect("second record");

        let content = std::fs::read_to_string(output.path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("abc123"));
        assert!(lines[1].ends_with("def456"));
    }

    #[test]
    fn test_create_preserves_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("run_output.txt"), "[old] record\n").expect("seed");

        let output = OutputFile::create(dir.path(), "run_output.txt").expect("create");
        output.append_record("fresh").expect("append");

        let content = std::fs::read_to_string(output.path()).expect("read");
        assert!(content.starts_with("[old] record\n"));
        assert!(content.contains("fresh"));
    }

    #[test]
    fn test_append_after_relocation_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = OutputFile::create(dir.path(), "run_output.txt").expect("create");
        std::fs::remove_file(output.path()).expect("remove");
        assert!(output.append_record("orphan").is_err());
    }
}
