//! File sink implementation

use crate::core::{LogLevel, LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends lines to a file through a buffered writer
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` in append mode, creating it if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_sink(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn append(&mut self, _level: LogLevel, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");

        let mut sink = FileSink::new(&path).unwrap();
        sink.append(LogLevel::Info, "first").unwrap();
        sink.append(LogLevel::Error, "second").unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_reopen_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.append(LogLevel::Info, "one").unwrap();
        }
        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.append(LogLevel::Info, "two").unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_open_failure_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");
        let err = FileSink::new(&path).err().unwrap();
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }
}
