//! In-memory sink for tests and embedding

use crate::core::{LogLevel, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects lines in a shared buffer
///
/// Clones share the same buffer, so one clone can be registered while
/// another is kept to read the lines back.
///
/// # Example
///
/// ```
/// use rust_redacting_logger::core::{LogLevel, Sink};
/// use rust_redacting_logger::sinks::MemorySink;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.append(LogLevel::Info, "hello").unwrap();
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Lines along with the level they were emitted at
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for MemorySink {
    fn append(&mut self, level: LogLevel, line: &str) -> Result<()> {
        self.lines.lock().push((level, line.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
