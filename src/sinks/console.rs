//! Console sink implementation

use crate::core::{LogLevel, Result, Sink};
use std::io::Write;

/// Writes lines to stdout, routing fault and error to stderr
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn append(&mut self, level: LogLevel, line: &str) -> Result<()> {
        match level {
            LogLevel::Fault | LogLevel::Error => writeln!(std::io::stderr().lock(), "{}", line)?,
            _ => writeln!(std::io::stdout().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
