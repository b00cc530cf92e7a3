//! Sink trait for rendered-line destinations

use super::{error::Result, log_level::LogLevel};

/// Destination for rendered lines
///
/// A sink receives one fully rendered line per call, without a trailing
/// newline. The level is passed along so a sink can route by severity.
///
/// Calls to one sink are serialized. A sink may log through its own manager
/// as long as those lines never route back to a transport it serves; that
/// re-entry waits on the sink's own lock forever.
pub trait Sink: Send {
    fn append(&mut self, level: LogLevel, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
