//! Sink over an arbitrary writer

use crate::core::{LogLevel, Result, Sink};
use std::io::Write;

/// Writes newline-terminated lines to any `Write` handle
pub struct StreamSink {
    name: String,
    writer: Box<dyn Write + Send>,
}

impl StreamSink {
    pub fn new(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            writer: Box::new(writer),
        }
    }
}

impl Sink for StreamSink {
    fn append(&mut self, _level: LogLevel, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_lines() {
        let buf = SharedBuf::default();
        let mut sink = StreamSink::new("audit", buf.clone());
        sink.append(LogLevel::Warn, "a").unwrap();
        sink.append(LogLevel::Warn, "b").unwrap();
        sink.flush().unwrap();
        assert_eq!(String::from_utf8(buf.0.lock().clone()).unwrap(), "a\nb\n");
        assert_eq!(sink.name(), "audit");
    }
}
