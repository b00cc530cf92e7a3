//! Fan-out of one token stream to the transports of a logger
//!
//! The dispatcher owns everything an emission needs after the enablement
//! check: the renderer, the sinks bound to transport names, the metrics and
//! the diagnostic channel. It is shared by every logger of one manager.

use super::{
    error::{LoggerError, Result},
    identity::LoggerIdentity,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    renderer::Renderer,
    sink::Sink,
    token::Token,
    transport::{Transport, TransportKind},
};
use crate::sinks::{ConsoleSink, FileSink};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Receives warnings about malformed calls and failing sinks
pub type DiagnosticCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Default diagnostic channel: one line on stderr per warning
pub fn stderr_diagnostics() -> DiagnosticCallback {
    Arc::new(|message: &str| eprintln!("[LOGGER WARNING] {}", message))
}

/// A sink shared between the table and the emissions writing to it
type SharedSink = Arc<Mutex<Box<dyn Sink>>>;

fn share(sink: Box<dyn Sink>) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Identifies a lazily opened sink by the transport definition it serves
///
/// An emission still holding a transport from before a reconfiguration
/// opens a sink under the old definition, so it cannot capture the name
/// for the new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AutoKey {
    name: String,
    kind: TransportKind,
    path: Option<PathBuf>,
}

impl AutoKey {
    fn of(transport: &Transport) -> Self {
        Self {
            name: transport.name().to_string(),
            kind: transport.kind(),
            path: transport.path().map(Path::to_path_buf),
        }
    }
}

#[derive(Default)]
struct SinkTable {
    /// Sinks registered by the application, by transport name
    registered: HashMap<String, Vec<SharedSink>>,
    /// Console and file sinks created on first use
    automatic: HashMap<AutoKey, SharedSink>,
}

impl SinkTable {
    /// Sinks bound to `transport`, opening its default sink if needed
    fn resolve(&mut self, transport: &Transport) -> Result<Vec<SharedSink>> {
        if let Some(sinks) = self
            .registered
            .get(transport.name())
            .filter(|s| !s.is_empty())
        {
            return Ok(sinks.clone());
        }

        let sink = match self.automatic.entry(AutoKey::of(transport)) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(share(open_default(transport)?))),
        };
        Ok(vec![sink])
    }

    fn all(&self) -> Vec<SharedSink> {
        self.registered
            .values()
            .flatten()
            .chain(self.automatic.values())
            .cloned()
            .collect()
    }
}

/// Flush with panic isolation, describing any failure
fn flush_isolated(sink: &mut dyn Sink) -> Option<String> {
    let name = sink.name().to_string();
    match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Sink '{}' flush failed: {}", name, e)),
        Err(panic) => Some(format!(
            "Sink '{}' panicked during flush: {}",
            name,
            panic_message(panic.as_ref())
        )),
    }
}

fn open_default(transport: &Transport) -> Result<Box<dyn Sink>> {
    match transport.kind() {
        TransportKind::Console => Ok(Box::new(ConsoleSink::new())),
        TransportKind::File => {
            let path = transport.path().ok_or_else(|| {
                LoggerError::file_sink(transport.name(), "file transport has no path")
            })?;
            Ok(Box::new(FileSink::new(path)?))
        }
        TransportKind::Stream | TransportKind::Group => {
            Err(LoggerError::stream_not_registered(transport.name()))
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Append and flush with panic isolation, so one sink cannot disrupt the others
fn write_isolated(sink: &mut dyn Sink, level: LogLevel, line: &str) -> std::result::Result<(), String> {
    let name = sink.name().to_string();
    match catch_unwind(AssertUnwindSafe(|| {
        sink.append(level, line)?;
        sink.flush()
    })) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("sink '{}' failed: {}", name, e)),
        Err(panic) => Err(format!(
            "sink '{}' panicked: {}. Other sinks continue to function.",
            name,
            panic_message(panic.as_ref())
        )),
    }
}

pub(crate) struct Dispatcher {
    renderer: Renderer,
    metrics: LoggerMetrics,
    on_diagnostic: DiagnosticCallback,
    sinks: Mutex<SinkTable>,
}

impl Dispatcher {
    pub(crate) fn new(renderer: Renderer, on_diagnostic: DiagnosticCallback) -> Self {
        Self {
            renderer,
            metrics: LoggerMetrics::new(),
            on_diagnostic,
            sinks: Mutex::new(SinkTable::default()),
        }
    }

    pub(crate) fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub(crate) fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub(crate) fn register(&self, transport: impl Into<String>, sink: Box<dyn Sink>) {
        self.sinks
            .lock()
            .registered
            .entry(transport.into())
            .or_default()
            .push(share(sink));
    }

    /// Drop lazily created sinks so the next emission reopens them
    pub(crate) fn reset_automatic(&self) {
        let retired: Vec<SharedSink> = self.sinks.lock().automatic.drain().map(|(_, s)| s).collect();
        self.flush_sinks(retired);
    }

    pub(crate) fn flush(&self) {
        let sinks = self.sinks.lock().all();
        self.flush_sinks(sinks);
    }

    fn flush_sinks(&self, sinks: Vec<SharedSink>) {
        for sink in sinks {
            let failure = flush_isolated(sink.lock().as_mut());
            if let Some(failure) = failure {
                self.report(&failure);
            }
        }
    }

    /// Render `tokens` for each transport and hand the lines to their sinks
    pub(crate) fn emit(
        &self,
        identity: &LoggerIdentity,
        level: LogLevel,
        transports: &[Transport],
        tokens: &[Token],
    ) {
        let mut diagnostics: Vec<String> = Vec::new();
        let mut note = |message: String| {
            if !diagnostics.contains(&message) {
                diagnostics.push(message);
            }
        };

        for transport in transports {
            let rendered = match self.renderer.render(identity, level, transport, tokens) {
                Ok(rendered) => rendered,
                Err(e) => {
                    note(format!("Transport '{}' failed to render: {}", transport.name(), e));
                    continue;
                }
            };
            for warning in rendered.warnings {
                note(warning);
            }

            let Some(line) = rendered.line else {
                self.metrics.record_suppressed();
                continue;
            };

            // The table lock only covers lookup; sinks are written outside it
            // so a sink may log through the same manager to another transport.
            let sinks = match self.sinks.lock().resolve(transport) {
                Ok(sinks) => sinks,
                Err(e) => {
                    self.metrics.record_sink_failure();
                    note(e.to_string());
                    continue;
                }
            };
            for sink in sinks {
                let result = write_isolated(sink.lock().as_mut(), level, &line);
                match result {
                    Ok(()) => {
                        self.metrics.record_emitted();
                    }
                    Err(e) => {
                        self.metrics.record_sink_failure();
                        note(format!("Transport '{}': {}", transport.name(), e));
                    }
                }
            }
        }

        for message in &diagnostics {
            self.report(message);
        }
    }

    fn report(&self, message: &str) {
        self.metrics.record_warning();
        let callback = &self.on_diagnostic;
        if catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
            eprintln!("[LOGGER ERROR] Diagnostic callback panicked: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::tokenize;
    use crate::core::transport::{TransportRegistry, TransportSpec};
    use crate::core::OutputFormat;
    use crate::sinks::MemorySink;

    struct FailingSink;

    impl Sink for FailingSink {
        fn append(&mut self, _level: LogLevel, _line: &str) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn append(&mut self, _level: LogLevel, _line: &str) -> Result<()> {
            panic!("boom")
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn collecting() -> (DiagnosticCallback, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: DiagnosticCallback = Arc::new(move |m: &str| sink.lock().push(m.to_string()));
        (callback, seen)
    }

    fn stream(name: &str) -> Transport {
        let mut registry = TransportRegistry::new();
        registry
            .build(
                &TransportSpec::new(name, TransportKind::Stream)
                    .with_format(OutputFormat::Text)
                    .into(),
            )
            .unwrap()
            .clone()
    }

    #[test]
    fn test_failing_sinks_are_isolated() {
        let (callback, seen) = collecting();
        let dispatcher = Dispatcher::new(Renderer::new(), callback);
        let memory = MemorySink::new();
        dispatcher.register("s", Box::new(FailingSink));
        dispatcher.register("s", Box::new(PanickingSink));
        dispatcher.register("s", Box::new(memory.clone()));

        let identity = LoggerIdentity::module_only("m").unwrap();
        dispatcher.emit(&identity, LogLevel::Info, &[stream("s")], &tokenize("hi", &[]));

        assert_eq!(memory.lines(), vec!["[   info]  m - hi".to_string()]);
        assert_eq!(dispatcher.metrics().total_emitted(), 1);
        assert_eq!(dispatcher.metrics().sink_failures(), 2);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_unregistered_stream_reports() {
        let (callback, seen) = collecting();
        let dispatcher = Dispatcher::new(Renderer::new(), callback);
        let identity = LoggerIdentity::module_only("m").unwrap();
        dispatcher.emit(&identity, LogLevel::Info, &[stream("s")], &tokenize("hi", &[]));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("No stream registered for transport 's'"));
        assert_eq!(dispatcher.metrics().total_emitted(), 0);
    }

    #[test]
    fn test_warnings_deduplicated_per_emission() {
        let (callback, seen) = collecting();
        let dispatcher = Dispatcher::new(Renderer::new(), callback);
        dispatcher.register("a", Box::new(MemorySink::new()));
        dispatcher.register("b", Box::new(MemorySink::new()));

        let identity = LoggerIdentity::module_only("m").unwrap();
        let tokens = tokenize("open %<region", &[]);
        dispatcher.emit(&identity, LogLevel::Info, &[stream("a"), stream("b")], &tokens);

        assert_eq!(*seen.lock(), vec!["Unclosed redaction".to_string()]);
    }

    fn file(name: &str, path: &Path) -> Transport {
        let mut registry = TransportRegistry::new();
        registry
            .build(
                &TransportSpec::new(name, TransportKind::File)
                    .with_format(OutputFormat::Text)
                    .with_path(path.to_string_lossy())
                    .into(),
            )
            .unwrap()
            .clone()
    }

    #[test]
    fn test_stale_transport_after_reset_does_not_capture_new_path() {
        let dir = tempfile::tempdir().unwrap();
        let old_path = dir.path().join("old.log");
        let new_path = dir.path().join("new.log");
        let (callback, _seen) = collecting();
        let dispatcher = Dispatcher::new(Renderer::new(), callback);
        let identity = LoggerIdentity::module_only("m").unwrap();

        dispatcher.reset_automatic();
        // An emission that loaded its transports before the swap lands late
        dispatcher.emit(&identity, LogLevel::Info, &[file("f", &old_path)], &tokenize("inflight", &[]));
        dispatcher.emit(&identity, LogLevel::Info, &[file("f", &new_path)], &tokenize("after", &[]));
        dispatcher.flush();

        let old = std::fs::read_to_string(&old_path).unwrap();
        let new = std::fs::read_to_string(&new_path).unwrap();
        assert_eq!(old, "[   info]  m - inflight\n");
        assert_eq!(new, "[   info]  m - after\n");
    }

    struct FlushFailingSink;

    impl Sink for FlushFailingSink {
        fn append(&mut self, _level: LogLevel, _line: &str) -> Result<()> {
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("device gone"))
        }
        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[test]
    fn test_reset_reports_flush_failures() {
        let (callback, seen) = collecting();
        let dispatcher = Dispatcher::new(Renderer::new(), callback);
        let key = AutoKey {
            name: "f".to_string(),
            kind: TransportKind::File,
            path: Some(PathBuf::from("unused.log")),
        };
        dispatcher
            .sinks
            .lock()
            .automatic
            .insert(key, share(Box::new(FlushFailingSink)));

        dispatcher.reset_automatic();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Sink 'flaky' flush failed"));
        assert!(seen[0].contains("device gone"));
        assert!(dispatcher.sinks.lock().automatic.is_empty());
    }

    /// Forwards every line it receives to another transport of the same dispatcher
    struct RelaySink {
        dispatcher: Arc<Dispatcher>,
        target: Transport,
    }

    impl Sink for RelaySink {
        fn append(&mut self, level: LogLevel, line: &str) -> Result<()> {
            let identity = LoggerIdentity::module_only("relay").unwrap();
            self.dispatcher
                .emit(&identity, level, &[self.target.clone()], &tokenize("%s", &[line.into()]));
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "relay"
        }
    }

    #[test]
    fn test_sink_may_log_to_another_transport() {
        let (callback, _seen) = collecting();
        let dispatcher = Arc::new(Dispatcher::new(Renderer::new(), callback));
        let memory = MemorySink::new();
        dispatcher.register("b", Box::new(memory.clone()));
        dispatcher.register(
            "a",
            Box::new(RelaySink {
                dispatcher: Arc::clone(&dispatcher),
                target: stream("b"),
            }),
        );

        let identity = LoggerIdentity::module_only("m").unwrap();
        dispatcher.emit(&identity, LogLevel::Info, &[stream("a")], &tokenize("hi", &[]));

        assert_eq!(
            memory.lines(),
            vec!["[   info]  relay - [   info]  m - hi".to_string()]
        );
    }
}
