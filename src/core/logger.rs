//! Logger facade bound to one identity

use super::{
    config::LoggingConfig,
    dispatch::Dispatcher,
    error::Result,
    identity::LoggerIdentity,
    log_arg::LogArg,
    log_level::LogLevel,
    tokenizer::tokenize,
    transport::{Transport, TransportRegistry},
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Settings a logger resolved from the active configuration
#[derive(Debug, Clone)]
pub(crate) struct LoggerState {
    level: LogLevel,
    transports: Vec<Transport>,
}

impl LoggerState {
    pub(crate) fn resolve(
        identity: &LoggerIdentity,
        config: &LoggingConfig,
        registry: &TransportRegistry,
    ) -> Result<Self> {
        let level = config.effective_level(identity)?;
        let selection = config.effective_transport_selection(identity);
        let reveal = config.effective_show_sensitive(identity);

        let transports = registry
            .expand(&selection)
            .into_iter()
            .map(|t| if reveal { t.revealing() } else { t.clone() })
            .collect();

        Ok(Self { level, transports })
    }
}

/// Logging facade for one `(module, method, path)` identity
///
/// Obtained from [`LoggerManager::get_logger`](crate::core::LoggerManager::get_logger);
/// the same identity always yields the same facade. Its level and transports
/// follow the manager's configuration, including after a reconfiguration.
///
/// # Example
///
/// ```
/// use rust_redacting_logger::prelude::*;
///
/// let manager = LoggerManager::new(LoggingConfig::default()).unwrap();
/// let logger = manager.get_logger("server", Some("start"), None).unwrap();
///
/// logger.info("listening on port %d", &[LogArg::from(8080)]);
/// assert!(!logger.enabled(LogLevel::Debug));
/// ```
pub struct Logger {
    identity: LoggerIdentity,
    state: RwLock<Arc<LoggerState>>,
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub(crate) fn new(
        identity: LoggerIdentity,
        state: LoggerState,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            identity,
            state: RwLock::new(Arc::new(state)),
            dispatcher,
        }
    }

    /// Install settings from a new configuration
    ///
    /// Calls already in flight finish with the settings they started with.
    pub(crate) fn apply(&self, state: LoggerState) {
        *self.state.write() = Arc::new(state);
    }

    pub fn identity(&self) -> &LoggerIdentity {
        &self.identity
    }

    /// Current ceiling level
    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    /// Names of the output transports this logger writes to, groups expanded
    pub fn transports(&self) -> Vec<String> {
        self.state
            .read()
            .transports
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Whether a message at `level` would be processed
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.is_enabled_for(self.state.read().level)
    }

    /// Emit a message at `level`
    ///
    /// Nothing is tokenized or rendered when the level is disabled. Problems
    /// with the call are reported on the diagnostic channel, never returned.
    pub fn log(&self, level: LogLevel, format: &str, args: &[LogArg]) {
        let state = self.state.read().clone();
        if !level.is_enabled_for(state.level) {
            return;
        }
        let tokens = tokenize(format, args);
        self.dispatcher
            .emit(&self.identity, level, &state.transports, &tokens);
    }

    pub fn fault(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Fault, format, args);
    }

    pub fn error(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Error, format, args);
    }

    pub fn warn(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Warn, format, args);
    }

    pub fn info(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Info, format, args);
    }

    pub fn verbose(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Verbose, format, args);
    }

    pub fn debug(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Debug, format, args);
    }

    pub fn trace(&self, format: &str, args: &[LogArg]) {
        self.log(LogLevel::Trace, format, args);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("identity", &self.identity)
            .field("level", &self.level())
            .field("transports", &self.transports())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{MethodSpec, ModuleSpec};
    use crate::core::dispatch::DiagnosticCallback;
    use crate::core::output_format::OutputFormat;
    use crate::core::renderer::Renderer;
    use crate::core::transport::{TransportKind, TransportSpec};
    use crate::sinks::MemorySink;

    fn setup(config: &LoggingConfig, identity: &LoggerIdentity) -> (Logger, MemorySink) {
        let registry = config.validate().unwrap();
        let state = LoggerState::resolve(identity, config, &registry).unwrap();
        let quiet: DiagnosticCallback = Arc::new(|_: &str| {});
        let dispatcher = Arc::new(Dispatcher::new(Renderer::new(), quiet));
        let memory = MemorySink::new();
        dispatcher.register("mem", Box::new(memory.clone()));
        (Logger::new(identity.clone(), state, dispatcher), memory)
    }

    fn config() -> LoggingConfig {
        LoggingConfig::new(LogLevel::Info, "mem")
            .with_transport(
                TransportSpec::new("mem", TransportKind::Stream).with_format(OutputFormat::Text),
            )
            .with_module(
                ModuleSpec::new("db").with_method(
                    MethodSpec::new("query")
                        .with_level(LogLevel::Debug)
                        .with_show_sensitive(true),
                ),
            )
    }

    #[test]
    fn test_disabled_level_is_skipped() {
        let identity = LoggerIdentity::module_only("api").unwrap();
        let (logger, memory) = setup(&config(), &identity);
        logger.debug("hidden", &[]);
        logger.info("shown", &[]);
        assert_eq!(memory.lines(), vec!["[   info]  api - shown".to_string()]);
        assert!(logger.enabled(LogLevel::Fault));
        assert!(!logger.enabled(LogLevel::Verbose));
    }

    #[test]
    fn test_node_show_sensitive_reveals() {
        let identity = LoggerIdentity::new("db", Some("query"), None).unwrap();
        let (logger, memory) = setup(&config(), &identity);
        logger.debug("sql=%<%s%>", &["select 1".into()]);
        assert_eq!(
            memory.lines(),
            vec!["[     db]R db.query - sql=select 1".to_string()]
        );
    }

    #[test]
    fn test_apply_replaces_settings() {
        let identity = LoggerIdentity::module_only("api").unwrap();
        let config = config();
        let (logger, _memory) = setup(&config, &identity);
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.transports(), vec!["mem".to_string()]);

        let quieter = LoggingConfig {
            defaults: crate::core::config::NodeSettings::new(LogLevel::Error, "mem"),
            ..config
        };
        let registry = quieter.validate().unwrap();
        logger.apply(LoggerState::resolve(&identity, &quieter, &registry).unwrap());
        assert_eq!(logger.level(), LogLevel::Error);
    }
}
