//! Logger manager: active configuration, facade cache and stream registry

use super::{
    config::{ConfigSource, LoggingConfig},
    dispatch::{stderr_diagnostics, DiagnosticCallback, Dispatcher},
    error::Result,
    identity::LoggerIdentity,
    logger::{Logger, LoggerState},
    metrics::LoggerMetrics,
    renderer::Renderer,
    sink::Sink,
    transport::TransportRegistry,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A configuration that passed validation, with its built transports
#[derive(Debug)]
struct ActiveConfig {
    config: LoggingConfig,
    registry: TransportRegistry,
}

impl ActiveConfig {
    fn validate(config: LoggingConfig) -> Result<Self> {
        let registry = config.validate()?;
        Ok(Self { config, registry })
    }
}

/// Owns the active configuration and hands out one logger per identity
///
/// Replacing the configuration is all-or-nothing: the new tree is fully
/// validated and every existing logger's settings recomputed before anything
/// is swapped in. On error the previous configuration stays active.
///
/// # Example
///
/// ```
/// use rust_redacting_logger::prelude::*;
/// use rust_redacting_logger::sinks::MemorySink;
///
/// let config = LoggingConfig::from_json_str(r#"{
///     "defaults": {"level": "info", "transport": "audit"},
///     "transports": [{"name": "audit", "type": "stream", "format": "text"}]
/// }"#).unwrap();
///
/// let memory = MemorySink::new();
/// let manager = LoggerManager::builder()
///     .config(config)
///     .stream("audit", memory.clone())
///     .build()
///     .unwrap();
///
/// let logger = manager.get_logger("auth", None, None).unwrap();
/// logger.info("token %<%s%>", &[LogArg::from("abc123")]);
/// assert_eq!(memory.lines(), vec!["[   info]R auth - token [redacted]"]);
/// ```
pub struct LoggerManager {
    active: RwLock<Arc<ActiveConfig>>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    dispatcher: Arc<Dispatcher>,
}

impl LoggerManager {
    /// Create a manager with the default renderer and diagnostic channel
    pub fn new(config: LoggingConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> LoggerManagerBuilder {
        LoggerManagerBuilder::new()
    }

    /// Logger for `(module, method, path)`; the same identity yields the same logger
    pub fn get_logger(
        &self,
        module: &str,
        method: Option<&str>,
        path: Option<&str>,
    ) -> Result<Arc<Logger>> {
        let identity = LoggerIdentity::new(module, method, path)?;
        self.logger_for(&identity)
    }

    pub fn logger_for(&self, identity: &LoggerIdentity) -> Result<Arc<Logger>> {
        let key = identity.key();
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(&key) {
            return Ok(Arc::clone(logger));
        }

        let active = self.active.read().clone();
        let state = LoggerState::resolve(identity, &active.config, &active.registry)?;
        let logger = Arc::new(Logger::new(
            identity.clone(),
            state,
            Arc::clone(&self.dispatcher),
        ));
        loggers.insert(key, Arc::clone(&logger));
        Ok(logger)
    }

    /// Replace the active configuration
    ///
    /// Every existing logger picks up its new settings. On failure nothing
    /// changes and all problems found are returned together.
    pub fn reconfig(&self, config: LoggingConfig) -> Result<()> {
        let candidate = ActiveConfig::validate(config)?;

        {
            let loggers = self.loggers.lock();
            let states = loggers
                .values()
                .map(|logger| {
                    LoggerState::resolve(logger.identity(), &candidate.config, &candidate.registry)
                })
                .collect::<Result<Vec<_>>>()?;

            *self.active.write() = Arc::new(candidate);
            for (logger, state) in loggers.values().zip(states) {
                logger.apply(state);
            }
        }
        // Retired sinks are flushed with no manager lock held, since a sink
        // may itself be logging through this manager.
        self.dispatcher.reset_automatic();
        Ok(())
    }

    /// Load a configuration from `source` and make it active
    pub fn configure_from<S: ConfigSource + ?Sized>(&self, source: &S) -> Result<()> {
        self.reconfig(source.load()?)
    }

    /// Bind a sink to the transport `name`
    ///
    /// Any number of sinks may be bound to one name. Bound sinks replace the
    /// automatic console or file sink of that transport, and are the only
    /// destination of `stream` transports.
    pub fn register_stream(&self, name: impl Into<String>, sink: Box<dyn Sink>) {
        self.dispatcher.register(name, sink);
    }

    /// Copy of the active configuration
    pub fn config(&self) -> LoggingConfig {
        self.active.read().config.clone()
    }

    /// Names of the transports defined by the active configuration
    pub fn transport_names(&self) -> Vec<String> {
        self.active
            .read()
            .registry
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    pub fn renderer(&self) -> &Renderer {
        self.dispatcher.renderer()
    }

    /// Number of distinct identities handed out so far
    pub fn logger_count(&self) -> usize {
        self.loggers.lock().len()
    }

    /// Flush every sink
    pub fn flush(&self) {
        self.dispatcher.flush();
    }
}

impl Drop for LoggerManager {
    fn drop(&mut self) {
        self.dispatcher.flush();
    }
}

impl std::fmt::Debug for LoggerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerManager")
            .field("transports", &self.transport_names())
            .field("loggers", &self.logger_count())
            .finish()
    }
}

/// Builder for LoggerManager with fluent API
///
/// # Example
/// ```
/// use rust_redacting_logger::prelude::*;
/// use std::sync::Arc;
///
/// let manager = LoggerManager::builder()
///     .config(LoggingConfig::new(LogLevel::Debug, "console").with_transport(TransportSpec::default_console()))
///     .renderer(Renderer::new().with_timestamp_format(TimestampFormat::Micros))
///     .on_diagnostic(Arc::new(|message: &str| {
///         eprintln!("logger: {}", message);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerManagerBuilder {
    config: LoggingConfig,
    renderer: Renderer,
    on_diagnostic: Option<DiagnosticCallback>,
    streams: Vec<(String, Box<dyn Sink>)>,
}

impl LoggerManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
            renderer: Renderer::default(),
            on_diagnostic: None,
            streams: Vec::new(),
        }
    }

    /// Initial configuration; defaults to `LoggingConfig::default()`
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set a callback for diagnostics
    ///
    /// Called once per distinct warning of an emission, and for sink
    /// failures. Defaults to printing `[LOGGER WARNING] ...` on stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, callback: DiagnosticCallback) -> Self {
        self.on_diagnostic = Some(callback);
        self
    }

    /// Bind a sink to a transport name before the first logger exists
    #[must_use = "builder methods return a new value"]
    pub fn stream<S: Sink + 'static>(mut self, name: impl Into<String>, sink: S) -> Self {
        self.streams.push((name.into(), Box::new(sink)));
        self
    }

    /// Validate the configuration and build the manager
    pub fn build(self) -> Result<LoggerManager> {
        let active = ActiveConfig::validate(self.config)?;
        let dispatcher = Dispatcher::new(
            self.renderer,
            self.on_diagnostic.unwrap_or_else(stderr_diagnostics),
        );
        for (name, sink) in self.streams {
            dispatcher.register(name, sink);
        }

        Ok(LoggerManager {
            active: RwLock::new(Arc::new(active)),
            loggers: Mutex::new(HashMap::new()),
            dispatcher: Arc::new(dispatcher),
        })
    }
}

impl Default for LoggerManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
