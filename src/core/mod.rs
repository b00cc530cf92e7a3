//! Core logger types and the emission pipeline

pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod log_arg;
pub mod log_level;
pub mod logger;
pub mod manager;
pub mod metrics;
pub mod output_format;
pub mod renderer;
pub mod resolver;
pub mod sink;
pub mod timestamp;
pub mod token;
pub mod tokenizer;
pub mod transport;

pub use config::{
    ConfigSource, LoggingConfig, MethodSpec, ModuleSpec, NodeSettings, PathSpec,
    TransportSelection,
};
pub use dispatch::{stderr_diagnostics, DiagnosticCallback};
pub use error::{ConfigIssue, ConfigIssueKind, ConfigIssues, LoggerError, Result};
pub use identity::LoggerIdentity;
pub use log_arg::{LogArg, Number};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use manager::{LoggerManager, LoggerManagerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use renderer::{Rendered, Renderer, REDACTED_PLACEHOLDER};
pub use resolver::{ConfigProperty, PropertyValue};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use token::{has_redactables, Pragma, Token, TokenWarning};
pub use tokenizer::tokenize;
pub use transport::{
    LevelRef, Transport, TransportEntry, TransportKind, TransportRegistry, TransportSpec,
};
