//! # Rust Redacting Logger
//!
//! A structured logging facility whose format strings can mark sensitive
//! content, so each destination decides whether to reveal or hide it.
//!
//! ## Features
//!
//! - **Redaction pragmas**: `%<...%>` marks a region, a leading `%<` marks the
//!   whole line, a trailing `%>` marks everything after it
//! - **Cascading configuration**: level, transport and `showSensitive` resolve
//!   from path to method to module to defaults
//! - **Transports**: console, file, registered streams and named groups, each
//!   with its own format (`text`, `ansi-text`, `json`) and level limit
//! - **All-or-nothing reconfiguration**: invalid trees are rejected with every
//!   problem reported at once
//!
//! ## Example
//!
//! ```
//! use rust_redacting_logger::prelude::*;
//! use rust_redacting_logger::info;
//!
//! let manager = LoggerManager::new(LoggingConfig::default()).unwrap();
//! let logger = manager.get_logger("http", Some("GET"), Some("/users")).unwrap();
//! info!(logger, "user %<%s%> listed %d items", "alice", 3);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ConfigSource, LogArg, LogLevel, Logger, LoggerError, LoggerIdentity, LoggerManager,
        LoggerManagerBuilder, LoggerMetrics, LoggingConfig, MethodSpec, ModuleSpec, OutputFormat,
        PathSpec, Renderer, Result, Sink, TimestampFormat, TransportKind, TransportSpec,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, StreamSink};
}

pub use crate::core::{
    tokenize, ConfigIssue, ConfigIssueKind, DiagnosticCallback, LogArg, LogLevel, Logger,
    LoggerError, LoggerIdentity, LoggerManager, LoggerMetrics, LoggingConfig, OutputFormat,
    Renderer, Result, Sink, TimestampFormat, Token,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, StreamSink};
