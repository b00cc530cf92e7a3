//! Logging macros that convert arguments only when the level is enabled.
//!
//! Each argument goes through `LogArg::from`, so any type with a `From`
//! conversion can be passed directly. When the level is disabled the
//! arguments are not evaluated.
//!
//! # Examples
//!
//! ```
//! use rust_redacting_logger::prelude::*;
//! use rust_redacting_logger::{info, warn};
//!
//! let manager = LoggerManager::new(LoggingConfig::default()).unwrap();
//! let logger = manager.get_logger("server", None, None).unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // Substitution and redaction
//! let port = 8080;
//! info!(logger, "Listening on port %d", port);
//! warn!(logger, "Login failed for %<%s%>", "alice");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_redacting_logger::prelude::*;
/// # let manager = LoggerManager::new(LoggingConfig::default()).unwrap();
/// # let logger = manager.get_logger("app", None, None).unwrap();
/// use rust_redacting_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, $fmt, &[$($crate::core::LogArg::from($arg)),*]);
        }
    }};
}

/// Log a fault-level message.
#[macro_export]
macro_rules! fault {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fault, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_redacting_logger::prelude::*;
/// # let manager = LoggerManager::new(LoggingConfig::default()).unwrap();
/// # let logger = manager.get_logger("db", Some("connect"), None).unwrap();
/// use rust_redacting_logger::error;
/// error!(logger, "Connection to %s failed", "db-1");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warn-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}
