//! Log level definitions
//!
//! Levels form a fixed, ordered table. Rank 0 is the most severe level and
//! ranks increase contiguously as severity decreases, so a level is enabled
//! under a ceiling when `level.rank() <= ceiling.rank()`.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Fault = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Verbose = 4,
    Debug = 5,
    Trace = 6,
}

impl LogLevel {
    /// Every level, most severe first. Indexing by rank yields the level.
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Fault,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Fault => "fault",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Fixed-width bracket tag used by the plain text format
    pub fn text_prefix(&self) -> &'static str {
        match self {
            LogLevel::Fault => "[*FAULT*]",
            LogLevel::Error => "[ ERROR ]",
            LogLevel::Warn => "[  warn ]",
            LogLevel::Info => "[   info]",
            LogLevel::Verbose => "[    vrb]",
            LogLevel::Debug => "[     db]",
            LogLevel::Trace => "[      t]",
        }
    }

    /// Bracket tag wrapped in the level's ANSI color, reset afterwards
    pub fn ansi_prefix(&self) -> &'static str {
        match self {
            LogLevel::Fault => "\x1b[1;101;97m[*FAULT*]\x1b[m",
            LogLevel::Error => "\x1b[1;41;97m[ ERROR ]\x1b[m",
            LogLevel::Warn => "\x1b[1;104;97m[  warn ]\x1b[m",
            LogLevel::Info => "\x1b[92m[   info]\x1b[m",
            LogLevel::Verbose => "\x1b[94m[    vrb]\x1b[m",
            LogLevel::Debug => "\x1b[94m[     db]\x1b[m",
            LogLevel::Trace => "[      t]\x1b[m",
        }
    }

    /// Whether a message at this level passes a ceiling of `ceiling`
    #[inline]
    pub fn is_enabled_for(self, ceiling: LogLevel) -> bool {
        self.rank() <= ceiling.rank()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fault" => Ok(LogLevel::Fault),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
