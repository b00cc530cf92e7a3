//! Error types for the logger system

use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration rejected, with every problem found in one validation pass
    #[error("Invalid logging configuration: {issues}")]
    InvalidConfig { issues: ConfigIssues },

    /// Level name outside the fixed level table
    #[error("Invalid log level: '{name}'")]
    InvalidLevel { name: String },

    /// Malformed module/method/path identity
    #[error("Invalid logger identity: {message}")]
    InvalidIdentity { message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Stream transport used before a destination was registered for it
    #[error("No stream registered for transport '{transport}'")]
    StreamNotRegistered { transport: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error from collected issues
    pub fn config(issues: impl Into<ConfigIssues>) -> Self {
        LoggerError::InvalidConfig {
            issues: issues.into(),
        }
    }

    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel { name: name.into() }
    }

    pub fn identity(message: impl Into<String>) -> Self {
        LoggerError::InvalidIdentity {
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn stream_not_registered(transport: impl Into<String>) -> Self {
        LoggerError::StreamNotRegistered {
            transport: transport.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Configuration issues carried by this error, empty for other variants
    pub fn config_issues(&self) -> &[ConfigIssue] {
        match self {
            LoggerError::InvalidConfig { issues } => issues.as_slice(),
            _ => &[],
        }
    }
}

/// Category of a configuration problem, with a stable kebab-case code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigIssueKind {
    NameRequired,
    NameDuplicated,
    TypeRequired,
    InvalidType,
    InvalidProperty,
    FormatRequired,
    InvalidFormat,
    InvalidLevelLimit,
    PathRequired,
    InvalidMembersList,
    UnknownMember,
    NoDefaultForType,
    DefaultsRequired,
    InvalidLevel,
    InvalidTransport,
    ModuleNameRequired,
    DuplicateNodeName,
    InvalidDocument,
}

impl ConfigIssueKind {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigIssueKind::NameRequired => "name-required",
            ConfigIssueKind::NameDuplicated => "name-duplicated",
            ConfigIssueKind::TypeRequired => "type-required",
            ConfigIssueKind::InvalidType => "invalid-type",
            ConfigIssueKind::InvalidProperty => "invalid-property",
            ConfigIssueKind::FormatRequired => "format-required",
            ConfigIssueKind::InvalidFormat => "invalid-format",
            ConfigIssueKind::InvalidLevelLimit => "invalid-level-limit",
            ConfigIssueKind::PathRequired => "path-required",
            ConfigIssueKind::InvalidMembersList => "invalid-members-list",
            ConfigIssueKind::UnknownMember => "unknown-member",
            ConfigIssueKind::NoDefaultForType => "no-default-for-type",
            ConfigIssueKind::DefaultsRequired => "defaults-required",
            ConfigIssueKind::InvalidLevel => "invalid-level",
            ConfigIssueKind::InvalidTransport => "invalid-transport",
            ConfigIssueKind::ModuleNameRequired => "module-name-required",
            ConfigIssueKind::DuplicateNodeName => "duplicate-node-name",
            ConfigIssueKind::InvalidDocument => "invalid-document",
        }
    }
}

impl fmt::Display for ConfigIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub kind: ConfigIssueKind,
    /// Where the problem was found, e.g. `transport:file-out` or `module:db, method:query`
    pub subject: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(
        kind: ConfigIssueKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Ordered collection of configuration problems
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigIssues(Vec<ConfigIssue>);

impl ConfigIssues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, issue: ConfigIssue) {
        self.0.push(issue);
    }

    pub fn extend(&mut self, other: ConfigIssues) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[ConfigIssue] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigIssue> {
        self.0.iter()
    }

    pub fn has_kind(&self, kind: ConfigIssueKind) -> bool {
        self.0.iter().any(|issue| issue.kind == kind)
    }

    /// `Ok(())` when empty, otherwise an `InvalidConfig` error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::config(self))
        }
    }
}

impl From<Vec<ConfigIssue>> for ConfigIssues {
    fn from(issues: Vec<ConfigIssue>) -> Self {
        Self(issues)
    }
}

impl From<ConfigIssue> for ConfigIssues {
    fn from(issue: ConfigIssue) -> Self {
        Self(vec![issue])
    }
}

impl<'a> IntoIterator for &'a ConfigIssues {
    type Item = &'a ConfigIssue;
    type IntoIter = std::slice::Iter<'a, ConfigIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s)", self.0.len())?;
        for issue in &self.0 {
            write!(f, "; {}", issue)?;
        }
        Ok(())
    }
}
