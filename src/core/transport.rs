//! Transport definitions and the registry that validates them
//!
//! A transport is a named destination (console, file, stream) with its own
//! output format, sensitivity policy and level ceiling, or a named group of
//! previously defined transports.

use super::error::{ConfigIssue, ConfigIssueKind, ConfigIssues, LoggerError, Result};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Console,
    File,
    Stream,
    Group,
}

impl TransportKind {
    pub const ALL: [TransportKind; 4] = [
        TransportKind::Console,
        TransportKind::File,
        TransportKind::Stream,
        TransportKind::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Console => "console",
            TransportKind::File => "file",
            TransportKind::Stream => "stream",
            TransportKind::Group => "group",
        }
    }

    pub fn valid_names() -> String {
        Self::ALL.map(|k| k.as_str()).join(", ")
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "console" => Ok(TransportKind::Console),
            "file" => Ok(TransportKind::File),
            "stream" => Ok(TransportKind::Stream),
            "group" => Ok(TransportKind::Group),
            _ => Err(format!("Invalid transport type: '{}'", s)),
        }
    }
}

/// Level ceiling as written in configuration: a level name or a rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelRef {
    Rank(i64),
    Name(String),
}

impl LevelRef {
    pub fn resolve(&self) -> Option<LogLevel> {
        match self {
            LevelRef::Rank(rank) => u8::try_from(*rank).ok().and_then(LogLevel::from_rank),
            LevelRef::Name(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for LevelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelRef::Rank(rank) => write!(f, "{}", rank),
            LevelRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<LogLevel> for LevelRef {
    fn from(level: LogLevel) -> Self {
        LevelRef::Name(level.to_str().to_string())
    }
}

/// A transport as written in configuration, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_limit: Option<LevelRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl TransportSpec {
    pub fn new(name: impl Into<String>, kind: TransportKind) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind.as_str().to_string()),
            ..Self::default()
        }
    }

    /// The transport a bare `"console"` entry stands for
    pub fn default_console() -> Self {
        Self::new("console", TransportKind::Console).with_format(OutputFormat::AnsiText)
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format.as_str().to_string());
        self
    }

    #[must_use]
    pub fn with_show_sensitive(mut self, show: bool) -> Self {
        self.show_sensitive = Some(show);
        self
    }

    #[must_use]
    pub fn with_level_limit(mut self, level: LogLevel) -> Self {
        self.level_limit = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = Some(members.into_iter().map(Into::into).collect());
        self
    }
}

/// One entry of the `transports` list: a full spec or a bare type name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportEntry {
    Named(String),
    Spec(TransportSpec),
}

impl From<TransportSpec> for TransportEntry {
    fn from(spec: TransportSpec) -> Self {
        TransportEntry::Spec(spec)
    }
}

/// A validated transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    name: String,
    kind: TransportKind,
    format: Option<OutputFormat>,
    show_sensitive: bool,
    level_limit: Option<LogLevel>,
    path: Option<PathBuf>,
    members: Vec<String>,
}

impl Transport {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind == TransportKind::Group
    }

    /// `None` for groups
    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub fn show_sensitive(&self) -> bool {
        self.show_sensitive
    }

    pub fn level_limit(&self) -> Option<LogLevel> {
        self.level_limit
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Whether a message at `level` passes this transport's ceiling
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.level_limit
            .map_or(true, |limit| level.is_enabled_for(limit))
    }

    /// Copy of this transport that reveals sensitive content
    pub fn revealing(&self) -> Transport {
        Transport {
            show_sensitive: true,
            ..self.clone()
        }
    }
}

/// Validated transports, in build order
#[derive(Debug, Clone, Default)]
pub struct TransportRegistry {
    transports: Vec<Transport>,
    index: HashMap<String, usize>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every entry, collecting the problems of all of them
    ///
    /// Groups must come after their members.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a TransportEntry>,
    {
        let (registry, issues) = Self::build_all(entries);
        issues.into_result()?;
        Ok(registry)
    }

    /// Build every entry that validates, returning the problems of the rest
    pub fn build_all<'a, I>(entries: I) -> (Self, ConfigIssues)
    where
        I: IntoIterator<Item = &'a TransportEntry>,
    {
        let mut registry = Self::new();
        let mut issues = ConfigIssues::new();
        for entry in entries {
            if let Err(err) = registry.build(entry) {
                issues.extend(ConfigIssues::from(err.config_issues().to_vec()));
            }
        }
        (registry, issues)
    }

    /// Validate one entry and register it
    ///
    /// Every problem with the entry is reported in a single `InvalidConfig`
    /// error; nothing is registered in that case.
    pub fn build(&mut self, entry: &TransportEntry) -> Result<&Transport> {
        let spec = match entry {
            TransportEntry::Spec(spec) => spec.clone(),
            TransportEntry::Named(kind) if kind == TransportKind::Console.as_str() => {
                TransportSpec::default_console()
            }
            TransportEntry::Named(kind) => {
                return Err(LoggerError::config(ConfigIssue::new(
                    ConfigIssueKind::NoDefaultForType,
                    format!("transport:{}", kind),
                    format!("There is no default config of type \"{}\"", kind),
                )));
            }
        };

        let transport = self.validate(&spec)?;
        let idx = self.transports.len();
        self.index.insert(transport.name.clone(), idx);
        self.transports.push(transport);
        Ok(&self.transports[idx])
    }

    fn validate(&self, spec: &TransportSpec) -> Result<Transport> {
        let mut issues = ConfigIssues::new();

        let name = spec.name.clone().filter(|n| !n.is_empty());
        let subject = format!(
            "transport:{}",
            name.as_deref().unwrap_or("<unnamed>")
        );
        let mut issue = |kind: ConfigIssueKind, message: String| {
            issues.push(ConfigIssue::new(kind, subject.clone(), message));
        };

        match &name {
            None => issue(ConfigIssueKind::NameRequired, "Config missing name".into()),
            Some(n) if self.index.contains_key(n) => issue(
                ConfigIssueKind::NameDuplicated,
                format!("Config name \"{}\" duplicated. Config names must be unique.", n),
            ),
            Some(_) => {}
        }

        let kind = match spec.kind.as_deref() {
            None => {
                issue(
                    ConfigIssueKind::TypeRequired,
                    format!(
                        "Config type required. Acceptable values: {}",
                        TransportKind::valid_names()
                    ),
                );
                None
            }
            Some(raw) => match raw.parse::<TransportKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    issue(
                        ConfigIssueKind::InvalidType,
                        format!(
                            "Config type \"{}\" not valid. Acceptable values: {}",
                            raw,
                            TransportKind::valid_names()
                        ),
                    );
                    None
                }
            },
        };

        let mut format = None;
        let mut show_sensitive = false;
        let mut level_limit = None;
        let mut path = None;
        let mut members = Vec::new();

        if kind == Some(TransportKind::Group) {
            let present = [
                ("format", spec.format.is_some()),
                ("showSensitive", spec.show_sensitive.is_some()),
                ("levelLimit", spec.level_limit.is_some()),
            ];
            for (property, _) in present.iter().filter(|(_, set)| *set) {
                issue(
                    ConfigIssueKind::InvalidProperty,
                    format!("Property \"{}\" not valid for group configs", property),
                );
            }

            match &spec.members {
                None => issue(
                    ConfigIssueKind::InvalidMembersList,
                    "Group needs members. Set to an empty array to suppress this error".into(),
                ),
                Some(list) => {
                    for member in list {
                        if !self.index.contains_key(member) {
                            issue(
                                ConfigIssueKind::UnknownMember,
                                format!("Group member \"{}\" does not exist", member),
                            );
                        }
                    }
                    members = list.clone();
                }
            }
        } else {
            match spec.format.as_deref() {
                None => issue(
                    ConfigIssueKind::FormatRequired,
                    format!(
                        "Config format required. Acceptable values: {}",
                        OutputFormat::valid_names()
                    ),
                ),
                Some(raw) => match raw.parse::<OutputFormat>() {
                    Ok(f) => format = Some(f),
                    Err(_) => issue(
                        ConfigIssueKind::InvalidFormat,
                        format!(
                            "Format \"{}\" is not valid. Acceptable values: {}",
                            raw,
                            OutputFormat::valid_names()
                        ),
                    ),
                },
            }

            show_sensitive = spec.show_sensitive.unwrap_or(false);

            if let Some(limit) = &spec.level_limit {
                match limit.resolve() {
                    Some(level) => level_limit = Some(level),
                    None => issue(
                        ConfigIssueKind::InvalidLevelLimit,
                        format!(
                            "Level limit \"{}\" not valid. Acceptable values: {} or by numbers 0 through {}",
                            limit,
                            LogLevel::ALL.map(|l| l.to_str()).join(", "),
                            LogLevel::ALL.len() - 1
                        ),
                    ),
                }
            }

            if kind == Some(TransportKind::File) {
                match spec.path.as_deref().filter(|p| !p.is_empty()) {
                    Some(p) => path = Some(PathBuf::from(p)),
                    None => issue(ConfigIssueKind::PathRequired, "pathname required".into()),
                }
            }
        }

        issues.into_result()?;

        // Both are guaranteed by the checks above once no issue was recorded.
        match (name, kind) {
            (Some(name), Some(kind)) => Ok(Transport {
                name,
                kind,
                format,
                show_sensitive,
                level_limit,
                path,
                members,
            }),
            _ => Err(LoggerError::other("transport validation incomplete")),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Transport> {
        self.index.get(name).map(|&idx| &self.transports[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transport> {
        self.transports.iter()
    }

    /// Resolve a selection to output transports, expanding groups breadth-first
    ///
    /// Each transport appears at most once; unknown names are skipped.
    pub fn expand<S: AsRef<str>>(&self, selection: &[S]) -> Vec<&Transport> {
        let mut queue: VecDeque<&str> = selection.iter().map(AsRef::as_ref).collect();
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            let Some(transport) = self.lookup(name) else {
                continue;
            };
            if transport.is_group() {
                queue.extend(transport.members.iter().map(String::as_str));
            } else {
                resolved.push(transport);
            }
        }
        resolved
    }
}
