//! Logging configuration tree
//!
//! ```text
//! defaults:   { level, transport }            (both required)
//! transports: [ TransportSpec | "console" ]   (groups after their members)
//! modules:
//!   - name, level?, transport?, showSensitive?
//!     methods:
//!       - name, level?, transport?, showSensitive?
//!         paths:
//!           - name, level?, transport?, showSensitive?
//! ```
//!
//! A configuration is replaced wholesale; it is never patched in place.

use super::error::{ConfigIssue, ConfigIssueKind, ConfigIssues, LoggerError, Result};
use super::log_level::LogLevel;
use super::transport::{TransportEntry, TransportRegistry, TransportSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A transport reference: one name or an ordered list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportSelection {
    One(String),
    Many(Vec<String>),
}

impl TransportSelection {
    pub fn names(&self) -> Vec<String> {
        match self {
            TransportSelection::One(name) => vec![name.clone()],
            TransportSelection::Many(names) => names.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            TransportSelection::One(name) => std::slice::from_ref(name),
            TransportSelection::Many(names) => names,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for TransportSelection {
    fn from(name: &str) -> Self {
        TransportSelection::One(name.to_string())
    }
}

impl From<Vec<&str>> for TransportSelection {
    fn from(names: Vec<&str>) -> Self {
        TransportSelection::Many(names.into_iter().map(str::to_string).collect())
    }
}

/// Properties every node of the tree may set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_sensitive: Option<bool>,
}

impl NodeSettings {
    pub fn new(level: LogLevel, transport: impl Into<TransportSelection>) -> Self {
        Self {
            level: Some(level.to_str().to_string()),
            transport: Some(transport.into()),
            show_sensitive: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub settings: NodeSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub settings: NodeSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub settings: NodeSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,
}

macro_rules! node_builders {
    ($t:ty) => {
        impl $t {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: Some(name.into()),
                    ..Self::default()
                }
            }

            #[must_use]
            pub fn with_level(mut self, level: LogLevel) -> Self {
                self.settings.level = Some(level.to_str().to_string());
                self
            }

            #[must_use]
            pub fn with_transport(mut self, transport: impl Into<TransportSelection>) -> Self {
                self.settings.transport = Some(transport.into());
                self
            }

            #[must_use]
            pub fn with_show_sensitive(mut self, show: bool) -> Self {
                self.settings.show_sensitive = Some(show);
                self
            }

            pub fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }
        }
    };
}

node_builders!(ModuleSpec);
node_builders!(MethodSpec);
node_builders!(PathSpec);

impl ModuleSpec {
    #[must_use]
    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name() == Some(name))
    }
}

impl MethodSpec {
    #[must_use]
    pub fn with_path(mut self, path: PathSpec) -> Self {
        self.paths.push(path);
        self
    }

    pub fn path(&self, name: &str) -> Option<&PathSpec> {
        self.paths.iter().find(|p| p.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub defaults: NodeSettings,
    #[serde(default)]
    pub transports: Vec<TransportEntry>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

impl Default for LoggingConfig {
    /// `info` to the default ANSI console transport
    fn default() -> Self {
        Self {
            defaults: NodeSettings::new(LogLevel::Info, "console"),
            transports: vec![TransportEntry::Named("console".to_string())],
            modules: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Configuration with the given defaults and no transports yet
    pub fn new(level: LogLevel, transport: impl Into<TransportSelection>) -> Self {
        Self {
            defaults: NodeSettings::new(level, transport),
            transports: Vec::new(),
            modules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transport(mut self, spec: TransportSpec) -> Self {
        self.transports.push(TransportEntry::Spec(spec));
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: ModuleSpec) -> Self {
        self.modules.push(module);
        self
    }

    pub fn module(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|m| m.name() == Some(name))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Extract the tree from the `debug.logging` section of an application document
    pub fn from_document(document: &serde_json::Value) -> Result<Self> {
        let section = document
            .get("debug")
            .and_then(|debug| debug.get("logging"))
            .ok_or_else(|| {
                LoggerError::config(ConfigIssue::new(
                    ConfigIssueKind::InvalidDocument,
                    "document",
                    "Invalid configuration -- new config must be under debug.logging",
                ))
            })?;
        Self::from_value(section.clone())
    }

    /// Validate the whole tree, returning the transport registry it defines
    ///
    /// Every problem in the tree is reported in one `InvalidConfig` error.
    pub fn validate(&self) -> Result<TransportRegistry> {
        let (registry, mut issues) = TransportRegistry::build_all(&self.transports);

        let defaults = "[defaults]";
        for (property, present) in [
            ("level", self.defaults.level.is_some()),
            ("transport", self.defaults.transport.is_some()),
        ] {
            if !present {
                issues.push(ConfigIssue::new(
                    ConfigIssueKind::DefaultsRequired,
                    defaults,
                    format!("{} requires {} config", defaults, property),
                ));
            }
        }
        check_settings(&mut issues, &registry, defaults, &self.defaults);

        check_names(&mut issues, "module", "", self.modules.iter().map(|m| m.name()));
        for module in &self.modules {
            let module_subject = format!("module:{}", module.name().unwrap_or("<unnamed>"));
            check_settings(&mut issues, &registry, &module_subject, &module.settings);
            check_names(
                &mut issues,
                "method",
                &module_subject,
                module.methods.iter().map(|m| m.name()),
            );

            for method in &module.methods {
                let method_subject = format!(
                    "{}, method:{}",
                    module_subject,
                    method.name().unwrap_or("<unnamed>")
                );
                check_settings(&mut issues, &registry, &method_subject, &method.settings);
                check_names(
                    &mut issues,
                    "path",
                    &method_subject,
                    method.paths.iter().map(|p| p.name()),
                );

                for path in &method.paths {
                    let path_subject = format!(
                        "{}, path:{}",
                        method_subject,
                        path.name().unwrap_or("<unnamed>")
                    );
                    check_settings(&mut issues, &registry, &path_subject, &path.settings);
                }
            }
        }

        issues.into_result()?;
        Ok(registry)
    }
}

fn check_settings(
    issues: &mut ConfigIssues,
    registry: &TransportRegistry,
    subject: &str,
    settings: &NodeSettings,
) {
    if let Some(level) = &settings.level {
        if level.parse::<LogLevel>().is_err() {
            issues.push(ConfigIssue::new(
                ConfigIssueKind::InvalidLevel,
                subject,
                format!("{} level \"{}\" invalid", subject, level),
            ));
        }
    }
    if let Some(selection) = &settings.transport {
        for name in selection.iter() {
            if !registry.contains(name) {
                issues.push(ConfigIssue::new(
                    ConfigIssueKind::InvalidTransport,
                    subject,
                    format!("{} transport \"{}\" invalid", subject, name),
                ));
            }
        }
    }
}

fn check_names<'a>(
    issues: &mut ConfigIssues,
    node_kind: &str,
    parent: &str,
    names: impl Iterator<Item = Option<&'a str>>,
) {
    let mut seen = HashSet::new();
    let location = if parent.is_empty() {
        node_kind.to_string()
    } else {
        format!("{}, {}", parent, node_kind)
    };
    for name in names {
        match name.filter(|n| !n.is_empty()) {
            None => issues.push(ConfigIssue::new(
                ConfigIssueKind::ModuleNameRequired,
                location.clone(),
                format!("{} name not set", location),
            )),
            Some(name) if !seen.insert(name) => issues.push(ConfigIssue::new(
                ConfigIssueKind::DuplicateNodeName,
                format!("{}:{}", location, name),
                format!("{} name \"{}\" appears more than once", node_kind, name),
            )),
            Some(_) => {}
        }
    }
}

/// Supplies a parsed configuration tree
pub trait ConfigSource {
    fn load(&self) -> Result<LoggingConfig>;
}

impl ConfigSource for LoggingConfig {
    fn load(&self) -> Result<LoggingConfig> {
        Ok(self.clone())
    }
}

impl ConfigSource for serde_json::Value {
    fn load(&self) -> Result<LoggingConfig> {
        LoggingConfig::from_value(self.clone())
    }
}

/// JSON text
impl ConfigSource for str {
    fn load(&self) -> Result<LoggingConfig> {
        LoggingConfig::from_json_str(self)
    }
}
