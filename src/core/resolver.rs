//! Cascading property resolution over the configuration tree
//!
//! A property is looked up from the most specific node an identity reaches
//! (path, then method, then module) and finally the defaults. The first node
//! that sets the property wins. A node that does not exist at some level is
//! simply skipped.

use super::config::{LoggingConfig, NodeSettings, TransportSelection};
use super::error::{ConfigIssue, ConfigIssueKind, LoggerError, Result};
use super::identity::LoggerIdentity;
use super::log_level::LogLevel;

/// Properties that cascade through the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigProperty {
    Level,
    Transport,
    ShowSensitive,
}

impl ConfigProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigProperty::Level => "level",
            ConfigProperty::Transport => "transport",
            ConfigProperty::ShowSensitive => "showSensitive",
        }
    }
}

/// A resolved property value, borrowed from the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Level(&'a str),
    Transport(&'a TransportSelection),
    ShowSensitive(bool),
}

impl LoggingConfig {
    /// Nodes an identity reaches, most specific first, ending with the defaults
    fn chain(&self, identity: &LoggerIdentity) -> Vec<&NodeSettings> {
        let mut chain = Vec::with_capacity(4);
        if let Some(module) = self.module(identity.module()) {
            if let Some(method) = identity.method().and_then(|name| module.method(name)) {
                if let Some(path) = identity.path().and_then(|name| method.path(name)) {
                    chain.push(&path.settings);
                }
                chain.push(&method.settings);
            }
            chain.push(&module.settings);
        }
        chain.push(&self.defaults);
        chain
    }

    fn cascade<'a, T>(
        &'a self,
        identity: &LoggerIdentity,
        pick: impl Fn(&'a NodeSettings) -> Option<T>,
    ) -> Option<T> {
        self.chain(identity).into_iter().find_map(pick)
    }

    /// The value of `property` for `identity`, or `None` if no node sets it
    pub fn resolve_property(
        &self,
        property: ConfigProperty,
        identity: &LoggerIdentity,
    ) -> Option<PropertyValue<'_>> {
        match property {
            ConfigProperty::Level => self
                .cascade(identity, |node| node.level.as_deref())
                .map(PropertyValue::Level),
            ConfigProperty::Transport => self
                .cascade(identity, |node| node.transport.as_ref())
                .map(PropertyValue::Transport),
            ConfigProperty::ShowSensitive => self
                .cascade(identity, |node| node.show_sensitive)
                .map(PropertyValue::ShowSensitive),
        }
    }

    /// Ceiling level for `identity`
    pub fn effective_level(&self, identity: &LoggerIdentity) -> Result<LogLevel> {
        let name = self
            .cascade(identity, |node| node.level.as_deref())
            .ok_or_else(|| {
                LoggerError::config(ConfigIssue::new(
                    ConfigIssueKind::DefaultsRequired,
                    "[defaults]",
                    "[defaults] requires level config",
                ))
            })?;
        name.parse()
    }

    /// Ordered transport names for `identity`; empty when nothing is selected
    pub fn effective_transport_selection(&self, identity: &LoggerIdentity) -> Vec<String> {
        self.cascade(identity, |node| node.transport.as_ref())
            .map(TransportSelection::names)
            .unwrap_or_default()
    }

    /// Whether `identity` may reveal sensitive content; `false` unless set
    pub fn effective_show_sensitive(&self, identity: &LoggerIdentity) -> bool {
        self.cascade(identity, |node| node.show_sensitive)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{MethodSpec, ModuleSpec, PathSpec};
    use crate::core::output_format::OutputFormat;
    use crate::core::transport::{TransportKind, TransportSpec};

    fn id(module: &str, method: Option<&str>, path: Option<&str>) -> LoggerIdentity {
        LoggerIdentity::new(module, method, path).unwrap()
    }

    fn config() -> LoggingConfig {
        LoggingConfig::new(LogLevel::Info, "console")
            .with_transport(TransportSpec::default_console())
            .with_transport(
                TransportSpec::new("json", TransportKind::Console).with_format(OutputFormat::Json),
            )
            .with_module(
                ModuleSpec::new("m")
                    .with_level(LogLevel::Warn)
                    .with_method(MethodSpec::new("x"))
                    .with_method(
                        MethodSpec::new("y")
                            .with_level(LogLevel::Debug)
                            .with_transport(vec!["json", "console"])
                            .with_path(PathSpec::new("/p").with_level(LogLevel::Trace))
                            .with_path(PathSpec::new("/q").with_show_sensitive(true)),
                    ),
            )
    }

    #[test]
    fn test_method_without_override_uses_module() {
        let config = config();
        assert_eq!(
            config.effective_level(&id("m", Some("x"), None)).unwrap(),
            LogLevel::Warn
        );
    }

    #[test]
    fn test_cascade_specificity() {
        let config = config();
        assert_eq!(
            config.effective_level(&id("m", Some("y"), Some("/p"))).unwrap(),
            LogLevel::Trace
        );
        assert_eq!(
            config.effective_level(&id("m", Some("y"), Some("/q"))).unwrap(),
            LogLevel::Debug
        );
        assert_eq!(
            config.effective_level(&id("m", Some("y"), None)).unwrap(),
            LogLevel::Debug
        );
        assert_eq!(
            config.effective_level(&id("m", None, None)).unwrap(),
            LogLevel::Warn
        );
        assert_eq!(
            config.effective_level(&id("other", Some("y"), Some("/p"))).unwrap(),
            LogLevel::Info
        );
    }

    #[test]
    fn test_unknown_nodes_are_skipped() {
        let config = config();
        assert_eq!(
            config.effective_level(&id("m", Some("zz"), Some("/p"))).unwrap(),
            LogLevel::Warn
        );
    }

    #[test]
    fn test_transport_selection_normalized() {
        let config = config();
        assert_eq!(
            config.effective_transport_selection(&id("m", Some("y"), Some("/p"))),
            vec!["json".to_string(), "console".to_string()]
        );
        assert_eq!(
            config.effective_transport_selection(&id("m", Some("x"), None)),
            vec!["console".to_string()]
        );
    }

    #[test]
    fn test_show_sensitive_fallback() {
        let config = config();
        assert!(config.effective_show_sensitive(&id("m", Some("y"), Some("/q"))));
        assert!(!config.effective_show_sensitive(&id("m", Some("y"), Some("/p"))));
        assert_eq!(
            config.resolve_property(ConfigProperty::ShowSensitive, &id("m", None, None)),
            None
        );
    }

    #[test]
    fn test_resolve_property() {
        let config = config();
        assert_eq!(
            config.resolve_property(ConfigProperty::Level, &id("m", Some("x"), None)),
            Some(PropertyValue::Level("warn"))
        );
        assert!(matches!(
            config.resolve_property(ConfigProperty::Transport, &id("m", None, None)),
            Some(PropertyValue::Transport(TransportSelection::One(name))) if name == "console"
        ));
    }

    #[test]
    fn test_invalid_level_name() {
        let mut config = config();
        config.defaults.level = Some("loud".into());
        let err = config.effective_level(&id("zzz", None, None)).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel { .. }));
    }
}
