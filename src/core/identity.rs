//! Logger identity: the module/method/path triple that scopes a logger
//!
//! An identity is immutable once built. Its [`key`](LoggerIdentity::key) is a
//! stable JSON object with the set fields in module, method, path order and no
//! whitespace, so equal identities always produce equal keys.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct LoggerIdentity {
    module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Deserialize)]
struct RawIdentity {
    module: Option<String>,
    method: Option<String>,
    path: Option<String>,
}

impl TryFrom<RawIdentity> for LoggerIdentity {
    type Error = LoggerError;

    fn try_from(raw: RawIdentity) -> Result<Self> {
        LoggerIdentity::new(
            raw.module.unwrap_or_default(),
            raw.method.as_deref(),
            raw.path.as_deref(),
        )
    }
}

impl LoggerIdentity {
    /// Build an identity. Empty method/path strings count as absent.
    ///
    /// A path requires a method, and a method requires a module.
    pub fn new(module: impl Into<String>, method: Option<&str>, path: Option<&str>) -> Result<Self> {
        let module = module.into();
        let method = method.filter(|m| !m.is_empty()).map(str::to_string);
        let path = path.filter(|p| !p.is_empty()).map(str::to_string);

        if path.is_some() && (method.is_none() || module.is_empty()) {
            return Err(LoggerError::identity("Path requires method and module"));
        }
        if method.is_some() && module.is_empty() {
            return Err(LoggerError::identity("Method requires module"));
        }
        if module.is_empty() {
            return Err(LoggerError::identity("Module name must not be empty"));
        }

        Ok(Self {
            module,
            method,
            path,
        })
    }

    pub fn module_only(module: impl Into<String>) -> Result<Self> {
        Self::new(module, None, None)
    }

    /// Parse an identity back from its [`key`](Self::key)
    pub fn from_key(key: &str) -> Result<Self> {
        Ok(serde_json::from_str(key)?)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Path-bearing identities are rendered in the HTTP style
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Stable, order-preserving serialization used as a cache key
    pub fn key(&self) -> String {
        // Serializing a struct of strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for LoggerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        if let Some(method) = &self.method {
            write!(f, ".{}", method)?;
        }
        if let Some(path) = &self.path {
            write!(f, " {}", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_ordered_and_compact() {
        let id = LoggerIdentity::new("http", Some("GET"), Some("/users")).unwrap();
        assert_eq!(id.key(), r#"{"module":"http","method":"GET","path":"/users"}"#);

        let id = LoggerIdentity::module_only("db").unwrap();
        assert_eq!(id.key(), r#"{"module":"db"}"#);
    }

    #[test]
    fn test_key_escapes_quotes() {
        let id = LoggerIdentity::new("we\"ird", Some("a&b"), None).unwrap();
        let back = LoggerIdentity::from_key(&id.key()).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_key_roundtrip() {
        let id = LoggerIdentity::new("auth", Some("login"), None).unwrap();
        assert_eq!(LoggerIdentity::from_key(&id.key()).unwrap(), id);
    }

    #[test]
    fn test_hierarchy_invariants() {
        assert!(LoggerIdentity::new("", Some("x"), None).is_err());
        assert!(LoggerIdentity::new("m", None, Some("/p")).is_err());
        assert!(LoggerIdentity::new("", None, None).is_err());
        assert!(LoggerIdentity::from_key(r#"{"method":"x"}"#).is_err());
    }

    #[test]
    fn test_empty_parts_are_absent() {
        let id = LoggerIdentity::new("m", Some(""), Some("")).unwrap();
        assert_eq!(id.method(), None);
        assert_eq!(id.path(), None);
    }

    #[test]
    fn test_display() {
        let id = LoggerIdentity::new("api", Some("POST"), Some("/login")).unwrap();
        assert_eq!(id.to_string(), "api.POST /login");
        let id = LoggerIdentity::new("api", Some("start"), None).unwrap();
        assert_eq!(id.to_string(), "api.start");
    }
}
