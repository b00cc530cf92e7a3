//! Positional arguments passed to a log call
//!
//! The kind of every argument is decided once, at the call boundary, by the
//! `From` conversions below. The tokenizer only ever matches on the variant.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Numeric argument value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    pub const NAN: Number = Number::Float(f64::NAN);

    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Number::Int(i) => serde_json::Value::Number((*i).into()),
            Number::UInt(u) => serde_json::Value::Number((*u).into()),
            Number::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }

    fn from_text(text: &str) -> Number {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Number::Int(0);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Number::Int(i);
        }
        trimmed
            .parse::<f64>()
            .map(Number::Float)
            .unwrap_or(Number::NAN)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(x) if x.is_nan() => f.write_str("NaN"),
            Number::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Whole floats print without a fractional part
            Number::Float(x) if x.fract() == 0.0 && x.abs() < 1e21 => write!(f, "{:.0}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A positional log argument
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Nil,
    Bool(bool),
    Number(Number),
    Str(String),
    Symbol(String),
    /// A callable, with its name when it has one
    Function(Option<String>),
    /// Arrays and objects; `%s` renders them with a shallow inspection
    Structured(serde_json::Value),
    /// A value with no textual form, carrying its type name
    Unsupported(String),
}

impl LogArg {
    pub fn symbol(name: impl Into<String>) -> Self {
        LogArg::Symbol(name.into())
    }

    pub fn function(name: Option<&str>) -> Self {
        LogArg::Function(name.map(str::to_string))
    }

    /// Capture any `Display` value as its text
    pub fn display(value: impl fmt::Display) -> Self {
        LogArg::Str(value.to_string())
    }

    /// Capture any serializable value as structured data
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogArg::from(value),
            Err(_) => LogArg::Unsupported(std::any::type_name::<T>().to_string()),
        }
    }

    pub fn unsupported(type_name: impl Into<String>) -> Self {
        LogArg::Unsupported(type_name.into())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LogArg::Nil => "nil",
            LogArg::Bool(_) => "boolean",
            LogArg::Number(_) => "number",
            LogArg::Str(_) => "string",
            LogArg::Symbol(_) => "symbol",
            LogArg::Function(_) => "function",
            LogArg::Structured(_) => "object",
            LogArg::Unsupported(_) => "unsupported",
        }
    }

    /// Text substituted for `%s`
    pub fn to_display_string(&self) -> Cow<'_, str> {
        match self {
            LogArg::Str(s) => Cow::Borrowed(s),
            LogArg::Nil => Cow::Borrowed("null"),
            LogArg::Bool(b) => Cow::Owned(b.to_string()),
            LogArg::Number(n) => Cow::Owned(n.to_string()),
            LogArg::Symbol(s) => Cow::Owned(format!("Symbol({})", s)),
            LogArg::Function(Some(name)) => Cow::Owned(format!("[Function: {}]", name)),
            LogArg::Function(None) => Cow::Borrowed("[Function (anonymous)]"),
            LogArg::Structured(value) => Cow::Owned(inspect(value, 0)),
            LogArg::Unsupported(_) => Cow::Borrowed("[unsupported type]"),
        }
    }

    /// Value substituted for `%d`
    pub fn to_number(&self) -> Number {
        match self {
            LogArg::Number(n) => *n,
            LogArg::Bool(b) => Number::Int(i64::from(*b)),
            LogArg::Str(s) => Number::from_text(s),
            LogArg::Structured(serde_json::Value::Array(items)) if items.is_empty() => {
                Number::Int(0)
            }
            _ => Number::NAN,
        }
    }
}

/// Shallow structural rendering: containers nested deeper than `depth` are
/// collapsed to `[Array]` / `[Object]`.
fn inspect(value: &serde_json::Value, depth: usize) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if depth == 0 => s.clone(),
        Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(_) if depth > 0 => "[Array]".to_string(),
        Value::Object(_) if depth > 0 => "[Object]".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(|v| inspect(v, depth + 1)).collect();
            format!("[ {} ]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, inspect(v, depth + 1)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Str(s.to_string())
    }
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Str(s)
    }
}

impl From<&String> for LogArg {
    fn from(s: &String) -> Self {
        LogArg::Str(s.clone())
    }
}

impl From<Cow<'_, str>> for LogArg {
    fn from(s: Cow<'_, str>) -> Self {
        LogArg::Str(s.into_owned())
    }
}

impl From<char> for LogArg {
    fn from(c: char) -> Self {
        LogArg::Str(c.to_string())
    }
}

impl From<bool> for LogArg {
    fn from(b: bool) -> Self {
        LogArg::Bool(b)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(v: $t) -> Self {
                LogArg::Number(Number::Int(v as i64))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(v: $t) -> Self {
                LogArg::Number(Number::UInt(v as u64))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for LogArg {
    fn from(v: f32) -> Self {
        LogArg::Number(Number::Float(f64::from(v)))
    }
}

impl From<f64> for LogArg {
    fn from(v: f64) -> Self {
        LogArg::Number(Number::Float(v))
    }
}

impl From<Number> for LogArg {
    fn from(n: Number) -> Self {
        LogArg::Number(n)
    }
}

impl<T: Into<LogArg>> From<Option<T>> for LogArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogArg::Nil)
    }
}

impl From<serde_json::Value> for LogArg {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => LogArg::Nil,
            Value::Bool(b) => LogArg::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    LogArg::Number(Number::Int(i))
                } else if let Some(u) = n.as_u64() {
                    LogArg::Number(Number::UInt(u))
                } else {
                    LogArg::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => LogArg::Str(s),
            other => LogArg::Structured(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversions_pick_kind() {
        assert_eq!(LogArg::from("x"), LogArg::Str("x".into()));
        assert_eq!(LogArg::from(7u8), LogArg::Number(Number::UInt(7)));
        assert_eq!(LogArg::from(-3i32), LogArg::Number(Number::Int(-3)));
        assert_eq!(LogArg::from(None::<i32>), LogArg::Nil);
        assert_eq!(LogArg::from(Some(true)), LogArg::Bool(true));
        assert_eq!(LogArg::from(json!(null)), LogArg::Nil);
        assert!(matches!(LogArg::from(json!({"a": 1})), LogArg::Structured(_)));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Float(3.0).to_string(), "3");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
        assert_eq!(Number::NAN.to_string(), "NaN");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(LogArg::from(true).to_number().to_string(), "1");
        assert_eq!(LogArg::from(" 42 ").to_number().to_string(), "42");
        assert_eq!(LogArg::from("1.5").to_number().to_string(), "1.5");
        assert_eq!(LogArg::from("abc").to_number().to_string(), "NaN");
        assert_eq!(LogArg::Nil.to_number().to_string(), "NaN");
    }

    #[test]
    fn test_display_string() {
        assert_eq!(LogArg::symbol("id").to_display_string(), "Symbol(id)");
        assert_eq!(
            LogArg::function(Some("handler")).to_display_string(),
            "[Function: handler]"
        );
        assert_eq!(
            LogArg::function(None).to_display_string(),
            "[Function (anonymous)]"
        );
    }

    #[test]
    fn test_inspect_is_shallow() {
        let arg = LogArg::from(json!({"a": 1, "b": "x", "c": {"d": 2}, "e": [1]}));
        assert_eq!(
            arg.to_display_string(),
            "{ a: 1, b: 'x', c: [Object], e: [Array] }"
        );
        let arg = LogArg::from(json!([1, "two"]));
        assert_eq!(arg.to_display_string(), "[ 1, 'two' ]");
    }

    #[test]
    fn test_structured_from_serialize() {
        #[derive(Serialize)]
        struct User {
            id: u32,
        }
        let arg = LogArg::structured(&User { id: 9 });
        assert_eq!(arg.to_display_string(), "{ id: 9 }");
    }
}
