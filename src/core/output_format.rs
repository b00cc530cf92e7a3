//! Output formats a transport can render to
//!
//! - `text`: plain, fixed-width level tag
//! - `ansi-text`: colored for terminals
//! - `json`: one JSON object per line

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Example: `[   info]  api.start - listening on 8080`
    #[serde(rename = "text")]
    Text,

    /// Same layout as `Text` with ANSI colors (default, console-oriented)
    #[default]
    #[serde(rename = "ansi-text")]
    AnsiText,

    /// Example: `{"level":"info","timestamp":"2025-01-08T10:30:45.123Z","module":"api","message":"listening"}`
    #[serde(rename = "json")]
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Text, OutputFormat::AnsiText, OutputFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::AnsiText => "ansi-text",
            OutputFormat::Json => "json",
        }
    }

    pub fn valid_names() -> String {
        Self::ALL.map(|f| f.as_str()).join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "ansi-text" => Ok(OutputFormat::AnsiText),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: '{}'. Acceptable values: {}",
                s,
                Self::valid_names()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::AnsiText);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::AnsiText).unwrap(),
            "\"ansi-text\""
        );
    }
}
