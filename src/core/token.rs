//! Token vocabulary shared by the tokenizer and the renderer

use super::log_arg::Number;
use std::fmt;

/// Redaction markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pragma {
    /// The whole line is sensitive
    RedactAll,
    RedactStart,
    RedactEnd,
    /// Everything after this marker is sensitive
    RedactRemainder,
}

impl Pragma {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pragma::RedactAll => "redact-all",
            Pragma::RedactStart => "redact-start",
            Pragma::RedactEnd => "redact-end",
            Pragma::RedactRemainder => "redact-remainder",
        }
    }
}

impl fmt::Display for Pragma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal problems found while tokenizing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenWarning {
    UnclosedRedaction,
    NestedRedaction,
    CloseWithoutOpen,
    UnsupportedType(String),
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::UnclosedRedaction => f.write_str("Unclosed redaction"),
            TokenWarning::NestedRedaction => f.write_str("Nesting redaction"),
            TokenWarning::CloseWithoutOpen => {
                f.write_str("Closing redaction without opening redaction")
            }
            TokenWarning::UnsupportedType(name) => {
                write!(f, "Unsupported type in log data: {}", name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Pragma(Pragma),
    Boolean(bool),
    Number(Number),
    Nil,
    String(String),
    Symbol(String),
    Function(Option<String>),
    /// Value with no textual form, carrying its type name
    Unsupported(String),
    Warning(TokenWarning),
}

impl Token {
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    pub fn is_pragma(&self) -> bool {
        matches!(self, Token::Pragma(_))
    }
}

/// Whether a token stream marks any content as sensitive
pub fn has_redactables(tokens: &[Token]) -> bool {
    tokens.iter().any(Token::is_pragma)
}
