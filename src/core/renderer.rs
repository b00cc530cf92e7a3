//! Renders a token stream into one output line for one transport
//!
//! Rendering applies the transport's redaction policy and level ceiling,
//! then assembles the line in the transport's format. The token stream is
//! shared by every transport of an emission, so rendering never mutates it.

use super::error::Result;
use super::identity::LoggerIdentity;
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use super::timestamp::TimestampFormat;
use super::token::{Pragma, Token, TokenWarning};
use super::transport::Transport;
use chrono::{DateTime, Utc};
use colored::Color;
use serde::Serialize;

/// Placeholder that stands in for a hidden region
pub const REDACTED_PLACEHOLDER: &str = "[redacted]";

/// Result of rendering for one transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// `None` when the transport suppresses the message
    pub line: Option<String>,
    pub warnings: Vec<String>,
}

impl Rendered {
    fn suppressed(warnings: Vec<String>) -> Self {
        Self {
            line: None,
            warnings,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.line.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    Text,
    Boolean,
    Number,
    Nil,
    Symbol,
    Function,
    Unsupported,
    Placeholder,
}

impl PieceKind {
    fn color(self) -> Option<Color> {
        match self {
            PieceKind::Boolean | PieceKind::Number => Some(Color::Yellow),
            PieceKind::Nil | PieceKind::Symbol => Some(Color::Blue),
            PieceKind::Function | PieceKind::Unsupported => Some(Color::Magenta),
            PieceKind::Placeholder => Some(Color::BrightBlack),
            PieceKind::Text => None,
        }
    }

    fn underlined(self) -> bool {
        matches!(self, PieceKind::Number | PieceKind::Function)
    }
}

/// One rendered fragment of the message body
#[derive(Debug)]
struct Piece {
    text: String,
    kind: PieceKind,
    /// Revealed content from a redaction region
    sensitive: bool,
}

/// Message body after the redaction policy has been applied
struct Body {
    pieces: Vec<Piece>,
    warnings: Vec<String>,
}

impl Body {
    fn plain(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    level: &'a str,
    timestamp: String,
    module: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    message: String,
}

/// Stateless line renderer
///
/// # Examples
///
/// ```
/// use rust_redacting_logger::core::{
///     tokenize, LogArg, LogLevel, LoggerIdentity, OutputFormat, Renderer, TransportKind,
///     TransportRegistry, TransportSpec,
/// };
///
/// let mut registry = TransportRegistry::new();
/// let transport = registry
///     .build(&TransportSpec::new("plain", TransportKind::Console)
///         .with_format(OutputFormat::Text)
///         .into())
///     .unwrap();
/// let identity = LoggerIdentity::module_only("auth").unwrap();
/// let tokens = tokenize("user %<%s%> logged in", &[LogArg::from("alice")]);
///
/// let rendered = Renderer::new().render(&identity, LogLevel::Info, transport, &tokens).unwrap();
/// assert_eq!(rendered.line.unwrap(), "[   info]R auth - user [redacted] logged in");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    timestamp_format: TimestampFormat,
    emphasis_threshold: LogLevel,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Millis,
            emphasis_threshold: LogLevel::Debug,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp layout for JSON lines
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Level from which ANSI message text is dimmed
    #[must_use]
    pub fn with_emphasis_threshold(mut self, level: LogLevel) -> Self {
        self.emphasis_threshold = level;
        self
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    pub fn emphasis_threshold(&self) -> LogLevel {
        self.emphasis_threshold
    }

    pub fn render(
        &self,
        identity: &LoggerIdentity,
        level: LogLevel,
        transport: &Transport,
        tokens: &[Token],
    ) -> Result<Rendered> {
        self.render_at(identity, level, transport, tokens, Utc::now())
    }

    /// Render with an explicit timestamp
    pub fn render_at(
        &self,
        identity: &LoggerIdentity,
        level: LogLevel,
        transport: &Transport,
        tokens: &[Token],
        now: DateTime<Utc>,
    ) -> Result<Rendered> {
        let Some(format) = transport.format() else {
            return Ok(Rendered::default());
        };
        if !transport.accepts(level) {
            return Ok(Rendered::default());
        }

        let Some(body) = apply_redaction(tokens, transport.show_sensitive()) else {
            return Ok(Rendered::suppressed(Vec::new()));
        };
        let redactable = tokens.iter().any(Token::is_pragma);

        let line = match format {
            OutputFormat::Text => render_text(identity, level, redactable, &body),
            OutputFormat::AnsiText => self.render_ansi(identity, level, &body),
            OutputFormat::Json => {
                let line = JsonLine {
                    level: level.to_str(),
                    timestamp: self.timestamp_format.format(&now),
                    module: identity.module(),
                    method: identity.method(),
                    path: identity.path(),
                    message: body.plain(),
                };
                serde_json::to_string(&line)?
            }
        };

        Ok(Rendered {
            line: Some(line),
            warnings: body.warnings,
        })
    }

    fn render_ansi(&self, identity: &LoggerIdentity, level: LogLevel, body: &Body) -> String {
        let mut line = String::from(level.ansi_prefix());
        line.push(' ');

        let label = identity_label(identity);
        if identity.has_path() {
            paint(&mut line, &label, Some(Color::BrightGreen), false);
            paint(&mut line, " -", Some(Color::BrightWhite), false);
        } else {
            paint(&mut line, &label, Some(Color::BrightBlue), false);
            paint(&mut line, ":", Some(Color::BrightWhite), false);
        }
        line.push(' ');

        let dim = if level.rank() > self.emphasis_threshold.rank() {
            Some(Color::BrightBlack)
        } else if level == self.emphasis_threshold {
            Some(Color::White)
        } else {
            None
        };

        for piece in &body.pieces {
            paint(
                &mut line,
                &sanitize(&piece.text),
                piece.kind.color().or(dim),
                piece.kind.underlined() || piece.sensitive,
            );
        }
        line
    }
}

/// Append `text` wrapped in SGR codes
///
/// The codes are written out directly: an `ansi-text` line must carry the
/// same bytes whether or not the process has a terminal attached.
fn paint(out: &mut String, text: &str, color: Option<Color>, underline: bool) {
    if color.is_none() && !underline {
        out.push_str(text);
        return;
    }
    out.push_str("\x1b[");
    if underline {
        out.push('4');
        if color.is_some() {
            out.push(';');
        }
    }
    if let Some(color) = color {
        out.push_str(&color.to_fg_str());
    }
    out.push('m');
    out.push_str(text);
    out.push_str("\x1b[0m");
}

/// `module.method path` when a path is present, `module.method` otherwise
fn identity_label(identity: &LoggerIdentity) -> String {
    let mut label = identity.module().to_string();
    if let Some(method) = identity.method() {
        label.push('.');
        label.push_str(method);
    }
    if let Some(path) = identity.path() {
        label.push(' ');
        label.push_str(path);
    }
    label
}

fn render_text(identity: &LoggerIdentity, level: LogLevel, redactable: bool, body: &Body) -> String {
    let marker = if redactable { 'R' } else { ' ' };
    let ident = match (identity.method(), identity.path()) {
        (Some(method), Some(path)) => format!("{} {} {}", identity.module(), method, path),
        (None, Some(path)) => format!("{} {}", identity.module(), path),
        (Some(method), None) => format!("{}.{}", identity.module(), method),
        (None, None) => identity.module().to_string(),
    };
    format!(
        "{}{} {} - {}",
        level.text_prefix(),
        marker,
        ident,
        sanitize(&body.plain())
    )
}

/// Escape control characters so one emission stays on one line
fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn warn(warnings: &mut Vec<String>, message: String) {
    if !warnings.contains(&message) {
        warnings.push(message);
    }
}

/// Walk the tokens under a redaction policy
///
/// Returns `None` when the whole line is sensitive and may not be shown.
fn apply_redaction(tokens: &[Token], show_sensitive: bool) -> Option<Body> {
    let mut pieces = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut redacting = false;

    for token in tokens {
        let (text, kind) = match token {
            Token::Pragma(Pragma::RedactAll) => {
                if !show_sensitive {
                    return None;
                }
                redacting = true;
                continue;
            }
            Token::Pragma(Pragma::RedactStart) | Token::Pragma(Pragma::RedactRemainder) => {
                if !show_sensitive && !redacting {
                    pieces.push(Piece {
                        text: REDACTED_PLACEHOLDER.to_string(),
                        kind: PieceKind::Placeholder,
                        sensitive: false,
                    });
                }
                redacting = true;
                continue;
            }
            Token::Pragma(Pragma::RedactEnd) => {
                redacting = false;
                continue;
            }
            Token::Warning(warning) => {
                warn(&mut warnings, warning.to_string());
                continue;
            }
            Token::String(s) => (s.clone(), PieceKind::Text),
            Token::Boolean(b) => (b.to_string(), PieceKind::Boolean),
            Token::Number(n) => (n.to_string(), PieceKind::Number),
            Token::Nil => ("null".to_string(), PieceKind::Nil),
            Token::Symbol(name) => (format!("Symbol({})", name), PieceKind::Symbol),
            Token::Function(Some(name)) => (format!("[function {}]", name), PieceKind::Function),
            Token::Function(None) => ("[anonymous function]".to_string(), PieceKind::Function),
            Token::Unsupported(type_name) => {
                warn(
                    &mut warnings,
                    TokenWarning::UnsupportedType(type_name.clone()).to_string(),
                );
                ("[unsupported type]".to_string(), PieceKind::Unsupported)
            }
        };

        if redacting && !show_sensitive {
            continue;
        }
        pieces.push(Piece {
            text,
            kind,
            sensitive: redacting,
        });
    }

    Some(Body { pieces, warnings })
}
