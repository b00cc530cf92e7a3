//! Format-string tokenizer
//!
//! Turns a printf-style template and its positional arguments into a token
//! stream. Supported specifiers:
//!
//! - `%<` opens a redacted region; as the first two characters it marks the
//!   whole line sensitive (`redact-all`), unless its matching `%>` ends the
//!   format, in which case the format is one ordinary region
//! - `%>` closes a redacted region; as the last two characters it marks
//!   everything after it, trailing arguments included, sensitive
//!   (`redact-remainder`)
//! - `%s` substitutes the next argument as text
//! - `%d` substitutes the next argument as a number
//! - `%%` is a literal `%`
//!
//! Anything else is copied verbatim. Arguments left over once the template is
//! exhausted become typed tokens of their own.

use super::log_arg::LogArg;
use super::token::{Pragma, Token, TokenWarning};

/// Redaction state while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Closed,
    /// Open region, with nesting depth
    Open(usize),
    /// `redact-all` fired; markers are ignored from here on
    All,
    /// `redact-remainder` fired
    Remainder,
}

struct TokenStream {
    tokens: Vec<Token>,
    text: String,
}

impl TokenStream {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            text: String::new(),
        }
    }

    /// Flush pending literal text as a string token
    fn roll(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::String(std::mem::take(&mut self.text)));
        }
    }

    fn pragma(&mut self, pragma: Pragma) {
        self.roll();
        self.tokens.push(Token::Pragma(pragma));
    }

    fn warn(&mut self, warning: TokenWarning) {
        self.tokens.push(Token::Warning(warning));
    }

    fn push_arg(&mut self, arg: &LogArg) {
        let token = match arg {
            LogArg::Nil => Token::Nil,
            LogArg::Bool(b) => Token::Boolean(*b),
            LogArg::Number(n) => Token::Number(*n),
            LogArg::Str(s) => Token::String(s.clone()),
            LogArg::Symbol(s) => Token::Symbol(s.clone()),
            LogArg::Function(name) => Token::Function(name.clone()),
            LogArg::Structured(_) | LogArg::Unsupported(_) => {
                let type_name = match arg {
                    LogArg::Unsupported(name) => name.clone(),
                    other => other.kind_name().to_string(),
                };
                self.tokens.push(Token::Unsupported(type_name.clone()));
                self.warn(TokenWarning::UnsupportedType(type_name));
                return;
            }
        };
        self.tokens.push(token);
    }
}

/// Tokenize `format` with positional `args`
///
/// # Examples
///
/// ```
/// use rust_redacting_logger::core::{tokenize, LogArg, Pragma, Token};
///
/// let tokens = tokenize("%<%s%>", &[LogArg::from("secret")]);
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Pragma(Pragma::RedactStart),
///         Token::string("secret"),
///         Token::Pragma(Pragma::RedactEnd),
///     ]
/// );
/// ```
pub fn tokenize(format: &str, args: &[LogArg]) -> Vec<Token> {
    let mut out = TokenStream::with_capacity(args.len() + 4);
    let mut args = args.iter();
    let mut region = Region::Closed;
    let enclosed = leading_region_spans_format(format);

    let mut chars = format.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '%' {
            out.text.push(c);
            continue;
        }
        let Some(&(spec_idx, spec)) = chars.peek() else {
            // Trailing lone '%'
            out.text.push('%');
            continue;
        };
        let at_start = idx == 0;
        let at_end = spec_idx + spec.len_utf8() == format.len();

        match spec {
            '<' => {
                chars.next();
                match region {
                    Region::Closed if at_start && !enclosed => {
                        out.pragma(Pragma::RedactAll);
                        region = Region::All;
                    }
                    Region::Closed => {
                        out.pragma(Pragma::RedactStart);
                        region = Region::Open(1);
                    }
                    Region::Open(depth) => {
                        out.warn(TokenWarning::NestedRedaction);
                        region = Region::Open(depth + 1);
                    }
                    Region::All | Region::Remainder => {}
                }
            }
            '>' => {
                chars.next();
                match region {
                    Region::All | Region::Remainder => {}
                    Region::Open(1) if at_end && enclosed => {
                        out.pragma(Pragma::RedactEnd);
                        region = Region::Closed;
                    }
                    Region::Open(_) if at_end => {
                        out.warn(TokenWarning::UnclosedRedaction);
                        out.pragma(Pragma::RedactRemainder);
                        region = Region::Remainder;
                    }
                    Region::Closed if at_end => {
                        out.pragma(Pragma::RedactRemainder);
                        region = Region::Remainder;
                    }
                    Region::Open(1) => {
                        out.pragma(Pragma::RedactEnd);
                        region = Region::Closed;
                    }
                    Region::Open(depth) => {
                        region = Region::Open(depth - 1);
                    }
                    Region::Closed => {
                        out.warn(TokenWarning::CloseWithoutOpen);
                    }
                }
            }
            's' => {
                chars.next();
                match args.next() {
                    Some(arg) => out.text.push_str(&arg.to_display_string()),
                    None => out.text.push_str("%s"),
                }
            }
            'd' => {
                chars.next();
                match args.next() {
                    Some(arg) => out.text.push_str(&arg.to_number().to_string()),
                    None => out.text.push_str("%d"),
                }
            }
            '%' => {
                chars.next();
                out.text.push('%');
            }
            _ => {
                // Unknown specifier: keep the '%' and let the next
                // character be copied on the following iteration.
                out.text.push('%');
            }
        }
    }

    out.roll();
    for arg in args {
        out.push_arg(arg);
    }

    if let Region::Open(_) = region {
        out.warn(TokenWarning::UnclosedRedaction);
        out.tokens.push(Token::Pragma(Pragma::RedactEnd));
    }

    out.tokens
}

/// Whether `format` opens with `%<` whose matching `%>` is its last two characters
fn leading_region_spans_format(format: &str) -> bool {
    let Some(rest) = format.strip_prefix("%<") else {
        return false;
    };
    let mut depth = 1usize;
    let mut chars = rest.char_indices();
    while let Some((_, c)) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.next() {
            Some((_, '<')) => depth += 1,
            Some((idx, '>')) => {
                depth -= 1;
                if depth == 0 {
                    return idx + 1 == rest.len();
                }
            }
            _ => {}
        }
    }
    false
}
