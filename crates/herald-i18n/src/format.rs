//! Positional template formatting
//!
//! Templates use 0-indexed placeholders: `{0}`, `{1:N0}`, `{2,-8}`,
//! `{3,6:F1}`. Literal braces are written `{{` and `}}`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing argument | `{2}` with two args | [`FormatError::MissingArgument`] |
//! | Malformed placeholder | `{x}`, `{0,}`, `{ {` | [`FormatError::MalformedPlaceholder`] |
//! | Stray brace | `}` alone, `{` never closed | [`FormatError::UnmatchedBrace`] |
//! | Specifier/type clash | `{0:D3}` with a float | [`FormatError::IncompatibleSpecifier`] |
//!
//! [`Formatter::render`] never fails: any of the above yields
//! [`Rendered::Degraded`] with the raw template and the joined arguments.
//!
//! Numeric output is culture-invariant (`,` grouping, `.` decimal point).

use crate::catalog::TemplateRecord;
use std::fmt::{self, Write as _};
use tracing::warn;

/// Separator between the raw text and the argument list in degraded output
pub const DEGRADED_SEPARATOR: &str = " - ";

/// Alignment widths at or above this are rejected as malformed
pub const MAX_ALIGNMENT: u32 = 1_000_000;

/// A positional argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Preformatted text, substituted verbatim
    Text(String),
    /// Integer value, eligible for numeric format specifiers
    Integer(i64),
    /// Floating point value, eligible for numeric format specifiers
    Float(f64),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! integer_arg {
    ($($ty:ty),+) => {$(
        impl From<$ty> for Arg {
            fn from(value: $ty) -> Self {
                Self::Integer(i64::from(value))
            }
        }
    )+};
}

integer_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values
///
/// ```
/// use herald_i18n::{args, Arg};
///
/// let args = args!["Alice", 3, 0.5];
/// assert_eq!(args[1], Arg::Integer(3));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($value)),+]
    };
}

/// Why a template could not be formatted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A placeholder refers past the end of the argument list
    #[error("placeholder {{{index}}} needs argument {index} but only {supplied} supplied")]
    MissingArgument {
        /// Placeholder index
        index: usize,
        /// Number of arguments given
        supplied: usize,
    },

    /// A placeholder body could not be parsed
    #[error("malformed placeholder at byte {position}")]
    MalformedPlaceholder {
        /// Byte offset of the opening brace
        position: usize,
    },

    /// A `{` without its `}` or a lone `}`
    #[error("unmatched brace at byte {position}")]
    UnmatchedBrace {
        /// Byte offset of the brace
        position: usize,
    },

    /// A numeric specifier applied to a value it cannot describe
    #[error("format specifier '{specifier}' cannot be applied to argument {index}")]
    IncompatibleSpecifier {
        /// Argument index
        index: usize,
        /// The specifier as written
        specifier: String,
    },
}

/// A parsed piece of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Text copied as-is
    Literal(&'t str),
    /// A positional placeholder
    Placeholder {
        /// 0-based argument index
        index: usize,
        /// Minimum width; negative pads on the right
        alignment: Option<i32>,
        /// Format specifier after `:`
        spec: Option<&'t str>,
    },
}

/// Iterator over the [`Segment`]s of a template
#[derive(Debug, Clone)]
pub struct Segments<'t> {
    template: &'t str,
    pos: usize,
    failed: bool,
}

/// Split a template into literal text and placeholders
pub fn segments(template: &str) -> Segments<'_> {
    Segments {
        template,
        pos: 0,
        failed: false,
    }
}

impl<'t> Segments<'t> {
    fn placeholder(&self, open: usize) -> Result<(Segment<'t>, usize), FormatError> {
        let body_start = open + 1;
        let close = self.template[body_start..]
            .find('}')
            .map(|offset| body_start + offset)
            .ok_or(FormatError::UnmatchedBrace { position: open })?;
        let body = &self.template[body_start..close];
        let malformed = FormatError::MalformedPlaceholder { position: open };

        if body.contains('{') {
            return Err(malformed);
        }

        let (head, spec) = match body.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (body, None),
        };
        let (index, alignment) = match head.split_once(',') {
            Some((index, alignment)) => {
                let alignment = alignment
                    .trim()
                    .parse::<i32>()
                    .ok()
                    .filter(|width| width.unsigned_abs() < MAX_ALIGNMENT)
                    .ok_or_else(|| malformed.clone())?;
                (index, Some(alignment))
            }
            None => (head, None),
        };
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| malformed.clone())?;

        Ok((
            Segment::Placeholder {
                index,
                alignment,
                spec,
            },
            close + 1,
        ))
    }
}

impl<'t> Iterator for Segments<'t> {
    type Item = Result<Segment<'t>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.template.len() {
            return None;
        }

        let bytes = self.template.as_bytes();
        let start = self.pos;

        match bytes[start] {
            b'{' if bytes.get(start + 1) == Some(&b'{') => {
                self.pos = start + 2;
                Some(Ok(Segment::Literal("{")))
            }
            b'}' if bytes.get(start + 1) == Some(&b'}') => {
                self.pos = start + 2;
                Some(Ok(Segment::Literal("}")))
            }
            b'{' => match self.placeholder(start) {
                Ok((segment, next)) => {
                    self.pos = next;
                    Some(Ok(segment))
                }
                Err(error) => {
                    self.failed = true;
                    Some(Err(error))
                }
            },
            b'}' => {
                self.failed = true;
                Some(Err(FormatError::UnmatchedBrace { position: start }))
            }
            _ => {
                let end = self.template[start..]
                    .find(['{', '}'])
                    .map_or(self.template.len(), |offset| start + offset);
                self.pos = end;
                Some(Ok(Segment::Literal(&self.template[start..end])))
            }
        }
    }
}

/// Number of arguments a template consumes (highest placeholder index + 1)
pub fn placeholder_arity(template: &str) -> Result<usize, FormatError> {
    let mut arity = 0;
    for segment in segments(template) {
        if let Segment::Placeholder { index, .. } = segment? {
            arity = arity.max(index + 1);
        }
    }
    Ok(arity)
}

/// Substitute `args` into `template`.
///
/// `hints` supplies a per-argument format specifier used when the placeholder
/// itself has none.
pub fn format_template(
    template: &str,
    args: &[Arg],
    hints: &[Option<String>],
) -> Result<String, FormatError> {
    if !template.contains(['{', '}']) {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len() + args.len() * 8);
    for segment in segments(template) {
        match segment? {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder {
                index,
                alignment,
                spec,
            } => {
                let arg = args.get(index).ok_or(FormatError::MissingArgument {
                    index,
                    supplied: args.len(),
                })?;
                let spec = spec.or_else(|| hints.get(index).and_then(Option::as_deref));
                let rendered = render_arg(arg, index, spec)?;
                push_aligned(&mut out, &rendered, alignment);
            }
        }
    }
    Ok(out)
}

/// Arguments joined by `", "`
pub fn join_args(args: &[Arg]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{arg}");
    }
    out
}

/// The visible fallback for a template that could not be formatted
pub fn degraded_text(template: &str, args: &[Arg]) -> String {
    format!("{template}{DEGRADED_SEPARATOR}{}", join_args(args))
}

/// Text shown when no locale has a template for `key`
pub fn raw_key_text(key: &str, args: &[Arg]) -> String {
    if args.is_empty() {
        key.to_string()
    } else {
        degraded_text(key, args)
    }
}

fn push_aligned(out: &mut String, text: &str, alignment: Option<i32>) {
    let Some(alignment) = alignment else {
        out.push_str(text);
        return;
    };
    let width = alignment.unsigned_abs() as usize;
    let len = text.chars().count();
    let padding = width.saturating_sub(len);
    if alignment >= 0 {
        out.extend(std::iter::repeat(' ').take(padding));
        out.push_str(text);
    } else {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(padding));
    }
}

fn render_arg(arg: &Arg, index: usize, spec: Option<&str>) -> Result<String, FormatError> {
    let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(arg.to_string());
    };
    let value = match arg {
        Arg::Text(text) => return Ok(text.clone()),
        Arg::Integer(_) | Arg::Float(_) => arg,
    };

    let mut chars = spec.chars();
    let kind = chars.next().map(|c| c.to_ascii_uppercase());
    let precision = chars.as_str();
    let precision = if precision.is_empty() {
        None
    } else {
        match precision.parse::<usize>() {
            Ok(p) if p <= 20 => Some(p),
            // custom (non-standard) format strings render plainly
            _ => return Ok(arg.to_string()),
        }
    };

    let incompatible = || FormatError::IncompatibleSpecifier {
        index,
        specifier: spec.to_string(),
    };

    let rendered = match (kind, value) {
        (Some('N'), Arg::Integer(v)) => {
            group_thousands(&format_fixed(*v as f64, precision.unwrap_or(2)))
        }
        (Some('N'), Arg::Float(v)) => group_thousands(&format_fixed(*v, precision.unwrap_or(2))),
        (Some('F'), Arg::Integer(v)) => format_fixed(*v as f64, precision.unwrap_or(2)),
        (Some('F'), Arg::Float(v)) => format_fixed(*v, precision.unwrap_or(2)),
        (Some('P'), Arg::Integer(v)) => {
            format!("{}%", format_fixed(*v as f64 * 100.0, precision.unwrap_or(2)))
        }
        (Some('P'), Arg::Float(v)) => {
            format!("{}%", format_fixed(v * 100.0, precision.unwrap_or(2)))
        }
        (Some('D'), Arg::Integer(v)) => {
            let width = precision.unwrap_or(0);
            if *v < 0 {
                format!("-{:0width$}", v.unsigned_abs())
            } else {
                format!("{v:0width$}")
            }
        }
        (Some('X'), Arg::Integer(v)) => {
            let width = precision.unwrap_or(0);
            if spec.starts_with('x') {
                format!("{v:0width$x}")
            } else {
                format!("{v:0width$X}")
            }
        }
        (Some('D' | 'X'), Arg::Float(_)) => return Err(incompatible()),
        _ => arg.to_string(),
    };
    Ok(rendered)
}

fn format_fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Outcome of rendering a template for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// All placeholders substituted
    Formatted(String),
    /// Substitution failed; `text` is the raw template plus the joined args
    Degraded {
        /// Visible fallback text
        text: String,
        /// What went wrong
        error: FormatError,
    },
}

impl Rendered {
    /// The displayable text
    pub fn as_str(&self) -> &str {
        match self {
            Self::Formatted(text) | Self::Degraded { text, .. } => text,
        }
    }

    /// Take the displayable text
    pub fn into_string(self) -> String {
        match self {
            Self::Formatted(text) | Self::Degraded { text, .. } => text,
        }
    }

    /// Whether formatting fell back to the degraded form
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of a record's two representations to format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The template as authored, color markup included
    Markup,
    /// The color-stripped template
    Plain,
}

/// Non-failing formatting entry points
#[derive(Debug)]
pub struct Formatter;

impl Formatter {
    /// Format a bare template, degrading instead of failing
    pub fn format(template: &str, args: &[Arg]) -> Rendered {
        Self::format_keyed("", template, args, &[])
    }

    /// Format one of a record's representations, degrading instead of failing
    pub fn render(key: &str, record: &TemplateRecord, args: &[Arg], variant: Variant) -> Rendered {
        let template = match variant {
            Variant::Markup => record.original(),
            Variant::Plain => record.text(),
        };
        Self::format_keyed(key, template, args, record.arg_formats())
    }

    fn format_keyed(key: &str, template: &str, args: &[Arg], hints: &[Option<String>]) -> Rendered {
        match format_template(template, args, hints) {
            Ok(text) => Rendered::Formatted(text),
            Err(error) => {
                warn!(
                    "Failed to format translation '{}' with {} argument(s): {}",
                    key,
                    args.len(),
                    error
                );
                Rendered::Degraded {
                    text: degraded_text(template, args),
                    error,
                }
            }
        }
    }
}
