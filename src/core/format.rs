//! Format pipeline: turns a level and a payload into a line of text
//!
//! A [`LogFormat`] produces a [`FormattedRecord`]: a template with `{}`
//! placeholders, the positional values that fill them, and a veto flag.
//! The default pipeline renders
//!
//! ```text
//! [<LEVEL>] <timestamp> | <text> | \n
//! [<LEVEL>] <timestamp> | <f1> | <f2> | ... | \n
//! ```
//!
//! with the level name highlighted and color-suffixed fields (`"404-r"`)
//! painted.

use super::log_level::LogLevel;
use super::timestamp::{format_timestamp, system_clock, Clock};
use std::any::Any;
use std::fmt;
use std::fmt::Write as _;

/// Placeholder substituted by [`FormattedRecord::render`].
pub const PLACEHOLDER: &str = "{}";

const CSI: &str = "\x1b[";
const RESET: &str = "\x1b[0m";

/// Wrap `text` in the SGR sequence `code` followed by a reset.
#[must_use]
pub fn paint(code: &str, text: &str) -> String {
    format!("{CSI}{code}m{text}{RESET}")
}

/// What a caller hands to an emission call.
pub enum Payload {
    /// A single line of text.
    Text(String),
    /// Ordered fields, each optionally ending in a color suffix.
    Fields(Vec<String>),
    /// Anything else. The default pipeline does not render it; a custom
    /// [`LogFormat`] may downcast it.
    Other(Box<dyn Any + Send + Sync>),
}

impl Payload {
    /// Wrap an arbitrary value.
    pub fn other<T: Any + Send + Sync>(value: T) -> Self {
        Payload::Other(Box::new(value))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Payload::Other(_) => f.write_str("Other(..)"),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<&String> for Payload {
    fn from(text: &String) -> Self {
        Payload::Text(text.clone())
    }
}

impl From<Vec<String>> for Payload {
    fn from(fields: Vec<String>) -> Self {
        Payload::Fields(fields)
    }
}

impl From<Vec<&str>> for Payload {
    fn from(fields: Vec<&str>) -> Self {
        Payload::Fields(fields.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Payload {
    fn from(fields: &[&str]) -> Self {
        Payload::Fields(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl From<&[String]> for Payload {
    fn from(fields: &[String]) -> Self {
        Payload::Fields(fields.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Payload {
    fn from(fields: [&str; N]) -> Self {
        Payload::Fields(fields.iter().map(|f| f.to_string()).collect())
    }
}

/// Background colors selectable with a trailing `-r`, `-g`, `-b` or `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl FieldColor {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'r' => Some(FieldColor::Red),
            b'g' => Some(FieldColor::Green),
            b'b' => Some(FieldColor::Blue),
            b'y' => Some(FieldColor::Yellow),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FieldColor::Red => "41;97",
            FieldColor::Green => "42;97",
            FieldColor::Yellow => "43;97",
            FieldColor::Blue => "44;97",
        }
    }
}

/// Split a recognized color suffix off `field`.
///
/// ```
/// use rust_batch_logger::core::format::{split_color_suffix, FieldColor};
///
/// assert_eq!(split_color_suffix("GET-y"), ("GET", Some(FieldColor::Yellow)));
/// assert_eq!(split_color_suffix("GET"), ("GET", None));
/// assert_eq!(split_color_suffix("GET-x"), ("GET-x", None));
/// ```
#[must_use]
pub fn split_color_suffix(field: &str) -> (&str, Option<FieldColor>) {
    let bytes = field.as_bytes();
    if bytes.len() < 2 || bytes[bytes.len() - 2] != b'-' {
        return (field, None);
    }
    match FieldColor::from_tag(bytes[bytes.len() - 1]) {
        // both suffix bytes are ASCII, so the split lands on a char boundary
        Some(color) => (&field[..field.len() - 2], Some(color)),
        None => (field, None),
    }
}

/// Output of a [`LogFormat`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedRecord {
    /// Text with one [`PLACEHOLDER`] per value.
    pub template: String,
    /// Values in placeholder order.
    pub values: Vec<String>,
    /// `false` vetoes the record; nothing reaches the sink.
    pub should_emit: bool,
}

impl FormattedRecord {
    #[must_use]
    pub fn new(template: String, values: Vec<String>) -> Self {
        Self {
            template,
            values,
            should_emit: true,
        }
    }

    /// A record that must not be emitted.
    #[must_use]
    pub fn suppressed() -> Self {
        Self::default()
    }

    /// Substitute the values into the template, left to right.
    ///
    /// Surplus placeholders render empty; surplus values are ignored.
    #[must_use]
    pub fn render(&self) -> String {
        let capacity = self.template.len() + self.values.iter().map(String::len).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        let mut values = self.values.iter();
        let mut rest = self.template.as_str();

        while let Some(idx) = rest.find(PLACEHOLDER) {
            out.push_str(&rest[..idx]);
            if let Some(value) = values.next() {
                out.push_str(value);
            }
            rest = &rest[idx + PLACEHOLDER.len()..];
        }
        out.push_str(rest);
        out
    }
}

/// Pluggable formatter. Closures `Fn(LogLevel, &Payload) -> FormattedRecord`
/// implement it too.
pub trait LogFormat: Send + Sync {
    fn format(&self, level: LogLevel, payload: &Payload) -> FormattedRecord;
}

impl<F> LogFormat for F
where
    F: Fn(LogLevel, &Payload) -> FormattedRecord + Send + Sync,
{
    fn format(&self, level: LogLevel, payload: &Payload) -> FormattedRecord {
        self(level, payload)
    }
}

/// The built-in pipeline.
pub struct DefaultFormat {
    clock: Clock,
}

impl DefaultFormat {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: system_clock(),
        }
    }

    /// Use `clock` instead of the wall clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    fn header(level: LogLevel, template: &mut String) {
        // "[" CSI code "m{}" RESET "] {} | "
        let _ = write!(
            template,
            "[{CSI}{}m{PLACEHOLDER}{RESET}] {PLACEHOLDER} | ",
            level.color_code()
        );
    }
}

impl Default for DefaultFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormat for DefaultFormat {
    fn format(&self, level: LogLevel, payload: &Payload) -> FormattedRecord {
        let mut template = String::with_capacity(48);

        match payload {
            Payload::Text(text) => {
                Self::header(level, &mut template);
                template.push_str(PLACEHOLDER);
                template.push_str(" | \n");

                let values = vec![
                    level.padded_name().to_string(),
                    format_timestamp(&(self.clock)()),
                    text.clone(),
                ];
                FormattedRecord::new(template, values)
            }
            Payload::Fields(fields) => {
                Self::header(level, &mut template);

                let mut values = Vec::with_capacity(fields.len() + 2);
                values.push(level.padded_name().to_string());
                values.push(format_timestamp(&(self.clock)()));

                for field in fields {
                    let (text, color) = split_color_suffix(field);
                    match color {
                        Some(color) => {
                            let _ = write!(
                                template,
                                "{CSI}{}m{PLACEHOLDER}{RESET} | ",
                                color.code()
                            );
                        }
                        None => {
                            template.push_str(PLACEHOLDER);
                            template.push_str(" | ");
                        }
                    }
                    values.push(text.to_string());
                }
                template.push('\n');
                FormattedRecord::new(template, values)
            }
            Payload::Other(_) => FormattedRecord::suppressed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::fixed_clock;
    use chrono::{Local, TimeZone};

    fn fixed_format() -> DefaultFormat {
        let instant = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid local datetime");
        DefaultFormat::with_clock(fixed_clock(instant))
    }

    #[test]
    fn test_text_payload() {
        let payload = Payload::from("200 | ok! | 1ms | GET /x");
        let record = fixed_format().format(LogLevel::Info, &payload);
        assert!(record.should_emit);
        assert_eq!(
            record.render(),
            concat!(
                "[\x1b[42;97mINFO    \x1b[0m] 2025/01/08 - 10:30:45.0000 | ",
                "200 | ok! | 1ms | GET /x | \n"
            )
        );
    }

    #[test]
    fn test_fields_payload_with_colors() {
        let payload = Payload::from(["404-r", "NOT FOUND", "GET-y"]);
        let record = fixed_format().format(LogLevel::Error, &payload);
        assert_eq!(record.values.len(), 5);
        assert_eq!(record.values[2], "404");
        assert_eq!(record.values[4], "GET");
        assert_eq!(
            record.render(),
            "[\x1b[41;97mERROR   \x1b[0m] 2025/01/08 - 10:30:45.0000 | \
             \x1b[41;97m404\x1b[0m | NOT FOUND | \x1b[43;97mGET\x1b[0m | \n"
        );
    }

    #[test]
    fn test_empty_fields() {
        let record = fixed_format().format(LogLevel::Debug, &Payload::Fields(Vec::new()));
        assert_eq!(
            record.render(),
            "[\x1b[45;97mDEBUG   \x1b[0m] 2025/01/08 - 10:30:45.0000 | \n"
        );
    }

    #[test]
    fn test_unrecognized_payload_is_vetoed() {
        let record = DefaultFormat::new().format(LogLevel::Fatal, &Payload::other(42_u32));
        assert!(!record.should_emit);
        assert!(record.template.is_empty());
        assert!(record.values.is_empty());
    }

    #[test]
    fn test_color_suffix_rules() {
        assert_eq!(split_color_suffix("ok-g"), ("ok", Some(FieldColor::Green)));
        assert_eq!(split_color_suffix("-b"), ("", Some(FieldColor::Blue)));
        assert_eq!(split_color_suffix("r"), ("r", None));
        assert_eq!(split_color_suffix("a_r"), ("a_r", None));
        assert_eq!(split_color_suffix("héllo-é"), ("héllo-é", None));
    }

    #[test]
    fn test_render_placeholder_mismatch() {
        let record = FormattedRecord::new("{} and {} and {}".into(), vec!["a".into()]);
        assert_eq!(record.render(), "a and  and ");

        let record = FormattedRecord::new("{}".into(), vec!["a".into(), "b".into()]);
        assert_eq!(record.render(), "a");
    }

    #[test]
    fn test_value_braces_are_not_expanded() {
        let record = fixed_format().format(LogLevel::Info, &"literal {} here".into());
        assert!(record.render().contains("| literal {} here | "));
    }

    #[test]
    fn test_closure_format() {
        let format = |level: LogLevel, _payload: &Payload| {
            FormattedRecord::new("{}\n".into(), vec![level.to_string()])
        };
        assert_eq!(format.format(LogLevel::Warn, &"x".into()).render(), "WARN\n");
    }
}
