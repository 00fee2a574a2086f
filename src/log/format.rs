//! Template-driven event formatter

use chrono::Local;
use owo_colors::OwoColorize;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `time [ level ] target:line - message key=value, ...`
pub const DEFAULT_FORMAT: &str = "{time} [ {level} ] {target}:{line} - {message} {fields}";

/// One event, flattened for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub time: String,
    pub level: Level,
    pub target: String,
    pub line: Option<u32>,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Time,
    Level,
    Target,
    Line,
    Message,
    Fields,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "time" => Some(Self::Time),
            "level" => Some(Self::Level),
            "target" => Some(Self::Target),
            "line" => Some(Self::Line),
            "message" => Some(Self::Message),
            "fields" => Some(Self::Fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Value(Placeholder),
}

// Unknown `{...}` sequences are kept as literal text.
fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];
        let placeholder = tail
            .find('}')
            .and_then(|close| Placeholder::from_name(&tail[1..close]).map(|p| (p, close)));
        match placeholder {
            Some((p, close)) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Value(p));
                rest = &tail[close + 1..];
            }
            None => {
                text.push('{');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Fill `template` placeholders from `record`. Trailing whitespace is
/// trimmed so an empty `{fields}` leaves no dangling space.
///
/// Placeholders are found in the template only; braces inside the message
/// or field values are written as they are.
pub fn render(template: &str, record: &LogLine, colors: bool) -> String {
    render_segments(&parse(template), record, colors)
}

fn render_segments(segments: &[Segment], record: &LogLine, colors: bool) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Value(p) => push_value(&mut out, *p, record, colors),
        }
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_value(out: &mut String, placeholder: Placeholder, record: &LogLine, colors: bool) {
    let line = record.line.map(|l| l.to_string()).unwrap_or_default();
    let _ = match placeholder {
        Placeholder::Time if colors => write!(out, "{}", record.time.bright_black()),
        Placeholder::Time => write!(out, "{}", record.time),
        Placeholder::Level => {
            let level = format!("{:<5}", record.level.as_str());
            if colors {
                write!(out, "{}", paint_level(record.level, &level))
            } else {
                write!(out, "{}", level)
            }
        }
        Placeholder::Target if colors => write!(out, "{}", record.target.bright_blue()),
        Placeholder::Target => write!(out, "{}", record.target),
        Placeholder::Line if colors => write!(out, "{}", line.bright_blue()),
        Placeholder::Line => write!(out, "{}", line),
        Placeholder::Message => write!(out, "{}", record.message),
        Placeholder::Fields => {
            let fields = record
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            write!(out, "{}", fields)
        }
    };
}

fn paint_level(level: Level, text: &str) -> String {
    match level {
        Level::ERROR => text.red().bold().to_string(),
        Level::WARN => text.yellow().bold().to_string(),
        Level::INFO => text.green().to_string(),
        Level::DEBUG => text.blue().to_string(),
        Level::TRACE => text.magenta().to_string(),
    }
}

/// [`FormatEvent`] that renders events through [`render`].
#[derive(Debug, Clone)]
pub struct TemplateFormat {
    segments: Vec<Segment>,
    colors: bool,
}

impl TemplateFormat {
    pub fn new(template: &str, colors: bool) -> Self {
        Self {
            segments: parse(template),
            colors,
        }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let record = LogLine {
            time: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level: *meta.level(),
            target: visitor.log_target.unwrap_or_else(|| meta.target().to_string()),
            line: visitor.log_line.or(meta.line()),
            message: visitor.message,
            fields: visitor.fields,
        };
        writeln!(writer, "{}", render_segments(&self.segments, &record, self.colors))
    }
}

// Records bridged from the `log` crate carry their origin in `log.*` fields.
#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<(String, String)>,
    log_target: Option<String>,
    log_line: Option<u32>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.target" => self.log_target = Some(value.to_string()),
            name if name.starts_with("log.") => {}
            name => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "log.line" => self.log_line = u32::try_from(value).ok(),
            name if name.starts_with("log.") => {}
            name => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                self.message.clear();
                let _ = write!(self.message, "{:?}", value);
            }
            name if name.starts_with("log.") => {}
            name => self.fields.push((name.to_string(), format!("{:?}", value))),
        }
    }
}
