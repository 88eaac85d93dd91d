//! Cell values and per-column type coercion
//!
//! Converting a raw JSON value to a column's declared type never fails in
//! permissive mode: text that does not parse becomes null. Strict mode reports
//! the same situations as [`FramerError::Coercion`].

use crate::error::{FramerError, Result};
use crate::types::{CoercionMode, ColumnSelector, ColumnType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[Tt ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?([Zz]|[+-]\d{2}:?\d{2})?$").unwrap()
});

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap()
});

static EPOCH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+(\.\d+)?$").unwrap()
});

/// One cell of a row, after projection and coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Time(DateTime<Utc>),
    /// Array or object kept as-is
    Nested(Value),
}

impl Cell {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Value::String(s) => Cell::String(s),
            nested @ (Value::Array(_) | Value::Object(_)) => Cell::Nested(nested),
        }
    }

    /// Back to a raw JSON value; timestamps become epoch milliseconds
    pub fn into_value(self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(b),
            Cell::Number(n) => number_value(n),
            Cell::String(s) => Value::String(s),
            Cell::Time(t) => Value::Number(t.timestamp_millis().into()),
            Cell::Nested(v) => v,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Canonical text of a scalar cell, `None` for null and nested cells
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Null | Cell::Nested(_) => None,
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::String(s) => Some(s.clone()),
            Cell::Time(t) => Some(format_time(t)),
        }
    }
}

/// Integral values print without a fraction, everything else as the shortest
/// text that round-trips
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number((n as i64).into())
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Convert `value` to the type declared by `column`
pub fn coerce(value: Value, column: &ColumnSelector, mode: CoercionMode) -> Result<Cell> {
    coerce_to(value, column.column_type, column.time_format.as_deref(), column.name(), mode)
}

pub fn coerce_to(
    value: Value,
    target: ColumnType,
    time_format: Option<&str>,
    column: &str,
    mode: CoercionMode,
) -> Result<Cell> {
    if target == ColumnType::Auto {
        return Ok(Cell::from_value(value));
    }

    let converted = match &value {
        Value::Null => return Ok(Cell::Null),
        // Nested values are left for the frame builder to reject
        Value::Array(_) | Value::Object(_) => return Ok(Cell::Nested(value)),
        _ => convert_scalar(&value, target, time_format),
    };

    match converted {
        Some(cell) => Ok(cell),
        None => match mode {
            CoercionMode::Permissive => {
                tracing::trace!(column, target = %target, "value not convertible, using null");
                Ok(Cell::Null)
            }
            CoercionMode::Strict => Err(FramerError::Coercion {
                column: column.to_string(),
                value: value.to_string(),
                target: target.to_string(),
            }),
        },
    }
}

/// Convert an already typed cell to `target`.
///
/// Timestamps keep their instant under every timestamp type, render as
/// RFC 3339 text for `string` and become epoch milliseconds for `number`.
pub fn coerce_cell(
    cell: Cell,
    target: ColumnType,
    time_format: Option<&str>,
    column: &str,
    mode: CoercionMode,
) -> Result<Cell> {
    match (cell, target) {
        (Cell::Time(t), ColumnType::String) => Ok(Cell::String(format_time(&t))),
        (Cell::Time(t), ColumnType::Number) => Ok(Cell::Number(t.timestamp_millis() as f64)),
        (Cell::Time(t), ColumnType::Boolean) => {
            coerce_to(Value::String(format_time(&t)), target, time_format, column, mode)
        }
        (Cell::Time(t), _) => Ok(Cell::Time(t)),
        (other, _) => coerce_to(other.into_value(), target, time_format, column, mode),
    }
}

fn convert_scalar(value: &Value, target: ColumnType, time_format: Option<&str>) -> Option<Cell> {
    match target {
        ColumnType::Auto => Some(Cell::from_value(value.clone())),
        ColumnType::String => match value {
            Value::String(s) => Some(Cell::String(s.clone())),
            Value::Number(n) => n.as_f64().map(|n| Cell::String(format_number(n))),
            Value::Bool(b) => Some(Cell::String(b.to_string())),
            _ => None,
        },
        ColumnType::Number => to_number(value).map(Cell::Number),
        ColumnType::Boolean => match value {
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => n.as_f64().map(|f| Cell::Bool(f != 0.0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Cell::Bool(true)),
                "false" | "0" => Some(Cell::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ColumnType::Timestamp => match (value, time_format.filter(|layout| !layout.is_empty())) {
            // Numbers such as 20220501 are read through the layout as text
            (Value::Number(n), Some(layout)) => n
                .as_f64()
                .and_then(|n| parse_with_layout(&format_number(n), layout)),
            (Value::Number(n), None) => n.as_f64().and_then(from_epoch_millis),
            (Value::String(s), Some(layout)) => parse_with_layout(s, layout),
            (Value::String(s), None) => parse_datetime(s),
            _ => None,
        }
        .map(Cell::Time),
        ColumnType::TimestampEpochMs => epoch_number(value).and_then(from_epoch_millis).map(Cell::Time),
        ColumnType::TimestampEpochS => epoch_number(value).and_then(from_epoch_seconds).map(Cell::Time),
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn epoch_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if EPOCH_REGEX.is_match(s.trim()) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let whole = ms.floor();
    let nanos = ((ms - whole) * 1_000_000.0).round() as i64;
    DateTime::from_timestamp_millis(whole as i64)
        .and_then(|t| t.checked_add_signed(chrono::Duration::nanoseconds(nanos)))
}

pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Parse common date-time text: RFC 3339, ISO date-times with a space
/// separator or without an offset (taken as UTC), bare dates and all-digit
/// epoch milliseconds
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if ISO_DATETIME_REGEX.is_match(text) {
        if let Ok(t) = DateTime::parse_from_rfc3339(text) {
            return Some(t.with_timezone(&Utc));
        }
        let normalized = text.replacen(' ', "T", 1);
        if let Ok(t) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(t.with_timezone(&Utc));
        }
        for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(t) = NaiveDateTime::parse_from_str(&normalized, layout) {
                return Some(t.and_utc());
            }
        }
        for layout in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"] {
            if let Ok(t) = DateTime::parse_from_str(&normalized, layout) {
                return Some(t.with_timezone(&Utc));
            }
        }
        return None;
    }

    if ISO_DATE_REGEX.is_match(text) {
        return NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| t.and_utc());
    }

    if EPOCH_REGEX.is_match(text) {
        return text.parse().ok().and_then(from_epoch_millis);
    }

    None
}

/// Parse `text` with an explicit layout. Layouts containing `%` are strftime
/// patterns, anything else is read as a Go reference layout
/// (`Mon Jan 2 15:04:05 MST 2006`).
pub fn parse_with_layout(text: &str, layout: &str) -> Option<DateTime<Utc>> {
    let format = if layout.contains('%') {
        layout.to_string()
    } else {
        translate_go_layout(layout)
    };
    let text = text.trim();

    if let Ok(t) = DateTime::parse_from_str(text, &format) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, &format) {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(text, &format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Go layout chunks, longest first where they share a prefix
const GO_LAYOUT_CHUNKS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Jan", "%b"),
    ("Monday", "%A"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("2006", "%Y"),
    ("002", "%j"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("_2", "%e"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("Z07:00", "%:z"),
    ("Z0700", "%z"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

pub fn translate_go_layout(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while !rest.is_empty() {
        // Fractional seconds: .000 / .999 / ,000 of any width
        if let Some(frac) = fractional_chunk(rest) {
            let digits = frac.len() - 1;
            if frac[1..].starts_with('9') {
                out.push_str("%.f");
            } else {
                match digits {
                    3 => out.push_str("%.3f"),
                    6 => out.push_str("%.6f"),
                    9 => out.push_str("%.9f"),
                    _ => out.push_str("%.f"),
                }
            }
            rest = &rest[frac.len()..];
            continue;
        }

        for (chunk, strftime) in GO_LAYOUT_CHUNKS {
            if rest.starts_with(chunk) {
                out.push_str(strftime);
                rest = &rest[chunk.len()..];
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }

    out
}

fn fractional_chunk(rest: &str) -> Option<&str> {
    let bytes = rest.as_bytes();
    if bytes.len() < 2 || !(bytes[0] == b'.' || bytes[0] == b',') {
        return None;
    }
    let digit = bytes[1];
    if digit != b'0' && digit != b'9' {
        return None;
    }
    let len = 1 + bytes[1..].iter().take_while(|b| **b == digit).count();
    // Go only treats the run as fractional seconds when no digit follows
    if bytes.get(len).is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(&rest[..len])
}
