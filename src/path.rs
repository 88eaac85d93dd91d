//! Structural path resolution
//!
//! Literal, non-computational navigation into a JSON value. Segments are
//! separated by `.`, `\.` escapes a dot inside a key, `[n]` indexes arrays and
//! `["key"]` / `['key']` address keys containing any character. A numeric
//! segment indexes arrays and is an ordinary key on objects.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Dotted segment: array index when numeric, key otherwise
    Plain(String),
    /// Bracketed number, only valid on arrays
    Index(usize),
    /// Bracketed quoted key, only valid on objects
    Key(String),
}

/// Resolve `path` inside `value`, returning `None` when it does not exist.
///
/// An empty path resolves to the value itself. A path that cannot be parsed
/// never resolves.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse(path)?;
    segments
        .iter()
        .try_fold(value, |current, segment| step(current, segment))
}

/// Like [`resolve`] but reports absence as `Value::Null`
pub fn resolve_or_null(value: &Value, path: &str) -> Value {
    resolve(value, path).cloned().unwrap_or(Value::Null)
}

fn step<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), Segment::Plain(key)) | (Value::Object(map), Segment::Key(key)) => {
            map.get(key)
        }
        (Value::Array(items), Segment::Plain(raw)) => {
            let index = parse_index(raw)?;
            items.get(index)
        }
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

fn parse_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    // Set once a segment was closed by `]`, so a following `.` does not
    // produce an empty segment
    let mut after_bracket = false;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(chars.next()?);
                after_bracket = false;
            }
            '.' => {
                if current.is_empty() && !after_bracket {
                    return None;
                }
                if !current.is_empty() {
                    segments.push(Segment::Plain(std::mem::take(&mut current)));
                }
                after_bracket = false;
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Plain(std::mem::take(&mut current)));
                }
                segments.push(parse_bracket(&mut chars)?);
                after_bracket = true;
            }
            _ => {
                if after_bracket {
                    // `a[0]b` is not a path
                    return None;
                }
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        segments.push(Segment::Plain(current));
    } else if path.ends_with('.') && !path.ends_with("\\.") {
        return None;
    }

    Some(segments)
}

fn parse_bracket(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<Segment> {
    match chars.peek().copied()? {
        quote @ ('"' | '\'') => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next()? {
                    '\\' => key.push(chars.next()?),
                    c if c == quote => break,
                    c => key.push(c),
                }
            }
            (chars.next()? == ']').then_some(Segment::Key(key))
        }
        _ => {
            let mut digits = String::new();
            loop {
                match chars.next()? {
                    ']' => break,
                    c => digits.push(c),
                }
            }
            parse_index(digits.trim()).map(Segment::Index)
        }
    }
}
