//! Coercion of raw values into declared kinds.
//!
//! Raw inputs arrive either as strings (path segments, query values, headers)
//! or as structured JSON (bodies). Each function here accepts both shapes and
//! returns `None` when the value cannot represent the target kind. Constraint
//! checks happen afterwards, in [`crate::validate`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::field::{FieldKind, StringFormat};

/// Strings accepted as `true` (case-insensitive, surrounding whitespace ignored).
pub const TRUTHY: &[&str] = &["true", "1", "yes", "on", "t", "y"];

/// Strings accepted as `false` (case-insensitive, surrounding whitespace ignored).
pub const FALSY: &[&str] = &["false", "0", "no", "off", "f", "n"];

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

// 2^63: the first float past i64::MAX.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < I64_UPPER {
        Some(f as i64)
    } else {
        None
    }
}

/// Coerces to an integer.
///
/// JSON integers pass; floats and numeric strings pass only when integral.
pub fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

/// Coerces to a finite float.
pub fn float(raw: &Value) -> Option<f64> {
    let f = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// Coerces to a boolean using [`TRUTHY`] / [`FALSY`]; JSON `0` and `1` also map.
pub fn boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            if TRUTHY.contains(&s.as_str()) {
                Some(true)
            } else if FALSY.contains(&s.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Coerces to text. Numbers are rendered to their decimal form.
pub fn string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether `text` has the given format.
pub fn matches_format(text: &str, format: StringFormat) -> bool {
    match format {
        StringFormat::Email => EMAIL_REGEX
            .as_ref()
            .is_some_and(|re| re.is_match(text)),
        StringFormat::Url => url::Url::parse(text).is_ok_and(|u| u.has_host()),
    }
}

/// Coerces to a JSON object. Strings holding a JSON object are parsed.
pub fn object(raw: &Value) -> Option<Cow<'_, Map<String, Value>>> {
    match raw {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            _ => None,
        },
        _ => None,
    }
}

/// Views a value as collection elements; a lone value is a one-element collection.
pub fn elements(raw: &Value) -> Cow<'_, [Value]> {
    match raw {
        Value::Array(items) => Cow::Borrowed(items.as_slice()),
        other => Cow::Owned(vec![other.clone()]),
    }
}

/// Coerces a non-null raw value to a scalar kind.
///
/// Returns `None` for a mismatch and for the composite kinds (object, list),
/// which the validator walks itself.
pub fn scalar(kind: &FieldKind, raw: &Value) -> Option<Value> {
    match kind {
        FieldKind::Integer => integer(raw).map(Value::from),
        FieldKind::Float => float(raw).map(Value::from),
        FieldKind::Boolean => boolean(raw).map(Value::Bool),
        FieldKind::String { format } => {
            let text = string(raw)?;
            match format {
                Some(fmt) if !matches_format(&text, *fmt) => None,
                _ => Some(Value::String(text)),
            }
        }
        // Membership is a constraint, not part of the type.
        FieldKind::Enum { .. } => string(raw).map(Value::String),
        FieldKind::Object { .. } | FieldKind::List { .. } => None,
    }
}

/// JSON type name of a value, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
