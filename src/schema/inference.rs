//! Type inference for scalar JSON values

use super::types::{SchemaType, TypeVar};
use crate::types::JsonValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?$").unwrap());

static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

/// Infer the type of a scalar value, widening against a prior type
///
/// Never fails. Objects and arrays are never leaves; if one is passed
/// anyway it is reported as `object`/`array`.
pub fn infer_type(value: &JsonValue, prior: Option<&TypeVar>) -> TypeVar {
    let inferred = infer_scalar(value);
    match prior {
        Some(prior) => widen(prior, &inferred, value),
        None => inferred,
    }
}

/// Infer the type of a value on its own
pub fn infer_scalar(value: &JsonValue) -> TypeVar {
    match value {
        JsonValue::Null => TypeVar::new(SchemaType::Null),
        JsonValue::Bool(_) => TypeVar::new(SchemaType::Boolean),
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                TypeVar::new(SchemaType::Integer)
            } else {
                TypeVar::new(SchemaType::Decimal)
            }
        }
        JsonValue::String(s) => infer_string(s),
        JsonValue::Array(_) => TypeVar::new(SchemaType::Array),
        JsonValue::Object(_) => TypeVar::new(SchemaType::Object),
    }
}

fn infer_string(s: &str) -> TypeVar {
    if is_date(s) {
        TypeVar::new(SchemaType::Date)
    } else if is_time(s) {
        TypeVar::new(SchemaType::Time)
    } else if is_datetime(s) {
        TypeVar::new(SchemaType::Datetime)
    } else {
        TypeVar::string(s.chars().count())
    }
}

/// Merge a newly inferred type into a prior one
///
/// - same type: kept, string lengths take the maximum
/// - one side `null`: the other side wins
/// - `integer` + `decimal`: `decimal`
/// - anything else: `string`, sized by the prior string length and the
///   textual length of `value`
pub fn widen(prior: &TypeVar, inferred: &TypeVar, value: &JsonValue) -> TypeVar {
    use SchemaType::{Decimal, Integer, Null};

    match (prior.schema_type, inferred.schema_type) {
        (a, b) if a == b => {
            if a == SchemaType::String {
                TypeVar::string(max_len(prior.length, inferred.length))
            } else {
                prior.clone()
            }
        }
        (Null, _) => inferred.clone(),
        (_, Null) => prior.clone(),
        (Integer, Decimal) | (Decimal, Integer) => TypeVar::new(Decimal),
        _ => {
            let prior_len = if prior.is(SchemaType::String) {
                prior.length
            } else {
                None
            };
            TypeVar::string(max_len(prior_len, Some(text_len(value))))
        }
    }
}

fn max_len(a: Option<usize>, b: Option<usize>) -> usize {
    a.unwrap_or(0).max(b.unwrap_or(0))
}

/// Length of the value as it would be stored in a text column
fn text_len(value: &JsonValue) -> usize {
    match value {
        JsonValue::Null => 0,
        JsonValue::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

// Format detection helpers

fn is_date(s: &str) -> bool {
    DATE_REGEX.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_time(s: &str) -> bool {
    TIME_REGEX.is_match(s) && NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
}

fn is_datetime(s: &str) -> bool {
    if !DATETIME_REGEX.is_match(s) {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}
