//! Name and value patterns for field roles

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Names treated as dates whatever their value looks like
const KNOWN_DATE_NAMES: &[&str] = &[
    "date",
    "datetime",
    "timestamp",
    "time",
    "day",
    "created_at",
    "updated_at",
    "createdat",
    "updatedat",
    "occurred_at",
    "occurredat",
];

const DATE_NAME: &str = r"(?i:date|time|day|week|month|year|period|bucket)|(?i:_at)$|[a-z]At$";
const ID_NAME: &str = r"(?i:^id$|^uuid$|_id$)|[a-z0-9]Id$";
const TYPE_NAME: &str = r"(?i)type|kind|category|status|event_type|event";
const DESCRIPTION_NAME: &str = r"(?i)description|message|text|summary|content";
const ACTOR_NAME: &str = r"(?i:actor|user|author|created_by|(^|_)by$)|[a-z]By$";

/// Earliest and latest year accepted as a plausible date
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1970..=2100;

/// Epoch bounds (seconds) for numeric timestamps: 2001-09-09 to 2100-01-01
const EPOCH_SECONDS: std::ops::RangeInclusive<i64> = 1_000_000_000..=4_102_444_800;

/// A named field pattern
pub struct NamePattern {
    regex: OnceLock<Regex>,
    source: &'static str,
}

impl NamePattern {
    const fn new(source: &'static str) -> Self {
        Self {
            regex: OnceLock::new(),
            source,
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex
            .get_or_init(|| {
                // Every pattern here is a literal in this file
                Regex::new(self.source)
                    .unwrap_or_else(|e| panic!("invalid built-in pattern {}: {e}", self.source))
            })
            .is_match(name)
    }
}

pub static DATE_FIELD: NamePattern = NamePattern::new(DATE_NAME);
pub static ID_FIELD: NamePattern = NamePattern::new(ID_NAME);
pub static TYPE_FIELD: NamePattern = NamePattern::new(TYPE_NAME);
pub static DESCRIPTION_FIELD: NamePattern = NamePattern::new(DESCRIPTION_NAME);
pub static ACTOR_FIELD: NamePattern = NamePattern::new(ACTOR_NAME);

pub fn is_known_date_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    KNOWN_DATE_NAMES.contains(&lower.as_str())
}

/// Date-like name with a plausible date value, or a known date name
pub fn is_date_field(name: &str, sample: Option<&Value>) -> bool {
    if is_known_date_name(name) {
        return true;
    }
    DATE_FIELD.is_match(name) && sample.map(is_plausible_date).unwrap_or(false)
}

/// Identifier names holding scalar values
pub fn is_id_field(name: &str, sample: Option<&Value>) -> bool {
    ID_FIELD.is_match(name) && sample.map(|v| v.is_string() || v.is_number()).unwrap_or(true)
}

/// Exact `id`/`uuid` names outrank suffix matches, even when a foreign key
/// such as `order_id` comes first in field order
pub fn id_rank(name: &str) -> u8 {
    if name.eq_ignore_ascii_case("id") || name.eq_ignore_ascii_case("uuid") {
        0
    } else {
        1
    }
}

/// Categorical names holding strings, flags or integer codes
pub fn is_type_field(name: &str, sample: Option<&Value>) -> bool {
    TYPE_FIELD.is_match(name)
        && sample
            .map(|v| v.is_string() || v.is_boolean() || v.is_i64() || v.is_u64())
            .unwrap_or(true)
}

/// Free-text names holding strings
pub fn is_description_field(name: &str, sample: Option<&Value>) -> bool {
    DESCRIPTION_FIELD.is_match(name) && sample.map(Value::is_string).unwrap_or(true)
}

/// Actor names holding a name or a nested user object
pub fn is_actor_field(name: &str, sample: Option<&Value>) -> bool {
    ACTOR_FIELD.is_match(name) && sample.map(|v| v.is_string() || v.is_object()).unwrap_or(true)
}

/// Whether a value looks like a point in time
pub fn is_plausible_date(value: &Value) -> bool {
    match value {
        Value::String(text) => parse_date(text)
            .map(|date| YEAR_RANGE.contains(&date.year()))
            .unwrap_or(false),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .map(|n| EPOCH_SECONDS.contains(&n) || EPOCH_SECONDS.contains(&(n / 1000)))
            .unwrap_or(false),
        _ => false,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.date());
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(parsed);
    }
    // Month buckets such as `2024-03`
    NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_fields() {
        let iso = json!("2024-01-01T00:00:00Z");
        assert!(is_date_field("created_at", None));
        assert!(is_date_field("Timestamp", None));
        assert!(is_date_field("shippedAt", Some(&iso)));
        assert!(is_date_field("last_login_time", Some(&json!("2023-06-30 12:00:00"))));
        assert!(is_date_field("month", Some(&json!("2024-03"))));
        assert!(is_date_field("bucket", Some(&json!(1_700_000_000))));
        assert!(is_date_field("event_time", Some(&json!(1_700_000_000_000i64))));
        assert!(!is_date_field("shippedAt", Some(&json!("soon"))));
        assert!(!is_date_field("runtime", Some(&json!(12))));
        assert!(!is_date_field("name", Some(&iso)));
    }

    #[test]
    fn test_id_fields() {
        assert!(is_id_field("id", Some(&json!("1"))));
        assert!(is_id_field("ID", Some(&json!(1))));
        assert!(is_id_field("uuid", None));
        assert!(is_id_field("user_id", Some(&json!(7))));
        assert!(is_id_field("orderId", Some(&json!("o-1"))));
        assert!(!is_id_field("paid", Some(&json!(true))));
        assert!(!is_id_field("valid", Some(&json!("yes"))));
        assert!(!is_id_field("id", Some(&json!({"nested": true}))));
        assert_eq!(id_rank("id"), 0);
        assert_eq!(id_rank("user_id"), 1);
    }

    #[test]
    fn test_type_description_actor_fields() {
        assert!(is_type_field("status", Some(&json!("active"))));
        assert!(is_type_field("EventType", Some(&json!("login"))));
        assert!(is_type_field("status", Some(&json!(404))));
        assert!(!is_type_field("event_rate", Some(&json!(0.25))));
        assert!(!is_type_field("status", Some(&json!({"code": 200}))));

        assert!(is_description_field("message", Some(&json!("hello"))));
        assert!(!is_description_field("content_length", Some(&json!(120))));

        assert!(is_actor_field("created_by", Some(&json!("ana"))));
        assert!(is_actor_field("createdBy", Some(&json!("ana"))));
        assert!(is_actor_field("user", Some(&json!({"name": "ana"}))));
        assert!(is_actor_field("by", Some(&json!("ana"))));
        assert!(!is_actor_field("hobby", Some(&json!("chess"))));
        assert!(!is_actor_field("user_count", Some(&json!(3))));
    }

    #[test]
    fn test_plausible_dates() {
        assert!(is_plausible_date(&json!("2024-02-29")));
        assert!(is_plausible_date(&json!("2024-01-01T10:00:00+02:00")));
        assert!(!is_plausible_date(&json!("1850-01-01")));
        assert!(!is_plausible_date(&json!("2024-13-01")));
        assert!(!is_plausible_date(&json!(42)));
        assert!(!is_plausible_date(&json!(true)));
    }
}
