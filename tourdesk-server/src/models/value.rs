//! Column values and JSON coercion

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::ValidationError;
use crate::schema::FieldKind;

/// Output format for timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Float(f64),
    Integer(i64),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or empty text; neither can address a row by key.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Coerce a JSON body member into a value of column type `kind`.
    pub fn from_json(
        field: &'static str,
        kind: FieldKind,
        json: &JsonValue,
    ) -> Result<Self, ValidationError> {
        match (kind, json) {
            (_, JsonValue::Null) => Ok(Self::Null),

            (FieldKind::Text, JsonValue::String(s)) => Ok(Self::Text(s.clone())),
            (FieldKind::Text, JsonValue::Number(n)) => Ok(Self::Text(n.to_string())),
            (FieldKind::Text, JsonValue::Bool(b)) => Ok(Self::Text(b.to_string())),
            (FieldKind::Text, _) => Err(ValidationError::InvalidType {
                field,
                expected: "a string",
            }),

            (FieldKind::Float, JsonValue::Number(n)) => n
                .as_f64()
                .map(Self::Float)
                .ok_or(ValidationError::InvalidType { field, expected: "a number" }),
            (FieldKind::Integer, JsonValue::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_number))
                .map(Self::Integer)
                .ok_or(ValidationError::InvalidType { field, expected: "an integer" }),
            (FieldKind::Float | FieldKind::Integer | FieldKind::Timestamp, JsonValue::String(s)) => {
                Self::parse(field, kind, s)
            }
            (FieldKind::Float, _) => Err(ValidationError::InvalidType {
                field,
                expected: "a number",
            }),
            (FieldKind::Integer, _) => Err(ValidationError::InvalidType {
                field,
                expected: "an integer",
            }),
            (FieldKind::Timestamp, _) => Err(ValidationError::InvalidType {
                field,
                expected: "a date-time string",
            }),
        }
    }

    /// Parse a raw string (query parameter or string body member).
    pub fn parse(field: &'static str, kind: FieldKind, raw: &str) -> Result<Self, ValidationError> {
        match kind {
            FieldKind::Text => Ok(Self::Text(raw.to_owned())),
            FieldKind::Timestamp => parse_timestamp(raw)
                .map(Self::Timestamp)
                .ok_or(ValidationError::InvalidFormat {
                    field,
                    reason: "expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                }),
            FieldKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Self::Float)
                .ok_or(ValidationError::InvalidFormat {
                    field,
                    reason: "expected a number",
                }),
            FieldKind::Integer => {
                let raw = raw.trim();
                raw.parse::<i64>()
                    .ok()
                    .or_else(|| raw.parse::<f64>().ok().and_then(whole_number))
                    .map(Self::Integer)
                    .ok_or(ValidationError::InvalidFormat {
                        field,
                        reason: "expected an integer",
                    })
            }
        }
    }
}

fn whole_number(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// Parse the date and date-time spellings accepted in bodies and query strings.
///
/// Offsets are dropped; the wall-clock time is kept as written.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Timestamp(ts) => {
                serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Text(s) => write!(f, "{}", s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn timestamp_spellings() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 17)
            .unwrap()
            .and_hms_opt(14, 43, 22)
            .unwrap();
        assert_eq!(parse_timestamp("2025-02-17T14:43:22"), Some(expected));
        assert_eq!(parse_timestamp("2025-02-17 14:43:22"), Some(expected));
        assert_eq!(parse_timestamp("2025-02-17T14:43:22+08:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-02-20"), Some(midnight(2025, 2, 20)));
        assert_eq!(parse_timestamp("20/02/2025"), None);
    }

    #[test]
    fn numbers_coerce_into_text_columns() {
        let v = Value::from_json("職級", FieldKind::Text, &json!(3)).unwrap();
        assert_eq!(v, Value::Text("3".into()));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let v = Value::from_json("匯率2", FieldKind::Float, &json!("0.2396")).unwrap();
        assert_eq!(v, Value::Float(0.2396));

        let v = Value::from_json("損_港務費_人數", FieldKind::Integer, &json!(4.0)).unwrap();
        assert_eq!(v, Value::Integer(4));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = Value::from_json("信用額度", FieldKind::Float, &json!("lots")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "信用額度", .. }));

        let err = Value::from_json("損_出差費1_人數", FieldKind::Integer, &json!(2.5)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));

        let err = Value::from_json("姓名", FieldKind::Text, &json!(["a"])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));

        let err = Value::from_json("生日", FieldKind::Timestamp, &json!(20250217)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn null_is_null_for_every_kind() {
        for kind in [FieldKind::Text, FieldKind::Timestamp, FieldKind::Float, FieldKind::Integer] {
            assert!(Value::from_json("x", kind, &JsonValue::Null).unwrap().is_null());
        }
    }

    #[test]
    fn serializes_timestamps_without_offset() {
        let v = Value::Timestamp(midnight(2010, 5, 7));
        assert_eq!(serde_json::to_value(&v).unwrap(), json!("2010-05-07T00:00:00"));
        assert_eq!(v.to_string(), "2010-05-07T00:00:00");
    }
}
