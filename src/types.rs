// src/types.rs
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// A single cell of channel data.
///
/// The wire format is loosely typed: a cell may be a JSON number, a JSON
/// string, a JSON null, or a 2-element array `[value, validFlag]` carrying a
/// quality flag alongside the value. `CellValue` is the closed in-memory
/// representation of exactly those shapes; `serde_json::Value` never leaks
/// past the parse layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// No value present for this cell.
    Null,
    /// A plain numeric value.
    Number(f64),
    /// A textual value (including ISO-8601 timestamps for time indices).
    Text(String),
    /// A quality-flagged numeric value: the number plus its validity flag.
    Flagged(f64, bool),
}

impl CellValue {
    /// Convert a parsed JSON value into a `CellValue`.
    ///
    /// Single-element arrays are unwrapped to their first element, and
    /// `[number, bool]` pairs become `Flagged`. Anything the wire format
    /// does not define (objects, deeper nesting) degrades to `Null` rather
    /// than erroring, per the tolerant-reader contract.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Text(b.to_string()),
            Value::Number(n) => match n.as_f64() {
                Some(v) => CellValue::Number(v),
                None => CellValue::Null,
            },
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Array(items) => match items.as_slice() {
                [] => CellValue::Null,
                [single] => CellValue::from_json(single),
                [Value::Number(n), Value::Bool(flag), ..] => match n.as_f64() {
                    Some(v) => CellValue::Flagged(v, *flag),
                    None => CellValue::Null,
                },
                [first, ..] => CellValue::from_json(first),
            },
            Value::Object(_) => CellValue::Null,
        }
    }

    /// Convert a delimited text token into a `CellValue`.
    ///
    /// Blank, `null`, and `NaN` tokens (case-insensitive) mean "no value";
    /// numeric-looking tokens become numbers; everything else is text.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if is_null_token(token) {
            return CellValue::Null;
        }
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Text(token.to_string()),
        }
    }

    /// Serialize back to the JSON wire representation.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Number(v) => number_to_json(*v),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Flagged(v, flag) => Value::Array(vec![number_to_json(*v), Value::Bool(*flag)]),
        }
    }

    /// The effective value of this cell: a flagged pair collapses to its
    /// numeric component, everything else passes through unchanged.
    pub fn effective(&self) -> CellValue {
        match self {
            CellValue::Flagged(v, _) => CellValue::Number(*v),
            other => other.clone(),
        }
    }

    /// True when this cell holds no value. An empty string, `null`, or
    /// `NaN` text token all count as absent.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => is_null_token(s.trim()),
            _ => false,
        }
    }

    /// Numeric view of this cell. Never fails: anything that does not parse
    /// as a number reads as NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Number(v) => *v,
            CellValue::Flagged(v, _) => *v,
            CellValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            CellValue::Null => f64::NAN,
        }
    }

    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }

    /// Textual view of this cell. Null reads as the empty string.
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Flagged(v, _) => v.to_string(),
        }
    }

    /// Boolean view: true iff the cell text equals "true", case-insensitive.
    pub fn as_bool(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Parse this cell as an ISO-8601 timestamp.
    pub fn as_date_time(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            CellValue::Text(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
            _ => None,
        }
    }

    /// Whole seconds since the unix epoch, for timestamp cells or numeric
    /// cells already carrying an epoch value.
    pub fn as_unix_time_seconds(&self) -> Option<i64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v as i64),
            CellValue::Flagged(v, _) if v.is_finite() => Some(*v as i64),
            _ => self.as_date_time().map(|dt| dt.timestamp()),
        }
    }

    /// Numeric position of this cell along an index dimension: numbers pass
    /// through, timestamp text parses to fractional epoch seconds.
    pub fn as_index(&self) -> f64 {
        let v = self.as_f64();
        if v.is_nan() {
            self.as_date_time().map(|dt| time_seconds(&dt)).unwrap_or(f64::NAN)
        } else {
            v
        }
    }
}

fn number_to_json(v: f64) -> Value {
    match serde_json::Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None => Value::Null, // NaN and infinities have no JSON encoding
    }
}

fn is_null_token(token: &str) -> bool {
    token.is_empty() || token.eq_ignore_ascii_case("null") || token.eq_ignore_ascii_case("nan")
}

/// Fractional epoch seconds for a parsed timestamp.
pub(crate) fn time_seconds(dt: &DateTime<FixedOffset>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from_json(&json!(4.5)), CellValue::Number(4.5));
        assert_eq!(
            CellValue::from_json(&json!("ROP")),
            CellValue::Text("ROP".to_string())
        );
    }

    #[test]
    fn test_from_json_flagged_pair() {
        let cell = CellValue::from_json(&json!([4.0, true]));
        assert_eq!(cell, CellValue::Flagged(4.0, true));
        assert_eq!(cell.as_f64(), 4.0);
        assert_eq!(cell.effective(), CellValue::Number(4.0));
    }

    #[test]
    fn test_from_json_single_element_unwrap() {
        assert_eq!(CellValue::from_json(&json!([7.25])), CellValue::Number(7.25));
        assert_eq!(CellValue::from_json(&json!([])), CellValue::Null);
    }

    #[test]
    fn test_from_token_normalization() {
        assert_eq!(CellValue::from_token(""), CellValue::Null);
        assert_eq!(CellValue::from_token("null"), CellValue::Null);
        assert_eq!(CellValue::from_token("NaN"), CellValue::Null);
        assert_eq!(CellValue::from_token("10.5"), CellValue::Number(10.5));
        assert_eq!(CellValue::from_token("1e3"), CellValue::Number(1000.0));
        assert_eq!(
            CellValue::from_token("SHALE"),
            CellValue::Text("SHALE".to_string())
        );
    }

    #[test]
    fn test_null_tokens() {
        assert!(CellValue::Null.is_null());
        assert!(CellValue::Text("".into()).is_null());
        assert!(CellValue::Text("NULL".into()).is_null());
        assert!(CellValue::Text("nan".into()).is_null());
        assert!(!CellValue::Number(0.0).is_null());
        assert!(!CellValue::Text("0".into()).is_null());
    }

    #[test]
    fn test_tolerant_numeric_coercion() {
        assert!(CellValue::Text("garbage".into()).as_f64().is_nan());
        assert!(CellValue::Null.as_f64().is_nan());
        assert_eq!(CellValue::Text(" 2.5 ".into()).as_f64(), 2.5);
    }

    #[test]
    fn test_boolean_coercion() {
        assert!(CellValue::Text("true".into()).as_bool());
        assert!(CellValue::Text("TRUE".into()).as_bool());
        assert!(!CellValue::Text("yes".into()).as_bool());
        assert!(!CellValue::Number(1.0).as_bool());
    }

    #[test]
    fn test_timestamp_parsing() {
        let cell = CellValue::Text("2016-03-01T00:00:00Z".into());
        let dt = cell.as_date_time().unwrap();
        assert_eq!(dt.timestamp(), 1456790400);
        assert_eq!(cell.as_unix_time_seconds(), Some(1456790400));
        assert_eq!(cell.as_index(), 1456790400.0);
    }

    #[test]
    fn test_json_round_trip() {
        let flagged = CellValue::Flagged(3.5, false);
        assert_eq!(flagged.to_json(), json!([3.5, false]));
        assert_eq!(CellValue::from_json(&flagged.to_json()), flagged);

        // NaN has no JSON encoding and degrades to null
        assert_eq!(CellValue::Number(f64::NAN).to_json(), json!(null));
    }
}
