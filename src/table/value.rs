use chrono::NaiveDate;
use std::fmt;

/// A single cell of a [`RecordTable`](super::RecordTable).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Str(String),
}

impl Value {
    /// Parse a raw CSV cell into the most specific scalar:
    /// empty → `Null`, integer → `Int`, float → `Float`, else `Str`.
    /// Dates are left as strings; see [`RecordTable::parse_dates`](super::RecordTable::parse_dates).
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if looks_numeric(raw) {
            if let Ok(f) = raw.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Str(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// JSON view used by `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(self.to_string())),
            Value::Date(_) | Value::Str(_) => serde_json::Value::String(self.to_string()),
        }
    }

    /// Convert a JSON scalar (from `append --record`) into a cell.
    /// Strings are kept verbatim; nested arrays/objects are stored as their JSON text.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Str(b.to_string()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }
}

/// Float parsing in Rust accepts words like "infinity" and "nan"; only let through
/// digit-bearing text plus the exact tokens `Display` produces for non-finite floats.
fn looks_numeric(raw: &str) -> bool {
    matches!(raw, "NaN" | "inf" | "-inf") || raw.bytes().any(|b| b.is_ascii_digit())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            // keep a fractional part so integral floats reload as floats
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_picks_most_specific_type() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-7"), Value::Int(-7));
        assert_eq!(Value::infer("3.5"), Value::Float(3.5));
        assert_eq!(Value::infer("1e3"), Value::Float(1000.0));
        assert_eq!(Value::infer("Open"), Value::Str("Open".into()));
        assert_eq!(Value::infer("2024-03-01"), Value::Str("2024-03-01".into()));
        assert_eq!(Value::infer(" 5"), Value::Str(" 5".into()));
    }

    #[test]
    fn words_that_rust_parses_as_floats_stay_strings() {
        assert_eq!(Value::infer("infinity"), Value::Str("infinity".into()));
        assert_eq!(Value::infer("nan"), Value::Str("nan".into()));
        assert_eq!(Value::infer("inf"), Value::Float(f64::INFINITY));
    }

    #[test]
    fn display_keeps_float_kind() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(2.25).to_string(), "2.25");
        assert_eq!(Value::infer(&Value::Float(3.0).to_string()), Value::Float(3.0));
        assert_eq!(Value::infer(&Value::Float(0.1).to_string()), Value::Float(0.1));
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn dates_format_as_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::Date(d).to_string(), "2024-02-29");
    }

    #[test]
    fn json_conversion() {
        let v: serde_json::Value = serde_json::json!({"a": 1, "b": 1.5, "c": "x", "d": null});
        let obj = v.as_object().unwrap();
        assert_eq!(Value::from_json(&obj["a"]), Value::Int(1));
        assert_eq!(Value::from_json(&obj["b"]), Value::Float(1.5));
        assert_eq!(Value::from_json(&obj["c"]), Value::Str("x".into()));
        assert_eq!(Value::from_json(&obj["d"]), Value::Null);
        assert_eq!(Value::Int(3).to_json(), serde_json::json!(3));
    }
}
