//! Loosely typed cell and filter values
//!
//! Rows hand the table untyped values and filters compare them with lenient
//! coercions: unparsable numbers and dates become `NaN`, and every comparison
//! against `NaN` is false.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value read from a row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String form shown in cells and matched by the global search
    ///
    /// Null renders as the empty string.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// String form the filter operators compare against
    ///
    /// Same as [`CellValue::to_display_string`] except that null reads as
    /// `"null"`, so a null or missing cell is never empty to `isEmpty`.
    pub fn to_filter_string(&self) -> String {
        match self {
            CellValue::Null => "null".to_string(),
            other => other.to_display_string(),
        }
    }

    /// Numeric coercion; anything unparsable is `NaN`
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Null => f64::NAN,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::Number(n) => *n,
            CellValue::Text(s) => parse_number(s),
        }
    }

    /// Milliseconds since the Unix epoch; anything unparsable is `NaN`
    pub fn to_timestamp(&self) -> f64 {
        match self {
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Text(s) => parse_timestamp(s),
            _ => f64::NAN,
        }
    }

    /// Truthiness: false for null, `false`, zero, `NaN` and the empty string
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
        }
    }

    /// Null or the empty string: a filter value that hasn't been filled in
    pub fn is_unset(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Parse a number the way a loose numeric conversion does
///
/// Surrounding whitespace is ignored, the empty string is zero, and `0x`,
/// `0o` and `0b` prefixes select a radix. Words other than `Infinity` are
/// rejected even where Rust's float parser would accept them.
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    if !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date string into epoch milliseconds
///
/// Plain dates are UTC midnight, RFC 3339 timestamps keep their offset and
/// date-times without an offset are read as UTC.
pub fn parse_timestamp(text: &str) -> f64 {
    let s = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis() as f64;
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
        .unwrap_or(f64::NAN)
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<&serde_json::Value> for CellValue {
    /// Arrays and objects become their JSON text
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        CellValue::from(&value)
    }
}

/// The value half of a filter condition
///
/// Range filters take a `[min, max]` pair; every other filter type takes a
/// scalar. Multi-select filters hold their tokens as one comma-joined string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Pair(CellValue, CellValue),
    Scalar(CellValue),
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Scalar(CellValue::Text(String::new()))
    }
}

/// Which end of a range to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl FilterValue {
    pub fn scalar(value: impl Into<CellValue>) -> Self {
        FilterValue::Scalar(value.into())
    }

    pub fn pair(min: impl Into<CellValue>, max: impl Into<CellValue>) -> Self {
        FilterValue::Pair(min.into(), max.into())
    }

    /// A multi-select value from its tokens
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = tokens
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        FilterValue::Scalar(CellValue::Text(joined))
    }

    /// Value typed into a number box: blank input leaves the filter unset
    pub fn number_input(text: &str) -> Self {
        if text.trim().is_empty() {
            FilterValue::default()
        } else {
            FilterValue::Scalar(CellValue::Number(parse_number(text)))
        }
    }

    /// Whether the condition is still waiting for a value
    ///
    /// Only a scalar null or empty string counts. A pair with a blank bound
    /// is handled by the range comparisons themselves.
    pub fn is_unset(&self) -> bool {
        match self {
            FilterValue::Scalar(value) => value.is_unset(),
            FilterValue::Pair(..) => false,
        }
    }

    /// Both bounds of a range, if both are filled in
    pub fn bounds(&self) -> Option<(&CellValue, &CellValue)> {
        match self {
            FilterValue::Pair(min, max) if !min.is_unset() && !max.is_unset() => Some((min, max)),
            _ => None,
        }
    }

    /// Replace one end of a range, turning a scalar into a half-filled pair
    pub fn with_bound(self, bound: Bound, value: impl Into<CellValue>) -> Self {
        let (min, max) = match self {
            FilterValue::Pair(min, max) => (min, max),
            FilterValue::Scalar(_) => (CellValue::default(), CellValue::default()),
        };
        match bound {
            Bound::Lower => FilterValue::Pair(value.into(), max),
            Bound::Upper => FilterValue::Pair(min, value.into()),
        }
    }

    /// Selected multi-select tokens, blanks dropped
    pub fn token_list(&self) -> Vec<String> {
        self.to_display_string()
            .split(',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Add a multi-select token if absent, remove it if present
    pub fn toggle_token(&self, token: &str) -> Self {
        let mut tokens = self.token_list();
        match tokens.iter().position(|t| t == token) {
            Some(index) => {
                tokens.remove(index);
            }
            None => tokens.push(token.to_string()),
        }
        FilterValue::tokens(tokens)
    }

    /// String form; a pair joins its bounds with a comma
    pub fn to_display_string(&self) -> String {
        match self {
            FilterValue::Scalar(value) => value.to_display_string(),
            FilterValue::Pair(min, max) => {
                format!("{},{}", min.to_display_string(), max.to_display_string())
            }
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            FilterValue::Scalar(value) => value.to_number(),
            FilterValue::Pair(..) => f64::NAN,
        }
    }

    pub fn to_timestamp(&self) -> f64 {
        match self {
            FilterValue::Scalar(value) => value.to_timestamp(),
            FilterValue::Pair(..) => f64::NAN,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Scalar(value) => value.is_truthy(),
            FilterValue::Pair(..) => true,
        }
    }
}

impl From<CellValue> for FilterValue {
    fn from(value: CellValue) -> Self {
        FilterValue::Scalar(value)
    }
}
