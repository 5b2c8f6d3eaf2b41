// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scalar value type stored in table cells.

use core::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};

/// A single table cell.
///
/// Cells are either continuous (numbers, timestamps), categorical (text),
/// missing (`Null`), or a collected list of child values produced by binning.
/// Anything a caller cannot express in these variants simply does not enter
/// the container; the remaining runtime hazard is non-finite floats, which
/// [`Value::sanitized`] collapses to `Null` at ingest.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A finite numeric value.
    Number(f64),
    /// A categorical text value.
    Text(String),
    /// A timestamp (naive UTC).
    Time(NaiveDateTime),
    /// Values collected from child rows by binning.
    List(Vec<Value>),
    /// A missing value.
    #[default]
    Null,
}

impl Value {
    /// Returns `self` with invalid content normalized to `Null`.
    ///
    /// Non-finite numbers cannot participate in aggregation or scaling, so
    /// they are treated as missing data rather than an error. Lists are
    /// sanitized element-wise.
    pub fn sanitized(self) -> Self {
        match self {
            Self::Number(v) if !v.is_finite() => Self::Null,
            Self::List(vs) => Self::List(vs.into_iter().map(Self::sanitized).collect()),
            other => other,
        }
    }

    /// Returns true if this value has intrinsic order (a number or a time).
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Time(_))
    }

    /// Returns true if this value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the numeric form of this value, if it has one.
    ///
    /// Numbers map to themselves, times to their epoch milliseconds. Text,
    /// lists and nulls have no numeric form.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            #[allow(
                clippy::cast_precision_loss,
                reason = "chart timestamps are well within f64's exact integer range"
            )]
            Self::Time(t) => Some(t.and_utc().timestamp_millis() as f64),
            _ => None,
        }
    }

    /// Returns the text content, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// A total order over values, used by min/max and sorting.
    ///
    /// `Null` sorts first, then everything with a numeric form (so numbers
    /// and times interleave by magnitude), then text lexicographically, then
    /// lists element-wise.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self.order_rank(), other.order_rank()) {
            (a, b) if a != b => a.cmp(&b),
            _ => match (self, other) {
                (Self::Text(a), Self::Text(b)) => a.cmp(b),
                (Self::List(a), Self::List(b)) => {
                    for (x, y) in a.iter().zip(b.iter()) {
                        let ord = x.total_cmp(y);
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                    a.len().cmp(&b.len())
                }
                _ => match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a.total_cmp(&b),
                    _ => Ordering::Equal,
                },
            },
        }
    }

    fn order_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) | Self::Time(_) => 1,
            Self::Text(_) => 2,
            Self::List(_) => 3,
        }
    }
}

/// Reconstructs a timestamp from (possibly fractional) epoch milliseconds.
///
/// Returns `None` for values outside chrono's representable range.
pub fn time_from_millis(millis: f64) -> Option<NaiveDateTime> {
    if !millis.is_finite() {
        return None;
    }
    let clamped = millis.round().clamp(i64::MIN as f64, i64::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    let ms = clamped as i64;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        #[allow(
            clippy::cast_precision_loss,
            reason = "ingest accepts the nearest representable double, as charts do"
        )]
        let v = v as f64;
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Time(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn sanitized_collapses_non_finite_numbers_to_null() {
        assert_eq!(Value::Number(f64::NAN).sanitized(), Value::Null);
        assert_eq!(Value::Number(f64::INFINITY).sanitized(), Value::Null);
        assert_eq!(Value::Number(1.5).sanitized(), Value::Number(1.5));
        assert_eq!(
            Value::List(vec![Value::Number(f64::NAN), Value::from("a")]).sanitized(),
            Value::List(vec![Value::Null, Value::from("a")])
        );
    }

    #[test]
    fn continuity_covers_numbers_and_times_only() {
        assert!(Value::Number(0.0).is_continuous());
        assert!(Value::Time(date("2020-01-01 00:00:00")).is_continuous());
        assert!(!Value::from("label").is_continuous());
        assert!(!Value::Null.is_continuous());
    }

    #[test]
    fn numeric_form_of_time_is_epoch_millis() {
        let t = date("1970-01-01 00:00:01");
        assert_eq!(Value::Time(t).as_f64(), Some(1000.0));
        assert_eq!(time_from_millis(1000.0), Some(t));
    }

    #[test]
    fn total_order_sorts_null_then_numeric_then_text() {
        let mut values = vec![
            Value::from("b"),
            Value::Number(2.0),
            Value::Null,
            Value::from("a"),
            Value::Number(-1.0),
        ];
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Number(-1.0),
                Value::Number(2.0),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }
}
