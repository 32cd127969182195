//! The universal SBDF value type.

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::decimal::Decimal128;
use crate::types::ValueKind;

/// A single table or metadata value.
///
/// One variant per standard kind, plus the three envelopes: `Invalid`
/// (null), `Error` (an opaque message), and `Replaced` (an underlying
/// value flagged as substituted). Envelopes are never serialized
/// directly; the writer demultiplexes them into per-column sideband
/// arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Timestamp, written as milliseconds since 0001-01-01 UTC.
    DateTime(NaiveDateTime),
    /// Calendar date, written like a midnight timestamp.
    Date(NaiveDate),
    /// Time of day, written as milliseconds within a day.
    Time(NaiveTime),
    /// Signed duration, written as milliseconds.
    TimeSpan(TimeDelta),
    /// UTF-8 text.
    String(String),
    /// Opaque byte blob.
    Binary(Bytes),
    /// 128-bit decimal.
    Decimal(Decimal128),
    /// The null sentinel, valid in any column.
    Invalid,
    /// An error envelope carrying an opaque message.
    Error(String),
    /// A replaced-value envelope wrapping the substituted plain value.
    Replaced(Box<Value>),
}

impl Value {
    /// Build an error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Build a replaced-value envelope around `inner`.
    #[must_use]
    pub fn replaced(inner: Value) -> Self {
        Self::Replaced(Box::new(inner))
    }

    /// The kind of a plain value; for a replaced envelope, the kind of
    /// the wrapped value. `None` for the kind-agnostic envelopes.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Long(_) => Some(ValueKind::Long),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Double(_) => Some(ValueKind::Double),
            Self::DateTime(_) => Some(ValueKind::DateTime),
            Self::Date(_) => Some(ValueKind::Date),
            Self::Time(_) => Some(ValueKind::Time),
            Self::TimeSpan(_) => Some(ValueKind::TimeSpan),
            Self::String(_) => Some(ValueKind::String),
            Self::Binary(_) => Some(ValueKind::Binary),
            Self::Decimal(_) => Some(ValueKind::Decimal),
            Self::Invalid | Self::Error(_) => None,
            Self::Replaced(inner) => inner.kind(),
        }
    }

    /// The variant name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Long(_) => "Long",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::DateTime(_) => "DateTime",
            Self::Date(_) => "Date",
            Self::Time(_) => "Time",
            Self::TimeSpan(_) => "TimeSpan",
            Self::String(_) => "String",
            Self::Binary(_) => "Binary",
            Self::Decimal(_) => "Decimal",
            Self::Invalid => "Invalid",
            Self::Error(_) => "Error",
            Self::Replaced(_) => "Replaced",
        }
    }

    /// Check if this is the null sentinel.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Check if this is an error envelope.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Check if this is a replaced-value envelope.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }

    /// Check if this is a plain value rather than an envelope.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !matches!(self, Self::Invalid | Self::Error(_) | Self::Replaced(_))
    }

    /// The error envelope's message, if this is one.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The value wrapped by a replaced envelope, if this is one.
    #[must_use]
    pub fn replaced_inner(&self) -> Option<&Value> {
        match self {
            Self::Replaced(inner) => Some(inner),
            _ => None,
        }
    }

    /// Get the value as a bool, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as an i32, if it is one.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as an i64, widening an Int if necessary.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            Self::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Get the value as an f32, if it is one.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as an f64, widening a Float if necessary.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Get the value as a string slice, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as bytes, if it is binary.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a decimal, if it is one.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal128> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a timestamp, if it is one.
    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a date, if it is one.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a time of day, if it is one.
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a duration, if it is one.
    #[must_use]
    pub fn as_timespan(&self) -> Option<TimeDelta> {
        match self {
            Self::TimeSpan(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::Binary(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(v))
    }
}

impl From<Decimal128> for Value {
    fn from(v: Decimal128) -> Self {
        Self::Decimal(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Self::TimeSpan(v)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_plain_values() {
        assert_eq!(Value::Int(1).kind(), Some(ValueKind::Int));
        assert_eq!(Value::from("x").kind(), Some(ValueKind::String));
        assert_eq!(Value::Invalid.kind(), None);
        assert_eq!(Value::error("boom").kind(), None);
        assert_eq!(
            Value::replaced(Value::Double(1.5)).kind(),
            Some(ValueKind::Double)
        );
    }

    #[test]
    fn test_recognizers() {
        assert!(Value::Invalid.is_invalid());
        assert!(Value::error("e").is_error());
        assert!(Value::replaced(Value::Int(1)).is_replaced());
        assert!(Value::Int(1).is_plain());
        assert!(!Value::Invalid.is_plain());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::Long(7).as_i64(), Some(7));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::Int(7).as_str(), None);
    }

    #[test]
    fn test_envelope_contents() {
        assert_eq!(Value::error("bad").error_message(), Some("bad"));
        let replaced = Value::replaced(Value::Int(3));
        assert_eq!(replaced.replaced_inner(), Some(&Value::Int(3)));
    }
}
