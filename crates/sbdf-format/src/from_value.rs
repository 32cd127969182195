//! Trait for extracting Rust types from table values.

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use thiserror::Error;

use crate::decimal::Decimal128;
use crate::value::Value;

/// Errors that can occur when converting a [`Value`] to a Rust type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// The value is the invalid (null) sentinel.
    #[error("unexpected invalid value")]
    UnexpectedInvalid,

    /// The value is an error envelope.
    #[error("value carries an error: {0}")]
    ErrorValue(String),

    /// The value's kind does not match the requested type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Requested Rust type.
        expected: &'static str,
        /// The value's actual variant name.
        actual: &'static str,
    },
}

/// Trait for types that can be extracted from table values.
///
/// Implemented for the Rust type of every value kind, enabling
/// type-safe extraction from [`Value`]s produced by a reader. A replaced
/// envelope converts as its inner value; the invalid sentinel and error
/// envelopes fail unless extracted through
/// [`from_value_nullable`](Self::from_value_nullable).
pub trait FromValue: Sized {
    /// Convert from a table value to this type.
    fn from_value(value: &Value) -> Result<Self, ConvertError>;

    /// Convert from a possibly-invalid table value.
    ///
    /// Returns `None` for the invalid sentinel.
    fn from_value_nullable(value: &Value) -> Result<Option<Self>, ConvertError> {
        if value.is_invalid() {
            Ok(None)
        } else {
            Self::from_value(value).map(Some)
        }
    }
}

fn envelope_error(value: &Value, expected: &'static str) -> ConvertError {
    match value {
        Value::Invalid => ConvertError::UnexpectedInvalid,
        Value::Error(message) => ConvertError::ErrorValue(message.clone()),
        other => ConvertError::TypeMismatch {
            expected,
            actual: other.type_name(),
        },
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $name:literal, $variant:ident, $convert:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ConvertError> {
                match value {
                    Value::$variant(v) => Ok($convert(v)),
                    Value::Replaced(inner) => Self::from_value(inner),
                    other => Err(envelope_error(other, $name)),
                }
            }
        }
    };
}

impl_from_value!(bool, "bool", Bool, |v: &bool| *v);
impl_from_value!(i32, "i32", Int, |v: &i32| *v);
impl_from_value!(f32, "f32", Float, |v: &f32| *v);
impl_from_value!(String, "String", String, |v: &String| v.clone());
impl_from_value!(Bytes, "Bytes", Binary, |v: &Bytes| v.clone());
impl_from_value!(Decimal128, "Decimal128", Decimal, |v: &Decimal128| *v);
impl_from_value!(NaiveDateTime, "NaiveDateTime", DateTime, |v: &NaiveDateTime| *v);
impl_from_value!(NaiveDate, "NaiveDate", Date, |v: &NaiveDate| *v);
impl_from_value!(NaiveTime, "NaiveTime", Time, |v: &NaiveTime| *v);
impl_from_value!(TimeDelta, "TimeDelta", TimeSpan, |v: &TimeDelta| *v);

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Long(v) => Ok(*v),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Replaced(inner) => Self::from_value(inner),
            other => Err(envelope_error(other, "i64")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Replaced(inner) => Self::from_value(inner),
            other => Err(envelope_error(other, "f64")),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        Bytes::from_value(value).map(|b| b.to_vec())
    }
}
