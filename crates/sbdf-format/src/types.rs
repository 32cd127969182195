//! SBDF value-kind definitions.
//!
//! Every column and metadata property declares one of these kinds; the
//! kind's single-byte code is the on-wire serialized form of a value type.

use core::fmt;

use bytes::Bytes;

use crate::error::FormatError;
use crate::value::Value;

/// Value-kind identifiers with their on-wire byte codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    /// Sentinel for an undetermined kind. Not serializable.
    Unknown = 0x00,
    /// Boolean, one byte on wire.
    Bool = 0x01,
    /// 32-bit signed integer.
    Int = 0x02,
    /// 64-bit signed integer.
    Long = 0x03,
    /// IEEE-754 single-precision float.
    Float = 0x04,
    /// IEEE-754 double-precision float.
    Double = 0x05,
    /// Milliseconds since 0001-01-01 00:00:00 UTC.
    DateTime = 0x06,
    /// Calendar date, stored like [`ValueKind::DateTime`].
    Date = 0x07,
    /// Milliseconds within a day.
    Time = 0x08,
    /// Signed millisecond duration.
    TimeSpan = 0x09,
    /// Length-prefixed UTF-8 text.
    String = 0x0A,
    /// Length-prefixed byte blob.
    Binary = 0x0C,
    /// IEEE-754 decimal128, little-endian.
    Decimal = 0x0D,
    /// Reserved for out-of-band user types. Not writable by this crate.
    UserDefined = 0xFF,
}

impl ValueKind {
    /// All kinds that may appear in columns and metadata properties.
    pub const STANDARD: [Self; 12] = [
        Self::Bool,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::DateTime,
        Self::Date,
        Self::Time,
        Self::TimeSpan,
        Self::String,
        Self::Binary,
        Self::Decimal,
    ];

    /// Map a raw byte to a kind, including the non-serializable sentinels.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Unknown),
            0x01 => Some(Self::Bool),
            0x02 => Some(Self::Int),
            0x03 => Some(Self::Long),
            0x04 => Some(Self::Float),
            0x05 => Some(Self::Double),
            0x06 => Some(Self::DateTime),
            0x07 => Some(Self::Date),
            0x08 => Some(Self::Time),
            0x09 => Some(Self::TimeSpan),
            0x0A => Some(Self::String),
            0x0C => Some(Self::Binary),
            0x0D => Some(Self::Decimal),
            0xFF => Some(Self::UserDefined),
            _ => None,
        }
    }

    /// Decode a kind byte read from a column or property declaration.
    ///
    /// Only the standard kinds are legal there; anything else is a
    /// [`FormatError::UnknownValueType`].
    pub fn from_wire(code: u8) -> Result<Self, FormatError> {
        match Self::from_u8(code) {
            Some(kind) if kind.is_standard() => Ok(kind),
            _ => Err(FormatError::UnknownValueType(code)),
        }
    }

    /// The on-wire byte code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check if this kind has a fixed-width wire representation.
    #[must_use]
    pub const fn is_simple(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::DateTime
                | Self::Date
                | Self::Time
                | Self::TimeSpan
                | Self::Decimal
        )
    }

    /// Check if this kind has a variable-length wire representation.
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::String | Self::Binary)
    }

    /// Check if this kind is legal in columns and metadata properties.
    #[must_use]
    pub const fn is_standard(self) -> bool {
        self.is_simple() || self.is_array()
    }

    /// Wire size in bytes of one value, for fixed-width kinds.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::Int | Self::Float => Some(4),
            Self::Long
            | Self::Double
            | Self::DateTime
            | Self::Date
            | Self::Time
            | Self::TimeSpan => Some(8),
            Self::Decimal => Some(16),
            _ => None,
        }
    }

    /// The serialized binary form of this kind: its single code byte.
    ///
    /// The slices are static so metadata emission never allocates.
    #[must_use]
    pub const fn as_binary(self) -> &'static [u8] {
        match self {
            Self::Unknown => &[0x00],
            Self::Bool => &[0x01],
            Self::Int => &[0x02],
            Self::Long => &[0x03],
            Self::Float => &[0x04],
            Self::Double => &[0x05],
            Self::DateTime => &[0x06],
            Self::Date => &[0x07],
            Self::Time => &[0x08],
            Self::TimeSpan => &[0x09],
            Self::String => &[0x0A],
            Self::Binary => &[0x0C],
            Self::Decimal => &[0x0D],
            Self::UserDefined => &[0xFF],
        }
    }

    /// The serialized binary form as [`Bytes`], without copying.
    #[must_use]
    pub fn to_binary(self) -> Bytes {
        Bytes::from_static(self.as_binary())
    }

    /// Recover a kind from its serialized binary form.
    pub fn from_binary(data: &[u8]) -> Result<Self, FormatError> {
        match data {
            [code] => Self::from_wire(*code),
            _ => Err(FormatError::UnknownValueType(
                data.first().copied().unwrap_or(0),
            )),
        }
    }

    /// The default plain value of this kind.
    ///
    /// Used to fill data rows that are masked by invalid or error
    /// sidebands. For DateTime and Date this is the earliest date the
    /// format accepts, 1583-01-01 UTC, so that filled rows survive the
    /// writer's and reader's range gate.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Long => Value::Long(0),
            Self::Float => Value::Float(0.0),
            Self::Double => Value::Double(0.0),
            Self::DateTime => Value::DateTime(crate::temporal::min_datetime()),
            Self::Date => Value::Date(crate::temporal::min_datetime().date()),
            Self::Time => Value::Time(chrono::NaiveTime::MIN),
            Self::TimeSpan => Value::TimeSpan(chrono::TimeDelta::zero()),
            Self::String => Value::String(String::new()),
            Self::Binary => Value::Binary(Bytes::new()),
            Self::Decimal => Value::Decimal(crate::decimal::Decimal128::ZERO),
            Self::Unknown | Self::UserDefined => Value::Invalid,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::TimeSpan => "TimeSpan",
            Self::String => "String",
            Self::Binary => "Binary",
            Self::Decimal => "Decimal",
            Self::UserDefined => "UserDefined",
        };
        f.write_str(name)
    }
}
