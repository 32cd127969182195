//! Error types for the SBDF wire format.

use std::io;

use thiserror::Error;

use crate::array::ArrayEncoding;
use crate::section::SectionType;
use crate::types::ValueKind;

/// Errors raised when a byte stream violates the SBDF format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The two-byte section magic number was wrong.
    #[error("bad magic number: expected 0x5BDF, found {found:#06x}")]
    BadMagic {
        /// The 16-bit value actually read, little-endian.
        found: u16,
    },

    /// The section type tag is not one of the defined tags.
    #[error("unknown section type: {0:#04x}")]
    UnknownSectionType(u8),

    /// A section of one type was expected but another was found.
    #[error("unexpected section: expected {expected}, found {found}")]
    UnexpectedSectionType {
        /// The section type required at this point of the stream.
        expected: SectionType,
        /// The section type actually read.
        found: SectionType,
    },

    /// The value-kind code is not serializable in columns or properties.
    #[error("unknown value type: {0:#04x}")]
    UnknownValueType(u8),

    /// The array encoding id is not one of the defined encodings.
    #[error("unknown array encoding: {0:#04x}")]
    UnknownEncoding(u8),

    /// The file header declares a format version this reader does not know.
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version from the file header.
        major: u8,
        /// Minor version from the file header.
        minor: u8,
    },

    /// The stream ended in the middle of a value or section.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A packed 7-bit integer ran past five bytes or overflowed.
    #[error("invalid packed integer")]
    InvalidVarint,

    /// String data was not valid UTF-8.
    #[error("invalid UTF-8 in string data")]
    InvalidUtf8,

    /// A length or count prefix was negative.
    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    /// A DateTime or Date is earlier than 1583-01-01 UTC or outside the
    /// representable range.
    #[error("date out of supported range: {millis} ms from year-1 epoch")]
    DateOutOfRange {
        /// The offending wire value in milliseconds since 0001-01-01 UTC.
        millis: i64,
    },

    /// A decimal combination field encoded NaN or infinity.
    #[error("decimal is NaN or infinity")]
    DecimalNan,

    /// A decoded decimal coefficient or scale is outside the supported range.
    #[error("decimal out of supported range")]
    DecimalOutOfRange,

    /// Run-length occurrence counts do not add up to the declared total.
    #[error("run-length data mismatch: declared {declared} values, runs cover {actual}")]
    RunLengthMismatch {
        /// Element count declared by the encoding header.
        declared: i32,
        /// Element count actually covered by the occurrence bytes.
        actual: u64,
    },

    /// The run-length distinct-value array does not match the run count.
    #[error("run-length distinct count mismatch: {runs} runs, {distinct} distinct values")]
    RunCountMismatch {
        /// Number of occurrence bytes.
        runs: usize,
        /// Number of distinct values.
        distinct: usize,
    },

    /// A table slice declares a column count different from the metadata.
    #[error("column count mismatch: metadata declares {expected}, slice has {actual}")]
    ColumnCountMismatch {
        /// Column count from the table metadata.
        expected: usize,
        /// Column count from the slice header.
        actual: usize,
    },

    /// A serialized array carries values of a kind its context forbids.
    #[error("value kind mismatch: expected {expected}, found {found}")]
    ValueKindMismatch {
        /// Kind the context requires.
        expected: ValueKind,
        /// Kind actually carried.
        found: ValueKind,
    },

    /// A sideband array's length differs from the value array's.
    #[error("sideband {name:?} has {actual} rows, values have {expected}")]
    SidebandLengthMismatch {
        /// Name of the value property.
        name: String,
        /// Row count of the value array.
        expected: usize,
        /// Row count of the sideband array.
        actual: usize,
    },

    /// A column read from a metadata section lacks a reserved property.
    #[error("column is missing the reserved {0} property")]
    MissingColumnProperty(&'static str),

    /// A value that has no primitive serialization (an envelope) reached the
    /// primitive writer.
    #[error("value has no primitive serialization")]
    UnserializableValue,

    /// The underlying byte source failed.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(err)
        }
    }
}

/// Errors raised by incorrect use of the API, before any bytes are produced.
#[derive(Debug, Error)]
pub enum UsageError {
    /// A required argument was empty.
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),

    /// A value's kind does not match the declared kind of its destination.
    #[error("value kind {actual} does not match declared kind {expected}")]
    KindMismatch {
        /// Kind declared by the column or property.
        expected: ValueKind,
        /// Kind of the value supplied.
        actual: ValueKind,
    },

    /// A metadata collection was mutated after sealing.
    #[error("metadata collection is sealed")]
    Sealed,

    /// Two properties in one collection share a name.
    #[error("duplicate property name: {0:?}")]
    DuplicateProperty(String),

    /// A property name shared by multiple columns has conflicting kind or
    /// default.
    #[error("conflicting definitions of column property {name:?}")]
    PropertyConflict {
        /// The shared property name.
        name: String,
    },

    /// A value property's row count differs from the value array's.
    #[error("property {name:?} has {actual} rows, values have {expected}")]
    RowCountMismatch {
        /// Row count of the value array.
        expected: usize,
        /// Row count of the property array.
        actual: usize,
        /// Name of the value property.
        name: String,
    },

    /// A table slice was built with the wrong number of columns.
    #[error("table has {expected} columns, slice was given {actual}")]
    ColumnCountMismatch {
        /// Column count from the table metadata.
        expected: usize,
        /// Number of column slices supplied.
        actual: usize,
    },

    /// A column subset mask's length differs from the table's column count.
    #[error("subset mask covers {mask} columns, table has {columns}")]
    SubsetLengthMismatch {
        /// Length of the supplied mask.
        mask: usize,
        /// Column count of the table.
        columns: usize,
    },

    /// A decimal coefficient exceeds 34 decimal digits.
    #[error("decimal coefficient exceeds 34 digits")]
    DecimalCoefficientOutOfRange,

    /// A decimal scale is outside 0..=34.
    #[error("decimal scale {0} is outside 0..=34")]
    DecimalScaleOutOfRange(u32),

    /// The chosen array encoding cannot carry the given value kind.
    #[error("encoding {encoding} cannot carry {kind} values")]
    EncodingKindMismatch {
        /// The requested encoding.
        encoding: ArrayEncoding,
        /// The kind of the array.
        kind: ValueKind,
    },

    /// The kind is not legal in a column or metadata property.
    #[error("value kind {0} is not valid in a column")]
    InvalidColumnKind(ValueKind),

    /// A reserved value property was set with the wrong kind.
    #[error("reserved property {name:?} must hold {expected} values")]
    ReservedPropertyKind {
        /// Name of the reserved property.
        name: String,
        /// Kind the reserved property requires.
        expected: ValueKind,
    },

    /// An envelope was supplied where a plain value is required.
    #[error("envelope values are not allowed here")]
    EnvelopeValue,

    /// A replaced envelope wrapped another envelope.
    #[error("replaced envelope must wrap a plain value")]
    NestedEnvelope,

    /// Values were added to a table that declares no columns.
    #[error("table has no columns")]
    NoColumns,
}
