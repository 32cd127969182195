//! # sbdf
//!
//! Reader and writer for SBDF, a columnar binary file format for
//! interchanging typed, metadata-rich data tables between analytics
//! tools.
//!
//! The crate streams strictly sequentially: a file header, a
//! table-metadata section, any number of table slices, and an
//! end-of-table marker. Null, error, and replaced-value semantics travel
//! as per-column sideband arrays and surface as [`Value`] envelopes.
//! Readers and writers borrow their byte source or sink and never manage
//! its lifecycle.
//!
//! ## Example
//!
//! ```rust
//! use sbdf::{
//!     ColumnMetadata, FileHeader, TableMetadata, TableMetadataBuilder, TableReader,
//!     TableWriter, Value, ValueKind,
//! };
//!
//! # fn main() -> Result<(), sbdf::Error> {
//! let mut builder = TableMetadataBuilder::new();
//! builder.add_column(ColumnMetadata::new("id", ValueKind::Int)?);
//! builder.add_column(ColumnMetadata::new("name", ValueKind::String)?);
//! let metadata = builder.build()?;
//!
//! let mut bytes = Vec::new();
//! FileHeader::write_current(&mut bytes)?;
//! metadata.write(&mut bytes)?;
//! let mut writer = TableWriter::new(&mut bytes, metadata)?;
//! writer.add_row([Value::Int(1), Value::from("ada")])?;
//! writer.add_row([Value::Int(2), Value::Invalid])?;
//! writer.write_end_of_table()?;
//!
//! let mut source = &bytes[..];
//! FileHeader::read(&mut source)?;
//! let metadata = TableMetadata::read(&mut source)?;
//! let mut reader = TableReader::new(source, metadata);
//! let values: Result<Vec<_>, _> = reader.values().collect();
//! assert_eq!(values?.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod error;
pub mod metadata;
pub mod reader;
pub mod slice;
pub mod table;
pub mod writer;

pub use column::{ColumnMetadata, PROPERTY_DATA_TYPE, PROPERTY_NAME};
pub use error::{Error, FormatError, UsageError};
pub use metadata::{MetadataCollection, MetadataProperty};
pub use reader::{ColumnValues, TableReader, Values};
pub use slice::{
    ColumnSlice, TableSlice, PROPERTY_ERROR_CODE, PROPERTY_HAS_REPLACED_VALUE, PROPERTY_IS_INVALID,
};
pub use table::{TableMetadata, TableMetadataBuilder};
pub use writer::{TableWriter, SLICE_LIMIT};

pub use sbdf_format::{
    ArrayEncoding, ConvertError, Decimal128, EncodedArray, FileHeader, FromValue, SectionType,
    Value, ValueArray, ValueKind,
};
