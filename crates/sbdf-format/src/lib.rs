//! # sbdf-format
//!
//! Wire-level codec for SBDF, a columnar binary format for typed,
//! metadata-rich data tables.
//!
//! This crate owns the bit-exact pieces of the format: little-endian
//! scalar and varint encoding, the value-kind system, primitive value and
//! homogeneous-array I/O, the three self-describing array encodings
//! (plain, run-length, packed-bit), 128-bit decimals, epoch-shifted
//! temporal values, and section framing. Table metadata and the streaming
//! readers and writers live in the higher-level `sbdf` crate.
//!
//! ## Design Philosophy
//!
//! Encoding targets [`bytes::BufMut`] so whole sections can be assembled
//! in memory and handed to a sink in one write; decoding pulls from any
//! [`std::io::Read`]. The crate never owns a file or socket.
//!
//! ## Example
//!
//! ```rust
//! use sbdf_format::{ArrayEncoding, EncodedArray, ValueArray};
//!
//! let array = ValueArray::Int(vec![1, 1, 1, 2]);
//! let encoded = EncodedArray::run_length(array).expect("Int supports RLE");
//! let bytes = encoded.to_bytes().expect("encodes");
//! let back = EncodedArray::read(&mut bytes.as_ref()).expect("decodes");
//! assert_eq!(back.encoding(), ArrayEncoding::RunLength);
//! assert_eq!(back.to_array(), &ValueArray::Int(vec![1, 1, 1, 2]));
//! ```

pub mod array;
pub mod codec;
pub mod decimal;
pub mod error;
pub mod from_value;
pub mod primitive;
pub mod section;
pub mod temporal;
pub mod types;
pub mod value;

pub use array::{ArrayEncoding, EncodedArray, ValueArray};
pub use decimal::{Decimal128, MAX_COEFFICIENT, MAX_SCALE};
pub use error::{FormatError, UsageError};
pub use from_value::{ConvertError, FromValue};
pub use section::{FileHeader, SectionType, MAGIC};
pub use types::ValueKind;
pub use value::Value;
