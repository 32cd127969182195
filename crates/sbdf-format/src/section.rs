//! Section framing: the magic number, section type tags, and the file
//! header with its format-version gate.

use core::fmt;
use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::codec;
use crate::error::FormatError;

/// The two magic bytes that open every section: 0x5BDF little-endian.
pub const MAGIC: [u8; 2] = [0xDF, 0x5B];

/// Section type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SectionType {
    /// File header with the format version.
    FileHeader = 0x01,
    /// Table metadata.
    TableMetadata = 0x02,
    /// A table slice holding one column slice per column.
    TableSlice = 0x03,
    /// A single column's values and value properties.
    ColumnSlice = 0x04,
    /// End-of-table marker.
    TableEnd = 0x05,
}

impl SectionType {
    /// Map a raw byte to a section type.
    pub fn from_u8(value: u8) -> Result<Self, FormatError> {
        match value {
            0x01 => Ok(Self::FileHeader),
            0x02 => Ok(Self::TableMetadata),
            0x03 => Ok(Self::TableSlice),
            0x04 => Ok(Self::ColumnSlice),
            0x05 => Ok(Self::TableEnd),
            other => Err(FormatError::UnknownSectionType(other)),
        }
    }

    /// The on-wire byte code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileHeader => "file header",
            Self::TableMetadata => "table metadata",
            Self::TableSlice => "table slice",
            Self::ColumnSlice => "column slice",
            Self::TableEnd => "table end",
        };
        f.write_str(name)
    }
}

/// Write the magic number and a section type tag.
pub fn write_section_header(dst: &mut impl BufMut, section: SectionType) {
    dst.put_slice(&MAGIC);
    dst.put_u8(section.code());
}

/// Read the magic number and the following section type tag.
pub fn read_section_header<R: Read>(src: &mut R) -> Result<SectionType, FormatError> {
    let mut magic = [0u8; 2];
    src.read_exact(&mut magic).map_err(FormatError::from)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic {
            found: u16::from_le_bytes(magic),
        });
    }
    SectionType::from_u8(codec::read_u8(src)?)
}

/// Read a section header and require a specific section type.
pub fn expect_section<R: Read>(src: &mut R, expected: SectionType) -> Result<(), FormatError> {
    let found = read_section_header(src)?;
    if found != expected {
        return Err(FormatError::UnexpectedSectionType { expected, found });
    }
    Ok(())
}

/// The file header: format version behind the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Major format version.
    pub major: u8,
    /// Minor format version.
    pub minor: u8,
}

impl FileHeader {
    /// The version this crate writes.
    pub const CURRENT: Self = Self { major: 1, minor: 0 };

    /// All versions this crate can read.
    pub const KNOWN: [Self; 1] = [Self::CURRENT];

    /// Check if this version can be read.
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(self)
    }

    /// Encode this header into a buffer.
    pub fn encode(&self, dst: &mut impl BufMut) {
        write_section_header(dst, SectionType::FileHeader);
        dst.put_u8(self.major);
        dst.put_u8(self.minor);
    }

    /// Write the current version's header to a sink.
    pub fn write_current<W: Write>(sink: &mut W) -> io::Result<()> {
        let mut buf = BytesMut::with_capacity(5);
        Self::CURRENT.encode(&mut buf);
        sink.write_all(&buf)
    }

    /// Read and validate a file header.
    pub fn read<R: Read>(src: &mut R) -> Result<Self, FormatError> {
        expect_section(src, SectionType::FileHeader)?;
        let header = Self {
            major: codec::read_u8(src)?,
            minor: codec::read_u8(src)?,
        };
        if !header.is_known() {
            return Err(FormatError::UnsupportedVersion {
                major: header.major,
                minor: header.minor,
            });
        }
        Ok(header)
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_header_bytes() {
        let mut buf = Vec::new();
        FileHeader::write_current(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0xDF, 0x5B, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_file_header_roundtrip() {
        let mut buf = Vec::new();
        FileHeader::write_current(&mut buf).unwrap();
        let header = FileHeader::read(&mut &buf[..]).unwrap();
        assert_eq!(header, FileHeader::CURRENT);
        assert_eq!(header.to_string(), "1.0");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let bytes = [0xDF, 0x5B, 0x01, 0x02, 0x00];
        assert!(matches!(
            FileHeader::read(&mut &bytes[..]),
            Err(FormatError::UnsupportedVersion { major: 2, minor: 0 })
        ));
    }

    #[test]
    fn test_bad_magic() {
        let bytes = [0xDE, 0xAD, 0x01];
        assert!(matches!(
            read_section_header(&mut &bytes[..]),
            Err(FormatError::BadMagic { found: 0xADDE })
        ));
    }

    #[test]
    fn test_unknown_section_tag() {
        let bytes = [0xDF, 0x5B, 0x09];
        assert!(matches!(
            read_section_header(&mut &bytes[..]),
            Err(FormatError::UnknownSectionType(0x09))
        ));
    }

    #[test]
    fn test_expect_section_mismatch() {
        let bytes = [0xDF, 0x5B, 0x05];
        assert!(matches!(
            expect_section(&mut &bytes[..], SectionType::TableSlice),
            Err(FormatError::UnexpectedSectionType {
                expected: SectionType::TableSlice,
                found: SectionType::TableEnd,
            })
        ));
    }

    #[test]
    fn test_eof_on_empty_source() {
        assert!(matches!(
            read_section_header(&mut &[][..]),
            Err(FormatError::UnexpectedEof)
        ));
    }
}
