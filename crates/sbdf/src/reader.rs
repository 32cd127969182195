//! Streaming row-major table reader.

use std::io::Read;

use sbdf_format::section::{self, SectionType};
use sbdf_format::{codec, EncodedArray, FormatError, UsageError, Value, ValueArray, ValueKind};

use crate::error::Error;
use crate::slice::{
    ColumnSlice, PROPERTY_ERROR_CODE, PROPERTY_HAS_REPLACED_VALUE, PROPERTY_IS_INVALID,
};
use crate::table::TableMetadata;

/// One selected column of the current slice: decoded values plus the
/// reserved sidebands, with any remaining properties kept as read.
#[derive(Debug, Clone)]
pub struct ColumnValues {
    values: ValueArray,
    invalid: Option<Vec<bool>>,
    replaced: Option<Vec<bool>>,
    errors: Option<Vec<String>>,
    extra: Vec<(String, EncodedArray)>,
}

impl ColumnValues {
    fn from_slice(slice: ColumnSlice) -> Self {
        let (values, properties) = slice.into_parts();
        let mut out = Self {
            values: values.into_array(),
            invalid: None,
            replaced: None,
            errors: None,
            extra: Vec::new(),
        };
        for (name, array) in properties {
            match name.as_str() {
                PROPERTY_IS_INVALID if array.kind() == ValueKind::Bool => {
                    if let ValueArray::Bool(flags) = array.into_array() {
                        out.invalid = Some(flags);
                    }
                }
                PROPERTY_HAS_REPLACED_VALUE if array.kind() == ValueKind::Bool => {
                    if let ValueArray::Bool(flags) = array.into_array() {
                        out.replaced = Some(flags);
                    }
                }
                PROPERTY_ERROR_CODE if array.kind() == ValueKind::String => {
                    if let ValueArray::String(codes) = array.into_array() {
                        out.errors = Some(codes);
                    }
                }
                _ => out.extra.push((name, array)),
            }
        }
        out
    }

    /// The decoded plain values of this column slice.
    #[must_use]
    pub fn values(&self) -> &ValueArray {
        &self.values
    }

    /// Number of rows in this slice.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Check whether a row is marked invalid.
    #[must_use]
    pub fn is_invalid(&self, row: usize) -> bool {
        self.invalid
            .as_ref()
            .is_some_and(|flags| flags.get(row).copied().unwrap_or(false))
    }

    /// Check whether a row is marked as replaced.
    #[must_use]
    pub fn has_replaced_value(&self, row: usize) -> bool {
        self.replaced
            .as_ref()
            .is_some_and(|flags| flags.get(row).copied().unwrap_or(false))
    }

    /// The row's error string, if one is present and non-empty.
    #[must_use]
    pub fn error_code(&self, row: usize) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|codes| codes.get(row))
            .map(String::as_str)
            .filter(|code| !code.is_empty())
    }

    /// Custom value properties beyond the reserved sidebands.
    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, &EncodedArray)> {
        self.extra
            .iter()
            .map(|(name, array)| (name.as_str(), array))
    }

    /// The row's value with sidebands applied: invalid wins, then error,
    /// then replaced, then the plain value.
    #[must_use]
    pub fn value_at(&self, row: usize) -> Value {
        if self.is_invalid(row) {
            return Value::Invalid;
        }
        if let Some(code) = self.error_code(row) {
            return Value::error(code);
        }
        let plain = self.values.get(row).unwrap_or(Value::Invalid);
        if self.has_replaced_value(row) {
            Value::replaced(plain)
        } else {
            plain
        }
    }
}

struct SliceData {
    columns: Vec<Option<ColumnValues>>,
    row_count: usize,
}

/// Reads table rows from a byte source, slice by slice.
///
/// An optional subset mask selects which columns to materialize; the
/// rest are skipped byte-for-byte. [`read_value`](Self::read_value)
/// yields values row-major across the selected columns and returns
/// `None` at the end-of-table marker.
pub struct TableReader<R: Read> {
    source: R,
    metadata: TableMetadata,
    selected: Vec<usize>,
    mask: Vec<bool>,
    slice: Option<SliceData>,
    row_cursor: usize,
    column_cursor: usize,
    finished: bool,
}

impl<R: Read> TableReader<R> {
    /// Create a reader that materializes every column.
    pub fn new(source: R, metadata: TableMetadata) -> Self {
        let mask = vec![true; metadata.column_count()];
        Self {
            selected: (0..metadata.column_count()).collect(),
            source,
            metadata,
            mask,
            slice: None,
            row_cursor: 0,
            column_cursor: 0,
            finished: false,
        }
    }

    /// Create a reader that materializes only the masked columns.
    pub fn with_subset(
        source: R,
        metadata: TableMetadata,
        mask: Vec<bool>,
    ) -> Result<Self, Error> {
        if mask.len() != metadata.column_count() {
            return Err(UsageError::SubsetLengthMismatch {
                mask: mask.len(),
                columns: metadata.column_count(),
            }
            .into());
        }
        let selected = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        Ok(Self {
            source,
            metadata,
            selected,
            mask,
            slice: None,
            row_cursor: 0,
            column_cursor: 0,
            finished: false,
        })
    }

    /// The table metadata this reader serves.
    #[must_use]
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// The materialized columns of the current slice, aligned with the
    /// table's column order; unselected columns are `None`.
    #[must_use]
    pub fn columns(&self) -> &[Option<ColumnValues>] {
        self.slice.as_ref().map_or(&[], |s| s.columns.as_slice())
    }

    /// Read the next table slice. Returns `false` at (and after) the
    /// end-of-table marker.
    pub fn read_next_table_slice(&mut self) -> Result<bool, Error> {
        if self.finished {
            return Ok(false);
        }
        match section::read_section_header(&mut self.source)? {
            SectionType::TableEnd => {
                self.finished = true;
                self.slice = None;
                tracing::trace!("end of table");
                Ok(false)
            }
            SectionType::TableSlice => {
                let declared = codec::length_to_usize(codec::read_i32(&mut self.source)?)?;
                if declared != self.metadata.column_count() {
                    return Err(FormatError::ColumnCountMismatch {
                        expected: self.metadata.column_count(),
                        actual: declared,
                    }
                    .into());
                }

                let mut columns = Vec::with_capacity(declared);
                for (index, column) in self.metadata.columns().iter().enumerate() {
                    if self.mask[index] {
                        let slice = ColumnSlice::read(&mut self.source)?;
                        let found = slice.values().kind();
                        if found != column.value_kind() {
                            return Err(FormatError::ValueKindMismatch {
                                expected: column.value_kind(),
                                found,
                            }
                            .into());
                        }
                        columns.push(Some(ColumnValues::from_slice(slice)));
                    } else {
                        ColumnSlice::skip(&mut self.source)?;
                        columns.push(None);
                    }
                }

                let row_count = columns
                    .iter()
                    .flatten()
                    .map(ColumnValues::row_count)
                    .min()
                    .unwrap_or(0);
                tracing::trace!(rows = row_count, "table slice read");
                self.slice = Some(SliceData { columns, row_count });
                self.row_cursor = 0;
                self.column_cursor = 0;
                Ok(true)
            }
            found => Err(FormatError::UnexpectedSectionType {
                expected: SectionType::TableSlice,
                found,
            }
            .into()),
        }
    }

    /// Read the next value in row-major order across the selected
    /// columns. Returns `Ok(None)` once the table is exhausted.
    pub fn read_value(&mut self) -> Result<Option<Value>, Error> {
        loop {
            let exhausted = match &self.slice {
                None => true,
                Some(slice) => self.selected.is_empty() || self.row_cursor >= slice.row_count,
            };
            if exhausted {
                if !self.read_next_table_slice()? {
                    return Ok(None);
                }
                continue;
            }

            // The cursors stay in range between slice loads, and selected
            // columns are always materialized.
            let Some(slice) = &self.slice else { continue };
            let column_index = self.selected[self.column_cursor];
            let Some(column) = &slice.columns[column_index] else {
                self.advance_cursor();
                continue;
            };
            let value = column.value_at(self.row_cursor);
            self.advance_cursor();
            return Ok(Some(value));
        }
    }

    fn advance_cursor(&mut self) {
        self.column_cursor += 1;
        if self.column_cursor == self.selected.len() {
            self.column_cursor = 0;
            self.row_cursor += 1;
        }
    }

    /// A lazy row-major iterator over the remaining values.
    ///
    /// Single-pass and not restartable; it shares the reader's cursor.
    pub fn values(&mut self) -> Values<'_, R> {
        Values { reader: self }
    }

    /// Give the source back to the caller, positioned after whatever was
    /// last read.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Iterator returned by [`TableReader::values`].
pub struct Values<'a, R: Read> {
    reader: &'a mut TableReader<R>,
}

impl<R: Read> Iterator for Values<'_, R> {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_value().transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sbdf_format::ValueKind;

    use crate::column::ColumnMetadata;
    use crate::table::TableMetadataBuilder;
    use crate::writer::TableWriter;

    use super::*;

    fn metadata() -> TableMetadata {
        let mut builder = TableMetadataBuilder::new();
        builder.add_column(ColumnMetadata::new("a", ValueKind::Int).unwrap());
        builder.add_column(ColumnMetadata::new("b", ValueKind::String).unwrap());
        builder.build().unwrap()
    }

    fn write_rows() -> Vec<u8> {
        let mut writer = TableWriter::new(Vec::new(), metadata()).unwrap();
        for (n, s) in [(1, "x"), (2, "y"), (3, "z")] {
            writer.add_value(Value::Int(n)).unwrap();
            writer.add_value(Value::from(s)).unwrap();
        }
        writer.write_end_of_table().unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_row_major_values() {
        let bytes = write_rows();
        let mut reader = TableReader::new(&bytes[..], metadata());
        let mut seen = Vec::new();
        while let Some(value) = reader.read_value().unwrap() {
            seen.push(value);
        }
        assert_eq!(
            seen,
            vec![
                Value::Int(1),
                Value::from("x"),
                Value::Int(2),
                Value::from("y"),
                Value::Int(3),
                Value::from("z"),
            ]
        );
        // The sentinel repeats once the table is done.
        assert!(reader.read_value().unwrap().is_none());
    }

    #[test]
    fn test_subset_mask() {
        let bytes = write_rows();
        let mut reader =
            TableReader::with_subset(&bytes[..], metadata(), vec![false, true]).unwrap();
        let values: Result<Vec<_>, _> = reader.values().collect();
        assert_eq!(
            values.unwrap(),
            vec![Value::from("x"), Value::from("y"), Value::from("z")]
        );
        assert!(reader.columns()[0].is_none());
    }

    #[test]
    fn test_subset_mask_length_checked() {
        let bytes = write_rows();
        assert!(matches!(
            TableReader::with_subset(&bytes[..], metadata(), vec![true]),
            Err(Error::Usage(UsageError::SubsetLengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_all_false_mask_drains_to_end() {
        let bytes = write_rows();
        let mut reader =
            TableReader::with_subset(&bytes[..], metadata(), vec![false, false]).unwrap();
        assert!(reader.read_value().unwrap().is_none());
    }

    #[test]
    fn test_columns_accessor() {
        let bytes = write_rows();
        let mut reader = TableReader::new(&bytes[..], metadata());
        assert!(reader.read_next_table_slice().unwrap());
        let columns = reader.columns();
        assert_eq!(columns.len(), 2);
        let a = columns[0].as_ref().unwrap();
        assert_eq!(a.values(), &ValueArray::Int(vec![1, 2, 3]));
        assert!(!reader.read_next_table_slice().unwrap());
    }

    #[test]
    fn test_truncated_stream_is_eof() {
        let bytes = write_rows();
        // Drop exactly the three-byte end-of-table marker.
        let truncated = &bytes[..bytes.len() - 3];
        let mut reader = TableReader::new(truncated, metadata());
        assert!(reader.read_next_table_slice().unwrap());
        assert!(matches!(
            reader.read_next_table_slice(),
            Err(Error::Format(FormatError::UnexpectedEof))
        ));
    }
}
