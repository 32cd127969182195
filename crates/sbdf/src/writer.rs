//! Streaming row-major table writer.

use std::io::Write;

use bytes::BytesMut;
use sbdf_format::section::{self, SectionType};
use sbdf_format::{EncodedArray, UsageError, Value, ValueArray, ValueKind};

use crate::error::Error;
use crate::slice::{
    ColumnSlice, TableSlice, PROPERTY_ERROR_CODE, PROPERTY_HAS_REPLACED_VALUE, PROPERTY_IS_INVALID,
};
use crate::table::TableMetadata;

/// Rows buffered per column before a slice is emitted.
pub const SLICE_LIMIT: usize = 10_000;

/// Buffered values and lazily allocated sidebands for one column.
///
/// Sideband lists come into being the first time an envelope of their
/// kind appears in the current slice, back-filled with defaults for the
/// earlier rows.
struct ColumnBuffer {
    values: ValueArray,
    invalid: Option<Vec<bool>>,
    replaced: Option<Vec<bool>>,
    errors: Option<Vec<String>>,
}

impl ColumnBuffer {
    fn new(kind: ValueKind) -> Result<Self, UsageError> {
        Ok(Self {
            values: ValueArray::with_capacity(kind, 1024)?,
            invalid: None,
            replaced: None,
            errors: None,
        })
    }

    fn mark_bool(slot: &mut Option<Vec<bool>>, row: usize) {
        let list = slot.get_or_insert_with(|| vec![false; row]);
        list.push(true);
    }

    fn push(&mut self, value: Value) -> Result<(), UsageError> {
        let row = self.values.len();
        match value {
            Value::Invalid => {
                self.values.push_default();
                Self::mark_bool(&mut self.invalid, row);
            }
            Value::Error(message) => {
                self.values.push_default();
                let list = self
                    .errors
                    .get_or_insert_with(|| vec![String::new(); row]);
                list.push(message);
            }
            Value::Replaced(inner) => {
                if !inner.is_plain() {
                    return Err(UsageError::NestedEnvelope);
                }
                self.values.push(*inner)?;
                Self::mark_bool(&mut self.replaced, row);
            }
            plain => self.values.push(plain)?,
        }

        // Pad whichever sidebands exist but were not touched this row.
        for slot in [&mut self.invalid, &mut self.replaced] {
            if let Some(list) = slot {
                if list.len() <= row {
                    list.push(false);
                }
            }
        }
        if let Some(list) = &mut self.errors {
            if list.len() <= row {
                list.push(String::new());
            }
        }
        Ok(())
    }

    /// Drain the buffer into a column slice, resetting for the next one.
    fn take_slice(&mut self) -> Result<ColumnSlice, UsageError> {
        let kind = self.values.kind();
        let values = std::mem::replace(&mut self.values, ValueArray::new(kind)?);
        let mut slice = ColumnSlice::new(EncodedArray::with_default_encoding(values));
        if let Some(invalid) = self.invalid.take() {
            slice.add_property(
                PROPERTY_IS_INVALID,
                EncodedArray::with_default_encoding(ValueArray::Bool(invalid)),
            )?;
        }
        if let Some(replaced) = self.replaced.take() {
            slice.add_property(
                PROPERTY_HAS_REPLACED_VALUE,
                EncodedArray::with_default_encoding(ValueArray::Bool(replaced)),
            )?;
        }
        if let Some(errors) = self.errors.take() {
            slice.add_property(
                PROPERTY_ERROR_CODE,
                EncodedArray::with_default_encoding(ValueArray::String(errors)),
            )?;
        }
        Ok(slice)
    }
}

/// Writes table rows to a byte sink as a sequence of slice sections.
///
/// Values are fed row-major with [`add_value`](Self::add_value); every
/// [`SLICE_LIMIT`] complete rows a slice is flushed. Finish with
/// [`write_end_of_table`](Self::write_end_of_table). The writer never
/// closes the sink; on error the stream may hold a partial emit, which
/// the caller is expected to discard.
pub struct TableWriter<W: Write> {
    sink: W,
    metadata: TableMetadata,
    columns: Vec<ColumnBuffer>,
    column_cursor: usize,
    row_cursor: usize,
}

impl<W: Write> TableWriter<W> {
    /// Create a writer over a sink for a built table.
    pub fn new(sink: W, metadata: TableMetadata) -> Result<Self, Error> {
        let columns = metadata
            .columns()
            .iter()
            .map(|c| ColumnBuffer::new(c.value_kind()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sink,
            metadata,
            columns,
            column_cursor: 0,
            row_cursor: 0,
        })
    }

    /// The table metadata this writer serves.
    #[must_use]
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// Append the next value in row-major order.
    ///
    /// A plain value must match the current column's kind; invalid,
    /// error, and replaced envelopes are accepted in any column and are
    /// demultiplexed into sideband arrays at flush.
    pub fn add_value(&mut self, value: Value) -> Result<(), Error> {
        if self.columns.is_empty() {
            return Err(UsageError::NoColumns.into());
        }
        self.columns[self.column_cursor].push(value)?;
        self.column_cursor += 1;
        if self.column_cursor == self.columns.len() {
            self.column_cursor = 0;
            self.row_cursor += 1;
            if self.row_cursor == SLICE_LIMIT {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Append one full row of values.
    pub fn add_row<I>(&mut self, row: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Value>,
    {
        for value in row {
            self.add_value(value)?;
        }
        Ok(())
    }

    /// Emit the buffered rows as one table slice. A flush with nothing
    /// buffered emits nothing.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.columns.iter().all(|c| c.values.is_empty()) {
            return Ok(());
        }
        let rows = self.row_cursor;
        let slices = self
            .columns
            .iter_mut()
            .map(ColumnBuffer::take_slice)
            .collect::<Result<Vec<_>, _>>()?;
        let slice = TableSlice::new(&self.metadata, slices)?;

        let mut buf = BytesMut::new();
        slice.encode(&mut buf)?;
        self.sink.write_all(&buf)?;
        self.sink.flush()?;
        tracing::debug!(rows, bytes = buf.len(), "table slice written");

        self.column_cursor = 0;
        self.row_cursor = 0;
        Ok(())
    }

    /// Flush any buffered rows and write the end-of-table marker.
    pub fn write_end_of_table(&mut self) -> Result<(), Error> {
        self.flush()?;
        let mut buf = BytesMut::with_capacity(3);
        section::write_section_header(&mut buf, SectionType::TableEnd);
        self.sink.write_all(&buf)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Give the sink back to the caller.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sbdf_format::ValueKind;

    use crate::column::ColumnMetadata;
    use crate::table::TableMetadataBuilder;

    use super::*;

    fn single_int_metadata() -> TableMetadata {
        let mut builder = TableMetadataBuilder::new();
        builder.add_column(ColumnMetadata::new("n", ValueKind::Int).unwrap());
        builder.build().unwrap()
    }

    #[test]
    fn test_kind_checked_on_add() {
        let mut writer = TableWriter::new(Vec::new(), single_int_metadata()).unwrap();
        writer.add_value(Value::Int(1)).unwrap();
        assert!(matches!(
            writer.add_value(Value::from("nope")),
            Err(Error::Usage(UsageError::KindMismatch { .. }))
        ));
        // Envelopes are accepted in any column.
        writer.add_value(Value::Invalid).unwrap();
        writer.add_value(Value::error("bad")).unwrap();
        writer.add_value(Value::replaced(Value::Int(9))).unwrap();
    }

    #[test]
    fn test_nested_envelope_rejected() {
        let mut writer = TableWriter::new(Vec::new(), single_int_metadata()).unwrap();
        assert!(matches!(
            writer.add_value(Value::replaced(Value::Invalid)),
            Err(Error::Usage(UsageError::NestedEnvelope))
        ));
    }

    #[test]
    fn test_empty_writer_emits_only_end_marker() {
        let mut writer = TableWriter::new(Vec::new(), single_int_metadata()).unwrap();
        writer.write_end_of_table().unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..], &[0xDF, 0x5B, 0x05]);
    }

    #[test]
    fn test_no_columns_rejected() {
        let metadata = TableMetadataBuilder::new().build().unwrap();
        let mut writer = TableWriter::new(Vec::new(), metadata).unwrap();
        assert!(matches!(
            writer.add_value(Value::Int(1)),
            Err(Error::Usage(UsageError::NoColumns))
        ));
    }

    #[test]
    fn test_sideband_backfill() {
        let mut buffer = ColumnBuffer::new(ValueKind::Int).unwrap();
        buffer.push(Value::Int(1)).unwrap();
        buffer.push(Value::Int(2)).unwrap();
        buffer.push(Value::Invalid).unwrap();
        buffer.push(Value::Int(4)).unwrap();
        assert_eq!(
            buffer.invalid.as_deref(),
            Some(&[false, false, true, false][..])
        );
        assert!(buffer.replaced.is_none());
        assert!(buffer.errors.is_none());
    }
}
