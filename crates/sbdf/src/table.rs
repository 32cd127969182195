//! Table metadata and its wire section.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};
use sbdf_format::section::{self, SectionType};
use sbdf_format::{codec, primitive, FormatError, UsageError, Value, ValueKind};

use crate::column::{ColumnMetadata, PROPERTY_DATA_TYPE, PROPERTY_NAME};
use crate::error::Error;
use crate::metadata::{MetadataCollection, MetadataProperty};

/// One distinct column-property key: its name, kind, and table-wide
/// default.
#[derive(Debug, Clone)]
struct ColumnKey {
    name: String,
    kind: ValueKind,
    default: Option<Value>,
}

/// Immutable metadata for a table: its own properties plus an ordered
/// sequence of column metadata. Column order matches slice order on wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetadata {
    properties: MetadataCollection,
    columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// The table's own properties.
    #[must_use]
    pub fn properties(&self) -> &MetadataCollection {
        &self.properties
    }

    /// The columns in wire order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with the given name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// The distinct column-property keys in first-seen order. Every
    /// column's conceptual property list starts with `Name` and
    /// `DataType`, so those keys always lead.
    fn distinct_column_keys(&self) -> Vec<ColumnKey> {
        let mut keys = vec![
            ColumnKey {
                name: PROPERTY_NAME.to_string(),
                kind: ValueKind::String,
                default: None,
            },
            ColumnKey {
                name: PROPERTY_DATA_TYPE.to_string(),
                kind: ValueKind::Binary,
                default: None,
            },
        ];
        for column in &self.columns {
            for property in column.assigned_properties() {
                if !keys.iter().any(|k| k.name == property.name()) {
                    keys.push(ColumnKey {
                        name: property.name().to_string(),
                        kind: property.kind(),
                        default: property.default_value().cloned(),
                    });
                }
            }
        }
        keys
    }

    fn key_value(column: &ColumnMetadata, key: &ColumnKey) -> Option<Value> {
        match key.name.as_str() {
            PROPERTY_NAME => Some(Value::from(column.name())),
            PROPERTY_DATA_TYPE => Some(Value::Binary(column.value_kind().to_binary())),
            name => column.property(name).and_then(|p| p.value().cloned()),
        }
    }

    fn encode(&self, dst: &mut BytesMut) -> Result<(), FormatError> {
        section::write_section_header(dst, SectionType::TableMetadata);

        dst.put_i32_le(self.properties.len() as i32);
        for property in &self.properties {
            codec::write_string(dst, property.name());
            dst.put_u8(property.kind().code());
            write_optional_value(dst, property.value())?;
            write_optional_value(dst, property.default_value())?;
        }

        dst.put_i32_le(self.columns.len() as i32);

        let keys = self.distinct_column_keys();
        dst.put_i32_le(keys.len() as i32);
        for key in &keys {
            codec::write_string(dst, &key.name);
            dst.put_u8(key.kind.code());
            write_optional_value(dst, key.default.as_ref())?;
        }

        for column in &self.columns {
            for key in &keys {
                match Self::key_value(column, key) {
                    Some(value) => {
                        codec::write_bool(dst, true);
                        primitive::write_value(dst, &value)?;
                    }
                    None => codec::write_bool(dst, false),
                }
            }
        }
        Ok(())
    }

    /// Write the table-metadata section to a sink.
    pub fn write<W: Write>(&self, sink: &mut W) -> Result<(), Error> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        sink.write_all(&buf)?;
        Ok(())
    }

    /// Read a table-metadata section from a source.
    pub fn read<R: Read>(source: &mut R) -> Result<Self, Error> {
        section::expect_section(source, SectionType::TableMetadata)?;

        let mut builder = TableMetadataBuilder::new();
        let property_count = codec::length_to_usize(codec::read_i32(source)?)?;
        for _ in 0..property_count {
            let name = codec::read_string(source)?;
            let kind = ValueKind::from_wire(codec::read_u8(source)?)?;
            let value = read_optional_value(source, kind)?;
            let default = read_optional_value(source, kind)?;
            builder
                .properties
                .add(MetadataProperty::of_kind(name, kind, value, default)?)?;
        }

        let column_count = codec::length_to_usize(codec::read_i32(source)?)?;

        let key_count = codec::length_to_usize(codec::read_i32(source)?)?;
        let mut keys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            let name = codec::read_string(source)?;
            let kind = ValueKind::from_wire(codec::read_u8(source)?)?;
            let default = read_optional_value(source, kind)?;
            keys.push(ColumnKey {
                name,
                kind,
                default,
            });
        }

        for _ in 0..column_count {
            let mut name: Option<String> = None;
            let mut kind: Option<ValueKind> = None;
            let mut assigned: Vec<(ColumnKey, Value)> = Vec::new();

            for key in &keys {
                if !codec::read_bool(source)? {
                    continue;
                }
                let value = primitive::read_value(source, key.kind)?;
                match (key.name.as_str(), value) {
                    (PROPERTY_NAME, Value::String(s)) => name = Some(s),
                    (PROPERTY_DATA_TYPE, Value::Binary(b)) => {
                        kind = Some(ValueKind::from_binary(&b)?);
                    }
                    (_, value) => assigned.push((key.clone(), value)),
                }
            }

            let name = name.ok_or(FormatError::MissingColumnProperty(PROPERTY_NAME))?;
            let kind = kind.ok_or(FormatError::MissingColumnProperty(PROPERTY_DATA_TYPE))?;
            let mut column = ColumnMetadata::new(name, kind)?;
            for (key, value) in assigned {
                column.add(MetadataProperty::of_kind(
                    key.name,
                    key.kind,
                    Some(value),
                    key.default,
                )?)?;
            }
            builder.add_column(column);
        }

        Ok(builder.build()?)
    }
}

fn write_optional_value(dst: &mut BytesMut, value: Option<&Value>) -> Result<(), FormatError> {
    match value {
        Some(value) => {
            codec::write_bool(dst, true);
            primitive::write_value(dst, value)
        }
        None => {
            codec::write_bool(dst, false);
            Ok(())
        }
    }
}

fn read_optional_value<R: Read>(
    src: &mut R,
    kind: ValueKind,
) -> Result<Option<Value>, FormatError> {
    if codec::read_bool(src)? {
        Ok(Some(primitive::read_value(src, kind)?))
    } else {
        Ok(None)
    }
}

/// Builder for [`TableMetadata`].
///
/// Columns and table properties accumulate mutably; [`build`](Self::build)
/// validates the shared-column-property invariant and seals everything.
#[derive(Debug, Default)]
pub struct TableMetadataBuilder {
    properties: MetadataCollection,
    columns: Vec<ColumnMetadata>,
}

impl TableMetadataBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Column order becomes wire order.
    pub fn add_column(&mut self, column: ColumnMetadata) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Add a table property with an inferred kind.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<&mut Self, UsageError> {
        self.properties.add(MetadataProperty::new(name, value)?)?;
        Ok(self)
    }

    /// Add a prebuilt table property.
    pub fn add_table_property(&mut self, property: MetadataProperty) -> Result<&mut Self, UsageError> {
        self.properties.add(property)?;
        Ok(self)
    }

    /// Validate and seal into an immutable [`TableMetadata`].
    ///
    /// A property name shared by multiple columns must carry the same
    /// kind and default everywhere; a mismatch fails the build before any
    /// bytes are produced.
    pub fn build(mut self) -> Result<TableMetadata, UsageError> {
        {
            let mut seen: Vec<(&str, ValueKind, Option<&Value>)> = Vec::new();
            for column in &self.columns {
                for property in column.assigned_properties() {
                    match seen.iter().find(|(name, _, _)| *name == property.name()) {
                        Some((_, kind, default)) => {
                            if *kind != property.kind() || *default != property.default_value() {
                                return Err(UsageError::PropertyConflict {
                                    name: property.name().to_string(),
                                });
                            }
                        }
                        None => {
                            seen.push((property.name(), property.kind(), property.default_value()));
                        }
                    }
                }
            }
        }

        self.properties.seal();
        for column in &mut self.columns {
            column.seal();
        }
        Ok(TableMetadata {
            properties: self.properties,
            columns: self.columns,
        })
    }
}
