//! Per-column metadata.

use sbdf_format::{UsageError, Value, ValueKind};

use crate::metadata::{MetadataCollection, MetadataProperty};

/// Reserved column property holding the column name.
pub const PROPERTY_NAME: &str = "Name";

/// Reserved column property holding the serialized value kind.
pub const PROPERTY_DATA_TYPE: &str = "DataType";

/// Metadata for one column: its name, its value kind, and any further
/// assigned properties.
///
/// On wire the name and kind travel as the reserved `Name` (String) and
/// `DataType` (Binary, one kind byte) properties, emitted like any other
/// column property.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    name: String,
    kind: ValueKind,
    properties: MetadataCollection,
}

impl ColumnMetadata {
    /// Build column metadata for a name and value kind.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Result<Self, UsageError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UsageError::EmptyArgument("column name"));
        }
        if !kind.is_standard() {
            return Err(UsageError::InvalidColumnKind(kind));
        }
        Ok(Self {
            name,
            kind,
            properties: MetadataCollection::new(),
        })
    }

    /// The column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's value kind.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// Add an assigned property. The reserved names are refused.
    pub fn add(&mut self, property: MetadataProperty) -> Result<(), UsageError> {
        if property.name() == PROPERTY_NAME || property.name() == PROPERTY_DATA_TYPE {
            return Err(UsageError::DuplicateProperty(property.name().to_string()));
        }
        self.properties.add(property)
    }

    /// Convenience for adding a named value with an inferred kind.
    pub fn add_property(&mut self, name: impl Into<String>, value: Value) -> Result<(), UsageError> {
        self.add(MetadataProperty::new(name, value)?)
    }

    /// Iterate the assigned properties, excluding `Name` and `DataType`.
    pub fn assigned_properties(&self) -> impl Iterator<Item = &MetadataProperty> {
        self.properties.iter()
    }

    /// Look up an assigned property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&MetadataProperty> {
        self.properties.get(name)
    }

    /// Make the column metadata immutable.
    pub(crate) fn seal(&mut self) {
        self.properties.seal();
    }
}
