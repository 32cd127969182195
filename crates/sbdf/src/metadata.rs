//! Named, typed metadata properties and ordered property collections.

use sbdf_format::{UsageError, Value, ValueKind};

/// A named metadata property with an optional value and default.
///
/// Value and default, when present, must be plain values of the declared
/// kind. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataProperty {
    name: String,
    kind: ValueKind,
    value: Option<Value>,
    default: Option<Value>,
}

impl MetadataProperty {
    /// Build a property whose kind is inferred from its value.
    pub fn new(name: impl Into<String>, value: Value) -> Result<Self, UsageError> {
        let kind = plain_kind(&value)?;
        Self::of_kind(name, kind, Some(value), None)
    }

    /// Build a property with both a value and a default.
    pub fn with_default(
        name: impl Into<String>,
        value: Value,
        default: Value,
    ) -> Result<Self, UsageError> {
        let kind = plain_kind(&value)?;
        Self::of_kind(name, kind, Some(value), Some(default))
    }

    /// Build a property from its full wire shape.
    pub fn of_kind(
        name: impl Into<String>,
        kind: ValueKind,
        value: Option<Value>,
        default: Option<Value>,
    ) -> Result<Self, UsageError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UsageError::EmptyArgument("property name"));
        }
        if !kind.is_standard() {
            return Err(UsageError::InvalidColumnKind(kind));
        }
        for candidate in [&value, &default].into_iter().flatten() {
            if plain_kind(candidate)? != kind {
                return Err(UsageError::KindMismatch {
                    expected: kind,
                    actual: plain_kind(candidate)?,
                });
            }
        }
        Ok(Self {
            name,
            kind,
            value,
            default,
        })
    }

    /// The property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The property value, if one is set.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The default value, if one is set.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

fn plain_kind(value: &Value) -> Result<ValueKind, UsageError> {
    if !value.is_plain() {
        return Err(UsageError::EnvelopeValue);
    }
    value.kind().ok_or(UsageError::EnvelopeValue)
}

/// An insertion-ordered collection of uniquely named properties.
///
/// The collection is mutable until [`seal`](Self::seal) is called, after
/// which any mutation fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataCollection {
    properties: Vec<MetadataProperty>,
    sealed: bool,
}

impl MetadataCollection {
    /// An empty, mutable collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, keeping names unique.
    pub fn add(&mut self, property: MetadataProperty) -> Result<(), UsageError> {
        if self.sealed {
            return Err(UsageError::Sealed);
        }
        if self.contains(property.name()) {
            return Err(UsageError::DuplicateProperty(property.name().to_string()));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Convenience for adding a named value with an inferred kind.
    pub fn add_property(&mut self, name: impl Into<String>, value: Value) -> Result<(), UsageError> {
        self.add(MetadataProperty::new(name, value)?)
    }

    /// Look up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetadataProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Check whether a property with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MetadataProperty> {
        self.properties.iter()
    }

    /// Make the collection immutable.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Check whether the collection has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl<'a> IntoIterator for &'a MetadataCollection {
    type Item = &'a MetadataProperty;
    type IntoIter = std::slice::Iter<'a, MetadataProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
