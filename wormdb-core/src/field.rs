//! Field descriptors.
//!
//! A [`Field`] declares one attribute of a document schema: the key it is stored
//! under, whether it is the primary key, and the value substituted when the
//! attribute is assigned null. Descriptors are shared, read-only, by every
//! document of a registered schema and mediate all reads and writes of the
//! attribute into the document's backing record.

use serde_json::Value;

use crate::{
    document::DynDocument,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Declaration of a single document attribute.
///
/// # Example
///
/// ```ignore
/// use wormdb::field::Field;
///
/// let email = Field::new().primary_key(true);
/// let age = Field::new().named("years").with_default(18);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    name: Option<String>,
    primary_key: bool,
    default: Option<Value>,
}

impl Field {
    /// Creates an unnamed, non-primary field without a default.
    ///
    /// The name is taken from the schema attribute during registration.
    pub fn new() -> Self {
        Field {
            name: None,
            primary_key: false,
            default: None,
        }
    }

    /// Stores the attribute under `name` instead of the attribute's own name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks (or unmarks) this field as the schema's primary key.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Sets the value substituted when the attribute is assigned null.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The storage key, once known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Takes `attribute` as the storage key unless a name was given explicitly.
    ///
    /// Calling it again has no effect.
    pub fn resolve_name(&mut self, attribute: &str) {
        if self.name.is_none() {
            self.name = Some(attribute.to_string());
        }
    }

    /// Reads this attribute from `document`, or `None` if it was never set.
    pub fn get<'a>(&self, document: &'a DynDocument) -> Option<&'a Value> {
        self.name
            .as_deref()
            .and_then(|name| document.to_dict().get(name))
    }

    /// Writes `value` into `document`.
    ///
    /// A null value is replaced by the field default when the default is present
    /// and not itself null.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the field has no name yet,
    /// which only happens for descriptors that never went through schema registration.
    pub fn set(&self, document: &mut DynDocument, value: impl Into<Value>) -> DocumentStoreResult<()> {
        let name = self.name.as_deref().ok_or_else(|| {
            DocumentStoreError::InvalidDocument("field has not been registered with a schema".to_string())
        })?;

        let mut value = value.into();
        if value.is_null() {
            if let Some(default) = self.default.as_ref().filter(|default| !default.is_null()) {
                value = default.clone();
            }
        }

        document.data_mut().insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_name_only_fills_a_missing_name() {
        let mut unnamed = Field::new();
        unnamed.resolve_name("email");
        unnamed.resolve_name("other");
        assert_eq!(unnamed.name(), Some("email"));

        let mut named = Field::new().named("mail");
        named.resolve_name("email");
        assert_eq!(named.name(), Some("mail"));
    }

    #[test]
    fn builder_flags() {
        let field = Field::new().primary_key(true).with_default("x");
        assert!(field.is_primary_key());
        assert_eq!(field.default_value(), Some(&Value::from("x")));
        assert!(!Field::new().is_primary_key());
    }
}
