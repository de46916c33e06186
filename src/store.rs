//! Value store: current and default field values.
//!
//! The store owns the only mutable copy of the field values. Its key set is
//! fixed at construction; every mutation bumps a version counter that the
//! derived validation cache is keyed on.

use std::collections::BTreeSet;

use crate::error::FormError;
use crate::value::{FieldName, FormValues, Value};

/// Current values, defaults and dirtiness of one form.
#[derive(Debug, Clone)]
pub struct ValueStore {
    values: FormValues,
    defaults: FormValues,
    dirty: BTreeSet<FieldName>,
    version: u64,
}

impl ValueStore {
    /// Create a store whose values start as a copy of `defaults`.
    pub fn new(defaults: FormValues) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            dirty: BTreeSet::new(),
            version: 0,
        }
    }

    /// Current value of a field, or `Value::Null` if the field does not exist.
    pub fn get(&self, field: &str) -> Value {
        self.values.get(field).cloned().unwrap_or_default()
    }

    /// Replace one field's value and mark it dirty.
    ///
    /// Unknown fields are rejected and leave the store untouched.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), FormError> {
        let slot = self
            .values
            .get_mut(field)
            .ok_or_else(|| FormError::UnknownField {
                field: FieldName::from(field),
            })?;
        *slot = value;
        self.dirty.insert(FieldName::from(field));
        self.version += 1;
        Ok(())
    }

    /// Restore the defaults and clear dirtiness.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.dirty.clear();
        self.version += 1;
    }

    /// Owned copy of the current values.
    pub fn snapshot(&self) -> FormValues {
        self.values.clone()
    }

    /// Borrow the current values.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Borrow the defaults.
    pub fn defaults(&self) -> &FormValues {
        &self.defaults
    }

    /// Check if a field exists.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains(field)
    }

    /// True once any field has been set since construction or the last reset.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// True once `field` has been set since construction or the last reset,
    /// even if it was set back to its default.
    pub fn is_field_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Fields set since construction or the last reset.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &FieldName> {
        self.dirty.iter()
    }

    /// Mutation counter; changes on every `set` and `reset`.
    pub fn version(&self) -> u64 {
        self.version
    }
}
