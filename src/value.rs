//! Value types for form field representation.
//!
//! This module provides the `Value` enum for individual field values, the
//! `FieldName` key type, and `FormValues`, the flat record a form is built
//! from. Conversions to and from `serde_json::Value` bridge typed structs
//! into the engine.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FormError;

/// Raw value of a single form field.
///
/// A field's value may itself be structured (arrays, tables); the engine
/// never looks inside it, only the schema does.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null/unset value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Table/object of key-value pairs
    Table(BTreeMap<String, Value>),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as a table.
    pub fn as_table(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Get a human-readable type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    /// Convert to `serde_json::Value`.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Table(table) => serde_json::Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Convert from `serde_json::Value`.
    ///
    /// Numbers that fit in an `i64` become `Integer`, everything else `Float`.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Table(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(m: BTreeMap<String, T>) -> Self {
        Value::Table(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Name of a form field.
///
/// Stable identity used as the key for values and error lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&FieldName> for FieldName {
    fn from(name: &FieldName) -> Self {
        name.clone()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flat record of field values keyed by field name.
///
/// This is the data that flows between the value store, the schema and the
/// submit action. Each consumer gets its own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<FieldName, Value>,
}

impl FormValues {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<FieldName>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(field.into(), value.into())
    }

    /// Get a value by field name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.values.get_mut(field)
    }

    /// Check if a field exists.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all field-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.values.iter()
    }

    /// Get all field names.
    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.values.keys()
    }

    /// Convert to a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_json()))
                .collect(),
        )
    }

    /// Build values from a JSON object.
    ///
    /// Anything other than an object cannot be a flat record and is rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Self, FormError> {
        match json {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (FieldName::from(k), Value::from_json(v)))
                .collect()),
            other => Err(FormError::InvalidDefaults {
                message: format!("expected an object of fields, got {}", json_type_name(&other)),
            }),
        }
    }

    /// Build values by serializing a typed struct.
    ///
    /// Each top-level field of `value` becomes one form field.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, FormError> {
        let json = serde_json::to_value(value).map_err(|e| FormError::InvalidDefaults {
            message: e.to_string(),
        })?;
        Self::from_json(json)
    }

    /// Decode the values into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl<K: Into<FieldName>, V: Into<Value>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FormValues {
    type Item = (FieldName, Value);
    type IntoIter = std::collections::btree_map::IntoIter<FieldName, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_value_type_checks() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(true).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_integer(), Some(42));
        assert_eq!(Value::Float(2.71).as_float(), Some(2.71));
        assert_eq!(Value::Integer(42).as_float(), Some(42.0));
        assert_eq!(Value::String("hello".to_string()).as_str(), Some("hello"));
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::Integer(42).type_name(), "integer");
        assert_eq!(Value::Float(2.71).type_name(), "float");
        assert_eq!(Value::String("test".to_string()).type_name(), "string");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
        assert_eq!(Value::Table(BTreeMap::new()).type_name(), "table");
    }

    #[test]
    fn test_value_json_conversion() {
        let mut table = BTreeMap::new();
        table.insert("street".to_string(), Value::from("Main St"));
        table.insert("number".to_string(), Value::from(12i64));
        let value = Value::Array(vec![Value::Table(table), Value::Float(1.5), Value::Null]);

        let json = value.to_json();
        assert_eq!(
            json,
            serde_json::json!([{"street": "Main St", "number": 12}, 1.5, null])
        );
        assert_eq!(Value::from_json(json), value);
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_field_name_lookup_by_str() {
        let values = FormValues::new().with("email", "a@b.com");
        assert_eq!(values.get("email").and_then(Value::as_str), Some("a@b.com"));
        assert!(values.contains("email"));
        assert!(!values.contains("password"));
        assert_eq!(FieldName::from("email").to_string(), "email");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Login {
        email: String,
        remember: bool,
    }

    #[test]
    fn test_from_serialize_and_decode() {
        let login = Login {
            email: "admin@example.com".to_string(),
            remember: true,
        };
        let values = FormValues::from_serialize(&login).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("remember"), Some(&Value::Bool(true)));

        let decoded: Login = values.decode().unwrap();
        assert_eq!(decoded, login);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = FormValues::from_json(serde_json::json!([1, 2]));
        assert!(matches!(result, Err(FormError::InvalidDefaults { .. })));
    }

    #[test]
    fn test_from_iterator() {
        let values: FormValues = vec![("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(values.fields().map(FieldName::as_str).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
