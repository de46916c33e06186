//! Schema adapters.
//!
//! A schema is the one capability the engine consumes: classify a set of
//! field values as accepted (with parsed output) or rejected (with issues).
//! The engine never knows how a schema reaches its verdict.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stillwater::Validation;

use crate::error::{FormValidationExt, Issue, ValidationResult};
use crate::validate::Validate;
use crate::value::FormValues;

/// Capability to classify a set of form values.
///
/// Implementations must be pure from the engine's point of view and total:
/// partial or malformed values produce `Validation::Failure`, never a panic.
///
/// # Example
///
/// ```ignore
/// use formwarden::{FormValues, Issue, Schema, ValidationResult, FormValidation, FormValidationExt};
///
/// struct NotEmpty;
///
/// impl Schema for NotEmpty {
///     fn validate(&self, values: &FormValues) -> ValidationResult {
///         match values.get("name").and_then(|v| v.as_str()) {
///             Some(name) if !name.is_empty() => FormValidation::Success(values.clone()),
///             _ => FormValidation::reject_with(Issue::at("name", "Name is required")),
///         }
///     }
/// }
/// ```
pub trait Schema {
    /// Classify `values`.
    fn validate(&self, values: &FormValues) -> ValidationResult;
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate(&self, values: &FormValues) -> ValidationResult {
        (**self).validate(values)
    }
}

/// Schema backed by a closure.
pub struct FnSchema<F> {
    f: F,
}

impl<F> Schema for FnSchema<F>
where
    F: Fn(&FormValues) -> ValidationResult,
{
    fn validate(&self, values: &FormValues) -> ValidationResult {
        (self.f)(values)
    }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema").finish_non_exhaustive()
    }
}

/// Wrap a closure as a schema.
pub fn schema_fn<F>(f: F) -> FnSchema<F>
where
    F: Fn(&FormValues) -> ValidationResult,
{
    FnSchema { f }
}

/// Schema for a typed form model.
///
/// Values are decoded into `T` with serde, checked with `T::validate`, and on
/// success re-encoded from `T`. The parsed output therefore carries whatever
/// coercion `T`'s `Deserialize` impl performs.
pub struct TypedSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    /// Create a schema for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedSchema<{}>", type_name::<T>())
    }
}

impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Serialize + Validate,
{
    fn validate(&self, values: &FormValues) -> ValidationResult {
        let typed: T = match decode_typed(values) {
            Ok(typed) => typed,
            Err(issue) => return ValidationResult::reject_with(issue),
        };

        match typed.validate() {
            Validation::Success(()) => match FormValues::from_serialize(&typed) {
                Ok(parsed) => Validation::Success(parsed),
                Err(e) => ValidationResult::reject_with(Issue::new(e.to_string())),
            },
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }
}

/// Decode values into `T`, turning serde's error into an issue.
fn decode_typed<T: DeserializeOwned>(values: &FormValues) -> Result<T, Issue> {
    values.decode::<T>().map_err(|e| {
        let message = e.to_string();

        // Missing fields name themselves in backticks: "missing field `email`"
        if message.contains("missing field") {
            if let Some(start) = message.find('`') {
                if let Some(end) = message[start + 1..].find('`') {
                    let field = &message[start + 1..start + 1 + end];
                    return Issue::at(field, "Required");
                }
            }
        }

        Issue::new(format!("expected {}: {}", type_name::<T>(), message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormValidation;
    use crate::value::Value;
    use serde::Deserialize;

    #[test]
    fn test_fn_schema_accepts() {
        let schema = schema_fn(|values: &FormValues| Validation::Success(values.clone()));
        let values = FormValues::new().with("name", "Ada");
        match schema.validate(&values) {
            Validation::Success(parsed) => assert_eq!(parsed, values),
            Validation::Failure(_) => panic!("Expected success"),
        }
    }

    #[test]
    fn test_boxed_schema_delegates() {
        let schema: Box<dyn Schema> = Box::new(schema_fn(|_: &FormValues| {
            ValidationResult::reject_with(Issue::new("always"))
        }));
        assert!(schema.validate(&FormValues::new()).is_failure());
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
        #[serde(default)]
        nickname: Option<String>,
    }

    impl Validate for Profile {
        fn validate(&self) -> FormValidation<()> {
            let mut issues = Vec::new();
            if self.name.trim().is_empty() {
                issues.push(Issue::at("name", "Name is required"));
            }
            if self.age < 18 {
                issues.push(Issue::at("age", "Must be at least 18"));
            }
            FormValidation::from_issues((), issues)
        }
    }

    #[test]
    fn test_typed_schema_accepts_and_parses() {
        let values = FormValues::new().with("name", "Ada").with("age", 36i64);
        match TypedSchema::<Profile>::new().validate(&values) {
            Validation::Success(parsed) => {
                assert_eq!(parsed.get("age"), Some(&Value::Integer(36)));
                // Defaulted by serde, so present in the parsed output
                assert_eq!(parsed.get("nickname"), Some(&Value::Null));
            }
            Validation::Failure(issues) => panic!("Unexpected issues: {}", issues),
        }
    }

    #[test]
    fn test_typed_schema_rule_failures() {
        let values = FormValues::new().with("name", " ").with("age", 12i64);
        match TypedSchema::<Profile>::new().validate(&values) {
            Validation::Failure(issues) => {
                let fields: Vec<Option<&str>> = issues.iter().map(Issue::field).collect();
                assert_eq!(fields, vec![Some("name"), Some("age")]);
            }
            Validation::Success(_) => panic!("Expected failure"),
        }
    }

    #[test]
    fn test_typed_schema_missing_field() {
        let values = FormValues::new().with("age", 20i64);
        match TypedSchema::<Profile>::new().validate(&values) {
            Validation::Failure(issues) => {
                assert_eq!(issues.first().field(), Some("name"));
                assert_eq!(issues.first().message, "Required");
            }
            Validation::Success(_) => panic!("Expected failure"),
        }
    }

    #[test]
    fn test_typed_schema_type_mismatch_is_form_level() {
        let values = FormValues::new().with("name", "Ada").with("age", "old");
        match TypedSchema::<Profile>::new().validate(&values) {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 1);
                assert!(issues.first().path.is_empty());
            }
            Validation::Success(_) => panic!("Expected failure"),
        }
    }
}
