//! Derived validation state.
//!
//! Projects a schema verdict onto individual fields. The projection is a
//! pure function of the issues; caching it per store version is the form's
//! job.

use std::collections::BTreeMap;

use stillwater::Validation;

use crate::error::{Issue, ValidationResult};
use crate::value::{FieldName, FormValues};

/// Per-field error messages derived from validation issues.
///
/// Each field maps to at most one message. When several issues point at the
/// same field, the last one in traversal order wins. Issues that do not
/// start with a field key land in a separate whole-form slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap {
    fields: BTreeMap<FieldName, String>,
    form: Option<String>,
}

impl FieldErrorMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Project issues, in order, onto fields.
    pub fn from_issues<'a, I>(issues: I) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        let mut map = Self::new();
        for issue in issues {
            map.record(issue);
        }
        map
    }

    /// Project a schema verdict; an accepted verdict has no errors.
    pub fn from_result(result: &ValidationResult) -> Self {
        match result {
            Validation::Success(_) => Self::new(),
            Validation::Failure(issues) => Self::from_issues(issues.iter()),
        }
    }

    /// Record one issue, overwriting any earlier message for the same key.
    pub fn record(&mut self, issue: &Issue) {
        match issue.field() {
            Some(field) => {
                self.fields
                    .insert(FieldName::from(field), issue.message.clone());
            }
            None => self.form = Some(issue.message.clone()),
        }
    }

    /// Overlay `other` on top of this map; `other` wins on conflicts.
    pub fn merge(&mut self, other: &FieldErrorMap) {
        for (field, message) in &other.fields {
            self.fields.insert(field.clone(), message.clone());
        }
        if let Some(message) = &other.form {
            self.form = Some(message.clone());
        }
    }

    /// Error message for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Error message for the form as a whole.
    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    /// Number of messages, the form-level one included.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.form.is_some())
    }

    /// Number of fields with an error.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// True when there is neither a field error nor a form-level error.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_none()
    }

    /// Iterate over field errors.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.fields.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Validation state computed for one store version.
#[derive(Debug, Clone)]
pub(crate) struct Derived {
    pub(crate) version: u64,
    pub(crate) parsed: Option<FormValues>,
    pub(crate) errors: FieldErrorMap,
}

impl Derived {
    pub(crate) fn project(version: u64, result: ValidationResult) -> Self {
        let errors = FieldErrorMap::from_result(&result);
        let parsed = match result {
            Validation::Success(parsed) => Some(parsed),
            Validation::Failure(_) => None,
        };
        Self {
            version,
            parsed,
            errors,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}
