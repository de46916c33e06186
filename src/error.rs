//! Issue and error types for the formwarden engine.
//!
//! Validation complaints are `Issue`s anchored at a structured path. They
//! accumulate in `Issues`, a non-empty collection that integrates with
//! stillwater's `Validation` type and `Semigroup` trait. Programming-contract
//! violations are reported separately through `FormError`.

use std::fmt;

use stillwater::{NonEmptyVec, Semigroup, Validation};

use crate::value::{FieldName, FormValues};

/// One step in the location of an issue inside the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key, such as a field name
    Key(String),
    /// Array index
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<FieldName> for PathSegment {
    fn from(field: FieldName) -> Self {
        PathSegment::Key(field.as_str().to_string())
    }
}

impl From<&FieldName> for PathSegment {
    fn from(field: &FieldName) -> Self {
        PathSegment::Key(field.as_str().to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single validation complaint.
///
/// The first path segment, when it is a key, names the offending field.
/// An empty path marks a complaint about the form as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location of the offending value
    pub path: Vec<PathSegment>,
    /// Human-readable message
    pub message: String,
}

impl Issue {
    /// Create a form-level issue (empty path).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Create an issue anchored at a field.
    pub fn at(field: impl Into<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.into()],
            message: message.into(),
        }
    }

    /// Append a segment to the end of the path.
    pub fn with_segment(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Prepend a segment, nesting this issue under a parent key or index.
    pub fn nested(mut self, parent: impl Into<PathSegment>) -> Self {
        self.path.insert(0, parent.into());
        self
    }

    /// The field this issue is anchored at, if any.
    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Render the path for display (e.g. `items[0].name`).
    ///
    /// Only used for messages; lookups always go through the structured path.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{}]", index));
                }
            }
        }
        out
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(form): {}", self.message)
        } else {
            write!(f, "'{}': {}", self.path_string(), self.message)
        }
    }
}

/// A non-empty, ordered collection of issues.
///
/// Uses `NonEmptyVec` from stillwater, so a rejection always carries at
/// least one issue.
#[derive(Debug, Clone)]
pub struct Issues(pub NonEmptyVec<Issue>);

impl Issues {
    /// Create from a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Get the first issue (always exists).
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty (always false, but required for API consistency).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over issues in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// Nest every issue under a parent key or index.
    pub fn nested(self, parent: impl Into<PathSegment>) -> Self {
        let parent = parent.into();
        Self(self.0.map(|issue| issue.nested(parent.clone())))
    }
}

impl PartialEq for Issues {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        Self::single(issue)
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation issues ({}):", self.len())?;
        for issue in self.iter() {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// The standard validation type for formwarden.
pub type FormValidation<T> = Validation<T, Issues>;

/// What a schema returns: `Success(parsed)` when the values are accepted,
/// `Failure(issues)` when they are rejected.
pub type ValidationResult = FormValidation<FormValues>;

/// Extension trait for creating failing validations easily.
pub trait FormValidationExt<T> {
    /// Create a failing validation with a single issue.
    fn reject_with(issue: Issue) -> FormValidation<T>;

    /// Succeed with `value` if `issues` is empty, otherwise fail with all of them.
    fn from_issues(value: T, issues: Vec<Issue>) -> FormValidation<T>;
}

impl<T> FormValidationExt<T> for FormValidation<T> {
    fn reject_with(issue: Issue) -> FormValidation<T> {
        Validation::Failure(Issues::single(issue))
    }

    fn from_issues(value: T, issues: Vec<Issue>) -> FormValidation<T> {
        match Issues::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(value),
        }
    }
}

/// Contract violations and setup failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// The field is not part of the form
    #[error("unknown field '{field}'")]
    UnknownField { field: FieldName },

    /// The builder was finished without a schema
    #[error("no validation schema provided")]
    MissingSchema,

    /// The default values could not be turned into a flat record
    #[error("invalid default values: {message}")]
    InvalidDefaults { message: String },

    /// The form values could not be decoded into the requested type
    #[error("could not decode form values into {target}: {message}")]
    Decode { target: String, message: String },
}
