//! Convenient re-exports for common formwarden usage.
//!
//! # Quick Start
//!
//! For most users, import the prelude:
//!
//! ```ignore
//! use formwarden::prelude::*;
//!
//! let form = Form::new(
//!     FormValues::new().with("name", ""),
//!     schema_fn(|values: &FormValues| match values.get("name").and_then(Value::as_str) {
//!         Some(name) if !name.is_empty() => Validation::Success(values.clone()),
//!         _ => ValidationResult::reject_with(Issue::at("name", "Name is required")),
//!     }),
//! );
//!
//! assert_eq!(form.error_for("name"), "Name is required");
//! ```
//!
//! # Import Patterns
//!
//! ## Selective Imports
//!
//! Import only what you need:
//!
//! ```ignore
//! use formwarden::{Form, Schema};
//! use formwarden::error::Issues;
//! ```

// ============================================================================
// Stillwater re-exports
// ============================================================================

/// Result type with error accumulation. Schemas return
/// `Validation<FormValues, Issues>`.
pub use stillwater::Validation;

/// Trait for combining values. `Issues` implements this for accumulation.
pub use stillwater::Semigroup;

/// Guaranteed non-empty collection. Underlying type for `Issues`.
pub use stillwater::NonEmptyVec;

// ============================================================================
// Issues and errors
// ============================================================================

/// A single validation complaint anchored at a structured path.
pub use crate::error::Issue;

/// One step of an issue path: a key or an array index.
pub use crate::error::PathSegment;

/// Non-empty collection of issues. Implements `Semigroup` for accumulation.
pub use crate::error::Issues;

/// Type alias: `Validation<T, Issues>`.
pub use crate::error::FormValidation;

/// Type alias: `Validation<FormValues, Issues>`, what a schema returns.
pub use crate::error::ValidationResult;

/// Extension trait for creating failing validations easily.
pub use crate::error::FormValidationExt;

/// Contract violations and setup failures.
pub use crate::error::FormError;

// ============================================================================
// Values
// ============================================================================

/// A single field value.
pub use crate::value::Value;

/// Name of a form field.
pub use crate::value::FieldName;

/// Flat record of field values.
pub use crate::value::FormValues;

// ============================================================================
// Schemas
// ============================================================================

/// Capability to classify form values.
pub use crate::schema::Schema;

/// Wrap a closure as a schema.
pub use crate::schema::schema_fn;

/// Schema for a typed model.
pub use crate::schema::TypedSchema;

/// Trait for validating typed models.
pub use crate::validate::Validate;

// ============================================================================
// Form
// ============================================================================

/// The form engine.
pub use crate::form::Form;

/// Builder for `Form`.
pub use crate::form::FormBuilder;

/// Form behaviour options.
pub use crate::form::FormOptions;

/// When field errors become visible.
pub use crate::form::ValidationMode;

/// Read-only view of one field.
pub use crate::form::FieldState;

/// Per-field error messages.
pub use crate::derived::FieldErrorMap;

/// Lifecycle events.
pub use crate::events::FormEvent;

// ============================================================================
// Submission
// ============================================================================

/// Submit lifecycle state.
pub use crate::submit::SubmissionState;

/// The external submit action.
pub use crate::submit::SubmitAction;

/// Failure reported by a submit action.
pub use crate::submit::SubmitFailure;

/// What a call to `submit()` did.
pub use crate::submit::SubmitOutcome;

/// Failure reason of a submission whose future was dropped mid-flight.
pub use crate::form::SUBMISSION_CANCELLED;

/// Wrap a closure as a submit action.
pub use crate::submit::submit_fn;

/// Wrap a typed closure as a submit action.
pub use crate::submit::submit_typed;
