//! Formwarden: a schema-validated form-state engine.
//!
//! Formwarden binds a fixed set of named field values to an external
//! validation schema, derives per-field and whole-form validity, and drives
//! an async submit lifecycle that only calls your submit action when the
//! values pass validation. It uses stillwater's `Validation` type for schema
//! verdicts, so every issue is reported, not just the first one.
//!
//! # Core Concepts
//!
//! - **Pluggable Schemas**: anything implementing [`Schema`] classifies values
//!   as accepted (with parsed output) or rejected (with [`Issues`])
//! - **Derived Errors**: issues are projected onto fields; the schema runs at
//!   most once per change of the values
//! - **Submit State Machine**: `Idle → Validating → Submitting → Succeeded | Failed`
//! - **Typed Models**: drive a form from any `Serialize + Deserialize + Validate` struct
//!
//! # Quick Start
//!
//! ```ignore
//! use formwarden::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Signup {
//!     email: String,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self) -> FormValidation<()> {
//!         if self.email.contains('@') {
//!             Validation::Success(())
//!         } else {
//!             FormValidation::reject_with(Issue::at("email", "Please enter a valid email address"))
//!         }
//!     }
//! }
//!
//! let form = Form::builder()
//!     .defaults_from(&Signup::default())
//!     .schema(TypedSchema::<Signup>::new())
//!     .on_submit(submit_typed(|signup: Signup| async move {
//!         println!("signing up {}", signup.email);
//!         Ok(())
//!     }))
//!     .build()?;
//!
//! form.set("email", "ada@example.com")?;
//! assert!(form.submit().await.is_success());
//! ```
//!
//! # Architecture
//!
//! Data flows one way: a value change bumps the store version, the next read
//! re-runs the schema once and caches the projection, accessors read the
//! cache, and `submit()` consults it before calling the submit action.
//!
//! A [`Form`] is single-owner and uses `RefCell` interior mutability: values
//! may be edited while a `submit()` future is suspended in the submit action,
//! and a second `submit()` during that time reports [`SubmitOutcome::Busy`].
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`form`]: `Form`, `FormBuilder`, `FormOptions`, field accessors
//! - [`error`]: `Issue`, `Issues`, `ValidationResult`, `FormError`
//! - [`value`]: `Value`, `FieldName`, `FormValues`
//! - [`schema`]: `Schema` trait and adapters
//! - [`validate`]: `Validate` trait for typed models
//! - [`store`]: `ValueStore`
//! - [`derived`]: `FieldErrorMap`
//! - [`submit`]: `SubmissionState`, `SubmitAction`, `SubmitOutcome`
//! - [`events`]: `FormEvent`

pub mod derived;
pub mod error;
pub mod events;
pub mod form;
pub mod prelude;
pub mod schema;
pub mod store;
pub mod submit;
pub mod validate;
pub mod value;

// Re-exports for convenience
pub use derived::FieldErrorMap;
pub use error::{
    FormError, FormValidation, FormValidationExt, Issue, Issues, PathSegment, ValidationResult,
};
pub use events::FormEvent;
pub use form::{FieldState, Form, FormBuilder, FormOptions, ValidationMode, SUBMISSION_CANCELLED};
pub use schema::{schema_fn, FnSchema, Schema, TypedSchema};
pub use store::ValueStore;
pub use submit::{
    submit_fn, submit_typed, FnSubmit, SubmissionState, SubmitAction, SubmitFailure,
    SubmitOutcome, TypedSubmit,
};
pub use validate::Validate;
pub use value::{FieldName, FormValues, Value};

// Re-export stillwater types that are commonly used
pub use stillwater::{NonEmptyVec, Semigroup, Validation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _: FormValidation<()> = Validation::Success(());
        let _: ValidationResult = Validation::Success(FormValues::new());
    }
}
