//! Validation trait for typed form models.
//!
//! This module provides the `Validate` trait that typed form structs
//! implement so they can be driven by a [`TypedSchema`](crate::TypedSchema).

use stillwater::Validation;

use crate::error::FormValidation;

/// Trait for validating a typed form model.
///
/// Types implementing this trait perform their own rule checks after the
/// raw field values have been decoded. The validation uses stillwater's
/// `Validation` type to accumulate every issue, in the order the checks run.
///
/// # Example
///
/// ```ignore
/// use formwarden::{FormValidation, FormValidationExt, Issue, Validate};
///
/// struct Signup {
///     username: String,
///     age: u32,
/// }
///
/// impl Validate for Signup {
///     fn validate(&self) -> FormValidation<()> {
///         let mut issues = Vec::new();
///         if self.username.is_empty() {
///             issues.push(Issue::at("username", "Username is required"));
///         }
///         if self.age < 18 {
///             issues.push(Issue::at("age", "You must be an adult"));
///         }
///         FormValidation::from_issues((), issues)
///     }
/// }
/// ```
pub trait Validate {
    /// Validate this value.
    ///
    /// Returns `FormValidation<()>` - either `Success(())` if validation
    /// passes, or `Failure(Issues)` with all accumulated issues.
    fn validate(&self) -> FormValidation<()>;
}

impl Validate for () {
    fn validate(&self) -> FormValidation<()> {
        Validation::Success(())
    }
}

/// None values pass validation; Some values delegate to the inner type.
impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> FormValidation<()> {
        match self {
            Some(inner) => inner.validate(),
            None => Validation::Success(()),
        }
    }
}

/// Validates all elements and accumulates their issues, each nested under
/// the element's index.
impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> FormValidation<()> {
        if self.is_empty() {
            return Validation::Success(());
        }

        let validations: Vec<FormValidation<()>> = self
            .iter()
            .enumerate()
            .map(|(index, item)| match item.validate() {
                Validation::Success(()) => Validation::Success(()),
                Validation::Failure(issues) => Validation::Failure(issues.nested(index)),
            })
            .collect();
        Validation::all_vec(validations).map(|_| ())
    }
}

// Primitive types don't need validation
macro_rules! impl_validate_noop {
    ($($t:ty),*) => {
        $(
            impl Validate for $t {
                fn validate(&self) -> FormValidation<()> {
                    Validation::Success(())
                }
            }
        )*
    };
}

impl_validate_noop!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, String
);
