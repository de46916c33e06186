//! Submission lifecycle types and the external submit action.
//!
//! ```text
//! Idle ──submit()──▶ Validating ──rejected──▶ Idle
//!   ▲                    │
//!   │                 accepted
//!   │                    ▼
//!   └──── Succeeded ◀── Submitting ──action failed──▶ Failed(reason)
//!                                                        │
//!                              Validating ◀──submit()────┘
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::derived::FieldErrorMap;
use crate::error::Issue;
use crate::value::FormValues;

/// Where a form is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Ready to submit
    #[default]
    Idle,
    /// Running the schema against a snapshot
    Validating,
    /// Waiting on the submit action
    Submitting,
    /// The submit action succeeded; transient
    Succeeded,
    /// The submit action reported a failure
    Failed(String),
}

impl SubmissionState {
    /// True while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }

    /// True when `submit()` may start a new attempt.
    pub fn can_submit(&self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed(_))
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: &SubmissionState) -> bool {
        use SubmissionState::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Failed(_), Validating)
                | (Validating, Idle)
                | (Validating, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed(_))
                | (Succeeded, Idle)
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Validating => write!(f, "validating"),
            SubmissionState::Submitting => write!(f, "submitting"),
            SubmissionState::Succeeded => write!(f, "succeeded"),
            SubmissionState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Failure reported by a submit action.
///
/// `issues` may point at fields (e.g. "email already registered"); they are
/// folded into the form's errors the same way schema issues are.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{reason}")]
pub struct SubmitFailure {
    /// What went wrong
    pub reason: String,
    /// Optional field-anchored issues
    pub issues: Vec<Issue>,
}

impl SubmitFailure {
    /// Create a failure with only a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            issues: Vec::new(),
        }
    }

    /// Attach an issue.
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }
}

impl From<String> for SubmitFailure {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

impl From<&str> for SubmitFailure {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

/// What a call to `submit()` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed and the action (if any) succeeded
    Succeeded,
    /// Validation failed; the action was not called
    Rejected(FieldErrorMap),
    /// The action reported a failure
    Failed(SubmitFailure),
    /// A submission was already in flight; nothing happened
    Busy,
}

impl SubmitOutcome {
    /// True for `Succeeded`.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded)
    }

    /// True for `Rejected`.
    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }

    /// True for `Busy`.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmitOutcome::Busy)
    }
}

/// The external action run with validated values.
///
/// May suspend. Forms are single-owner and `!Sync`, so neither the action
/// nor its future needs to be `Send`.
#[async_trait(?Send)]
pub trait SubmitAction {
    /// Handle parsed, validated values.
    async fn submit(&self, values: FormValues) -> Result<(), SubmitFailure>;
}

/// Submit action backed by a closure returning a future.
pub struct FnSubmit<F> {
    f: F,
}

#[async_trait(?Send)]
impl<F, Fut> SubmitAction for FnSubmit<F>
where
    F: Fn(FormValues) -> Fut + 'static,
    Fut: Future<Output = Result<(), SubmitFailure>> + 'static,
{
    async fn submit(&self, values: FormValues) -> Result<(), SubmitFailure> {
        (self.f)(values).await
    }
}

/// Wrap a closure as a submit action.
pub fn submit_fn<F, Fut>(f: F) -> FnSubmit<F>
where
    F: Fn(FormValues) -> Fut + 'static,
    Fut: Future<Output = Result<(), SubmitFailure>> + 'static,
{
    FnSubmit { f }
}

/// Submit action that receives a decoded, typed model.
pub struct TypedSubmit<T, F> {
    f: F,
    _marker: PhantomData<fn(T)>,
}

#[async_trait(?Send)]
impl<T, F, Fut> SubmitAction for TypedSubmit<T, F>
where
    T: DeserializeOwned + 'static,
    F: Fn(T) -> Fut + 'static,
    Fut: Future<Output = Result<(), SubmitFailure>> + 'static,
{
    async fn submit(&self, values: FormValues) -> Result<(), SubmitFailure> {
        let typed: T = values.decode().map_err(|e| {
            SubmitFailure::new(format!(
                "could not decode form values into {}: {}",
                std::any::type_name::<T>(),
                e
            ))
        })?;
        (self.f)(typed).await
    }
}

/// Wrap a closure taking a typed model as a submit action.
pub fn submit_typed<T, F, Fut>(f: F) -> TypedSubmit<T, F>
where
    T: DeserializeOwned + 'static,
    F: Fn(T) -> Fut + 'static,
    Fut: Future<Output = Result<(), SubmitFailure>> + 'static,
{
    TypedSubmit {
        f,
        _marker: PhantomData,
    }
}
