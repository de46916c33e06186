//! The form engine: `Form`, `FormBuilder` and `FormOptions`.
//!
//! A `Form` owns a value store, a schema and an optional submit action. All
//! operations take `&self`; state lives behind a `RefCell` so the UI can keep
//! editing values while a `submit()` future is suspended in the submit
//! action. The form is single-owner and not `Sync`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::derived::{Derived, FieldErrorMap};
use crate::error::FormError;
use crate::events::{EventSender, FormEvent};
use crate::schema::{Schema, TypedSchema};
use crate::store::ValueStore;
use crate::submit::{SubmissionState, SubmitAction, SubmitFailure, SubmitOutcome};
use crate::validate::Validate;
use crate::value::{FieldName, FormValues, Value};

/// When field errors become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Errors always reflect the current values.
    #[default]
    OnChange,
    /// Errors stay hidden until the first submit (or explicit `validate()`),
    /// then track the current values until the next reset.
    OnSubmit,
}

/// Form behaviour options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// When field errors become visible.
    pub validation_mode: ValidationMode,
}

impl FormOptions {
    /// Options with the given validation mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }
}

/// Read-only view of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    /// Current value
    pub value: Value,
    /// Set since construction or the last reset
    pub is_dirty: bool,
    /// Visible error message, if any
    pub error: Option<String>,
}

/// Errors the submit action attached to fields.
///
/// `version` is the store version when the failure was reported; the errors
/// are shown until the values change after that.
#[derive(Debug)]
struct SubmitErrors {
    version: u64,
    errors: FieldErrorMap,
}

#[derive(Debug)]
struct FormState {
    store: ValueStore,
    cache: Option<Rc<Derived>>,
    submit_errors: Option<SubmitErrors>,
    submission: SubmissionState,
    errors_revealed: bool,
    submit_count: u32,
}

/// A schema-validated form.
///
/// # Example
///
/// ```ignore
/// use formwarden::prelude::*;
///
/// let form = Form::builder()
///     .defaults(FormValues::new().with("email", "").with("password", ""))
///     .schema(login_schema())
///     .on_submit(submit_fn(|values| async move { api::login(values).await }))
///     .build()?;
///
/// form.set("email", "a@b.com")?;
/// form.set("password", "Password1!")?;
///
/// match form.submit().await {
///     SubmitOutcome::Succeeded => println!("logged in"),
///     SubmitOutcome::Rejected(errors) => println!("fix: {:?}", errors),
///     SubmitOutcome::Failed(failure) => println!("try again: {}", failure),
///     SubmitOutcome::Busy => {}
/// }
/// ```
pub struct Form {
    state: RefCell<FormState>,
    schema: Box<dyn Schema>,
    action: Option<Box<dyn SubmitAction>>,
    options: FormOptions,
    events: EventSender,
}

impl Form {
    /// Create a builder.
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    /// Create a form with the given defaults and schema, no submit action and
    /// default options.
    pub fn new<S: Schema + 'static>(defaults: FormValues, schema: S) -> Self {
        Self::from_parts(
            defaults,
            Box::new(schema),
            None,
            FormOptions::default(),
        )
    }

    /// Create a form for a typed model.
    ///
    /// Defaults come from serializing `defaults`; validation decodes the
    /// values back into `T` and runs `T::validate`.
    pub fn typed<T>(defaults: &T) -> Result<Self, FormError>
    where
        T: Serialize + DeserializeOwned + Validate + 'static,
    {
        Form::builder()
            .defaults_from(defaults)
            .schema(TypedSchema::<T>::new())
            .build()
    }

    fn from_parts(
        defaults: FormValues,
        schema: Box<dyn Schema>,
        action: Option<Box<dyn SubmitAction>>,
        options: FormOptions,
    ) -> Self {
        Self {
            state: RefCell::new(FormState {
                store: ValueStore::new(defaults),
                cache: None,
                submit_errors: None,
                submission: SubmissionState::Idle,
                errors_revealed: false,
                submit_count: 0,
            }),
            schema,
            action,
            options,
            events: EventSender::new(),
        }
    }

    /// The options this form was built with.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> mpsc::Receiver<FormEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Current value of a field, or `Value::Null` for an unknown field.
    pub fn get(&self, field: &str) -> Value {
        self.state.borrow().store.get(field)
    }

    /// Replace one field's value.
    ///
    /// Accepted at any time, including while a submission is in flight; the
    /// in-flight submission keeps the values it already took. Unknown fields
    /// are rejected with `FormError::UnknownField`.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let version = {
            let mut state = self.state.borrow_mut();
            state.store.set(field, value.into())?;
            state.store.version()
        };
        trace!(field, version, "field value updated");
        self.events.send(FormEvent::ValueChanged {
            field: FieldName::from(field),
        });
        Ok(())
    }

    /// Restore the defaults.
    ///
    /// Clears dirtiness and folded submit errors, and in `OnSubmit` mode
    /// hides errors again. The submission state is left alone.
    pub fn reset(&self) {
        let version = {
            let mut state = self.state.borrow_mut();
            state.store.reset();
            state.submit_errors = None;
            state.errors_revealed = false;
            state.store.version()
        };
        debug!(version, "form reset to defaults");
        self.events.send(FormEvent::Reset);
    }

    /// Owned copy of the current values.
    pub fn snapshot(&self) -> FormValues {
        self.state.borrow().store.snapshot()
    }

    /// Copy of the default values.
    pub fn defaults(&self) -> FormValues {
        self.state.borrow().store.defaults().clone()
    }

    /// Decode the current values into a typed model.
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        self.snapshot().decode().map_err(|e| FormError::Decode {
            target: std::any::type_name::<T>().to_string(),
            message: e.to_string(),
        })
    }

    /// True once any field has been set since construction or the last reset.
    pub fn is_dirty(&self) -> bool {
        self.state.borrow().store.is_dirty()
    }

    /// Fields set since construction or the last reset.
    pub fn dirty_fields(&self) -> Vec<FieldName> {
        self.state.borrow().store.dirty_fields().cloned().collect()
    }

    /// Mutation counter of the value store.
    pub fn version(&self) -> u64 {
        self.state.borrow().store.version()
    }

    // ------------------------------------------------------------------
    // Derived validation
    // ------------------------------------------------------------------

    /// Validation state for the current store version.
    ///
    /// The schema runs at most once per version; later reads reuse the cache.
    fn derived(&self) -> Rc<Derived> {
        let (version, snapshot) = {
            let state = self.state.borrow();
            let version = state.store.version();
            if let Some(cached) = &state.cache {
                if cached.version == version {
                    return Rc::clone(cached);
                }
            }
            (version, state.store.snapshot())
        };

        let derived = Rc::new(Derived::project(version, self.schema.validate(&snapshot)));
        trace!(version, valid = derived.is_valid(), "schema evaluated");

        self.state.borrow_mut().cache = Some(Rc::clone(&derived));
        derived
    }

    /// True when the current values satisfy the schema.
    ///
    /// Independent of the validation mode.
    pub fn is_valid(&self) -> bool {
        self.derived().is_valid()
    }

    /// Parsed output of the schema for the current values, if accepted.
    pub fn parsed(&self) -> Option<FormValues> {
        self.derived().parsed.clone()
    }

    /// Force a validation pass and make errors visible.
    ///
    /// Returns whether the current values are valid.
    pub fn validate(&self) -> bool {
        self.state.borrow_mut().errors_revealed = true;
        self.is_valid()
    }

    /// Run the schema against arbitrary values without touching form state.
    pub fn validate_values(&self, values: &FormValues) -> FieldErrorMap {
        FieldErrorMap::from_result(&self.schema.validate(values))
    }

    /// Visible errors for the current values.
    ///
    /// Schema errors, overlaid with field errors reported by the last failed
    /// submission as long as the values have not changed since.
    pub fn errors(&self) -> FieldErrorMap {
        if !self.errors_visible() {
            return FieldErrorMap::new();
        }

        let derived = self.derived();
        let mut errors = derived.errors.clone();

        let state = self.state.borrow();
        if let Some(submit_errors) = &state.submit_errors {
            if submit_errors.version == state.store.version() {
                errors.merge(&submit_errors.errors);
            }
        }
        errors
    }

    fn errors_visible(&self) -> bool {
        match self.options.validation_mode {
            ValidationMode::OnChange => true,
            ValidationMode::OnSubmit => self.state.borrow().errors_revealed,
        }
    }

    // ------------------------------------------------------------------
    // Field accessor
    // ------------------------------------------------------------------

    /// Visible error for a field, or an empty string.
    pub fn error_for(&self, field: &str) -> String {
        self.errors().get(field).unwrap_or_default().to_string()
    }

    /// Read-only view of a field, or `None` for an unknown field.
    pub fn state_for(&self, field: &str) -> Option<FieldState> {
        let (value, is_dirty) = {
            let state = self.state.borrow();
            if !state.store.contains(field) {
                return None;
            }
            (state.store.get(field), state.store.is_field_dirty(field))
        };

        let error = self.errors().get(field).map(str::to_string);
        Some(FieldState {
            value,
            is_dirty,
            error,
        })
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Current submission state.
    pub fn submission(&self) -> SubmissionState {
        self.state.borrow().submission.clone()
    }

    /// True while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state.borrow().submission.is_busy()
    }

    /// Number of submit attempts that got past the busy check.
    pub fn submit_count(&self) -> u32 {
        self.state.borrow().submit_count
    }

    fn transition(&self, next: SubmissionState) {
        let from = {
            let mut state = self.state.borrow_mut();
            debug_assert!(
                state.submission.can_transition_to(&next),
                "illegal submission transition {} -> {}",
                state.submission,
                next
            );
            std::mem::replace(&mut state.submission, next.clone())
        };
        debug!(from = %from, to = %next, "submission transition");
        self.events.send(FormEvent::Transition { from, to: next });
    }

    /// Validate and, if accepted, run the submit action.
    ///
    /// Callable from `Idle` or `Failed`. While a submission is in flight this
    /// is a no-op returning `SubmitOutcome::Busy`. Validation failures return
    /// `Rejected` and never call the action; action failures leave the form in
    /// `Failed` and can be retried by calling `submit()` again.
    ///
    /// Dropping the returned future while the action is pending settles the
    /// form in `Failed` with [`SUBMISSION_CANCELLED`] as the reason.
    pub async fn submit(&self) -> SubmitOutcome {
        {
            let mut state = self.state.borrow_mut();
            if !state.submission.can_submit() {
                debug!(state = %state.submission, "submit ignored, form is busy");
                return SubmitOutcome::Busy;
            }
            state.submit_count += 1;
            state.errors_revealed = true;
            state.submit_errors = None;
        }
        self.transition(SubmissionState::Validating);

        let derived = self.derived();
        let parsed = match &derived.parsed {
            Some(parsed) => parsed.clone(),
            None => {
                debug!(
                    version = derived.version,
                    fields = derived.errors.field_count(),
                    "submission rejected by schema"
                );
                self.transition(SubmissionState::Idle);
                return SubmitOutcome::Rejected(self.errors());
            }
        };

        self.transition(SubmissionState::Submitting);
        let in_flight = InFlight { form: self, settled: false };

        // The only suspension point; no borrow of `state` is held across it.
        let result = match &self.action {
            Some(action) => action.submit(parsed).await,
            None => Ok(()),
        };
        in_flight.settle();

        match result {
            Ok(()) => {
                self.transition(SubmissionState::Succeeded);
                self.transition(SubmissionState::Idle);
                SubmitOutcome::Succeeded
            }
            Err(failure) => {
                warn!(reason = %failure.reason, "submit action failed");
                self.fold_submit_failure(&failure);
                self.transition(SubmissionState::Failed(failure.reason.clone()));
                SubmitOutcome::Failed(failure)
            }
        }
    }

    fn fold_submit_failure(&self, failure: &SubmitFailure) {
        if failure.issues.is_empty() {
            return;
        }
        let mut state = self.state.borrow_mut();
        // Edits made while the action ran do not hide what it reported
        let version = state.store.version();
        state.submit_errors = Some(SubmitErrors {
            version,
            errors: FieldErrorMap::from_issues(failure.issues.iter()),
        });
    }
}

/// Failure reason recorded when a `submit()` future is dropped mid-flight.
pub const SUBMISSION_CANCELLED: &str = "submission cancelled";

/// Marks a submission in `Submitting`; settles it as cancelled unless
/// `settle` is called first.
struct InFlight<'a> {
    form: &'a Form,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("submit future dropped while the action was pending");
        self.form
            .transition(SubmissionState::Failed(SUBMISSION_CANCELLED.to_string()));
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Form")
            .field("values", state.store.values())
            .field("submission", &state.submission)
            .field("options", &self.options)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for `Form`.
///
/// # Example
///
/// ```ignore
/// let form = Form::builder()
///     .defaults_from(&LoginForm::default())
///     .schema(TypedSchema::<LoginForm>::new())
///     .on_submit(submit_typed(|login: LoginForm| async move { auth.login(login).await }))
///     .options(FormOptions::default().with_mode(ValidationMode::OnSubmit))
///     .build()?;
/// ```
pub struct FormBuilder {
    defaults: Result<FormValues, FormError>,
    schema: Option<Box<dyn Schema>>,
    action: Option<Box<dyn SubmitAction>>,
    options: FormOptions,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    /// Create a builder with no fields, no schema and no action.
    pub fn new() -> Self {
        Self {
            defaults: Ok(FormValues::new()),
            schema: None,
            action: None,
            options: FormOptions::default(),
        }
    }

    /// Set the default values. They also fix the form's field set.
    pub fn defaults(mut self, defaults: FormValues) -> Self {
        self.defaults = Ok(defaults);
        self
    }

    /// Set the default values by serializing a typed model.
    ///
    /// Serialization errors are reported by `build()`.
    pub fn defaults_from<T: Serialize>(mut self, defaults: &T) -> Self {
        self.defaults = FormValues::from_serialize(defaults);
        self
    }

    /// Set the validation schema.
    pub fn schema<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    /// Set the submit action.
    pub fn on_submit<A: SubmitAction + 'static>(mut self, action: A) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Set the options.
    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for setting only the validation mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.options.validation_mode = mode;
        self
    }

    /// Build the form.
    pub fn build(self) -> Result<Form, FormError> {
        let defaults = self.defaults?;
        let schema = self.schema.ok_or(FormError::MissingSchema)?;
        Ok(Form::from_parts(defaults, schema, self.action, self.options))
    }
}
