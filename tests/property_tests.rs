//! Property-based tests for formwarden using proptest.
//!
//! These tests verify invariants that must hold for all mutation histories
//! and issue lists, not just hand-picked examples.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use formwarden::prelude::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

const FIELDS: [&str; 4] = ["email", "password", "name", "age"];

/// Generate arbitrary field values with controlled recursion depth.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        // NaN breaks equality, so only finite floats
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        "[a-zA-Z0-9@._!\\-]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(Value::Table),
        ]
    })
}

/// Defaults over the fixed field set.
fn arb_defaults() -> impl Strategy<Value = FormValues> {
    prop::collection::vec(arb_value(), FIELDS.len()).prop_map(|values| {
        FIELDS
            .iter()
            .copied()
            .zip(values)
            .collect::<FormValues>()
    })
}

/// A mutation: set one of the known fields.
fn arb_mutation() -> impl Strategy<Value = (&'static str, Value)> {
    (prop::sample::select(FIELDS.to_vec()), arb_value())
}

/// Generate issues anchored at known fields, at the form, or at an index.
fn arb_issue() -> impl Strategy<Value = Issue> {
    prop_oneof![
        (prop::sample::select(FIELDS.to_vec()), "[a-z ]{1,20}")
            .prop_map(|(field, message)| Issue::at(field, message)),
        "[a-z ]{1,20}".prop_map(Issue::new),
        (0usize..5, "[a-z ]{1,20}").prop_map(|(index, message)| Issue::new(message).nested(index)),
    ]
}

/// Rejects any string field containing an uppercase letter.
fn no_uppercase(values: &FormValues) -> ValidationResult {
    let issues = values
        .iter()
        .filter_map(|(field, value)| match value {
            Value::String(s) if s.chars().any(|c| c.is_ascii_uppercase()) => {
                Some(Issue::at(field, "must be lowercase"))
            }
            _ => None,
        })
        .collect();
    ValidationResult::from_issues(values.clone(), issues)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: reset followed by snapshot equals the defaults for any history.
    #[test]
    fn prop_reset_restores_defaults(
        defaults in arb_defaults(),
        mutations in prop::collection::vec(arb_mutation(), 0..20),
    ) {
        let form = Form::new(defaults.clone(), schema_fn(no_uppercase));
        for (field, value) in mutations {
            form.set(field, value).unwrap();
        }
        form.reset();

        prop_assert_eq!(form.snapshot(), defaults);
        prop_assert!(!form.is_dirty());
    }

    /// Property: no mutation adds or removes a field.
    #[test]
    fn prop_field_set_is_fixed(
        defaults in arb_defaults(),
        mutations in prop::collection::vec(arb_mutation(), 0..20),
        unknown in "[A-Z]{1,8}",
    ) {
        let form = Form::new(defaults.clone(), schema_fn(no_uppercase));
        for (field, value) in mutations {
            form.set(field, value).unwrap();
        }
        prop_assert!(form.set(&unknown, Value::Null).is_err());

        let fields: Vec<FieldName> = form.snapshot().fields().cloned().collect();
        let expected: Vec<FieldName> = defaults.fields().cloned().collect();
        prop_assert_eq!(fields, expected);
    }

    /// Property: validation of an unchanged snapshot is deterministic and
    /// the schema runs once per version.
    #[test]
    fn prop_validation_is_memoized(
        defaults in arb_defaults(),
        mutations in prop::collection::vec(arb_mutation(), 0..10),
    ) {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let form = Form::new(
            defaults,
            schema_fn(move |values: &FormValues| {
                counter.set(counter.get() + 1);
                no_uppercase(values)
            }),
        );

        for (field, value) in mutations {
            form.set(field, value).unwrap();
            let before = calls.get();

            let first = (form.is_valid(), form.errors());
            let second = (form.is_valid(), form.errors());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(calls.get(), before + 1);

            // Running the schema directly agrees with the cached projection
            prop_assert_eq!(form.validate_values(&form.snapshot()), first.1);
        }
    }

    /// Property: each field maps to the message of the last issue naming it.
    #[test]
    fn prop_last_issue_wins(issues in prop::collection::vec(arb_issue(), 1..20)) {
        let errors = FieldErrorMap::from_issues(issues.iter());

        let mut expected: BTreeMap<&str, &str> = BTreeMap::new();
        let mut form_level = None;
        for issue in &issues {
            match issue.field() {
                Some(field) => {
                    expected.insert(field, &issue.message);
                }
                None => form_level = Some(issue.message.as_str()),
            }
        }

        for field in FIELDS {
            prop_assert_eq!(errors.get(field), expected.get(field).copied());
        }
        prop_assert_eq!(errors.field_count(), expected.len());
        prop_assert_eq!(errors.len(), expected.len() + usize::from(form_level.is_some()));
        prop_assert_eq!(errors.form(), form_level);
    }

    /// Property: a rejected submit never calls the action; an accepted one
    /// calls it exactly once.
    #[test]
    fn prop_action_called_only_when_valid(
        defaults in arb_defaults(),
        mutations in prop::collection::vec(arb_mutation(), 0..10),
    ) {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let form = Form::builder()
            .defaults(defaults)
            .schema(schema_fn(no_uppercase))
            .on_submit(submit_fn(move |_| {
                counter.set(counter.get() + 1);
                async { Ok(()) }
            }))
            .build()
            .unwrap();

        for (field, value) in mutations {
            form.set(field, value).unwrap();
        }

        let valid = form.is_valid();
        let outcome = tokio_test::block_on(form.submit());

        prop_assert_eq!(outcome.is_success(), valid);
        prop_assert_eq!(outcome.is_rejected(), !valid);
        prop_assert_eq!(calls.get(), usize::from(valid));
        prop_assert_eq!(form.submission(), SubmissionState::Idle);
    }
}
