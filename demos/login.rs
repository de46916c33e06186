//! Login form example.
//!
//! This example drives a login form through its submit lifecycle:
//!
//! - Rejection of a weak password, with the error on the password field
//! - A simulated network failure followed by a successful retry
//! - Lifecycle events observed through `Form::subscribe`
//!
//! Run with:
//!   cargo run --example login
//!   RUST_LOG=formwarden=trace cargo run --example login  # See every store write

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;

use formwarden::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Login credentials, pre-filled for the demo account.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "Password1!".to_string(),
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap())
}

impl Validate for Credentials {
    fn validate(&self) -> FormValidation<()> {
        let mut issues = Vec::new();

        if !email_pattern().is_match(&self.email) {
            issues.push(Issue::at("email", "Please enter a valid email address"));
        }
        if self.password.chars().count() < 8 {
            issues.push(Issue::at(
                "password",
                "Password must be at least 8 characters long",
            ));
        }
        if !self.password.chars().any(|c| c.is_ascii_uppercase()) {
            issues.push(Issue::at(
                "password",
                "Password must contain at least one uppercase letter",
            ));
        }
        if !symbol_pattern().is_match(&self.password) {
            issues.push(Issue::at(
                "password",
                "Password must contain at least one symbol",
            ));
        }

        FormValidation::from_issues((), issues)
    }
}

fn print_errors(form: &Form) {
    let errors = form.errors();
    if errors.is_empty() {
        println!("  (no errors)");
    }
    for (field, message) in errors.iter() {
        println!("  {field}: {message}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("formwarden=debug")),
        )
        .init();

    println!("=== Login Form Demo ===\n");

    // The first attempt hits a flaky network; later ones go through
    let attempts = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&attempts);

    let form = Form::builder()
        .defaults_from(&Credentials::default())
        .schema(TypedSchema::<Credentials>::new())
        .on_submit(submit_typed(move |credentials: Credentials| {
            counter.set(counter.get() + 1);
            let attempt = counter.get();
            async move {
                if attempt == 1 {
                    return Err(SubmitFailure::new("network error"));
                }
                println!("  -> signed in as {}", credentials.email);
                Ok(())
            }
        }))
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to build form: {e}");
            std::process::exit(1);
        });

    let events = form.subscribe();

    println!("Step 1: weak password");
    form.set("password", "short").unwrap();
    match form.submit().await {
        SubmitOutcome::Rejected(errors) => {
            println!("  Rejected with {} field error(s):", errors.field_count());
            print_errors(&form);
        }
        other => println!("  Unexpected outcome: {other:?}"),
    }

    println!("\nStep 2: fix the password, submit over a flaky network");
    form.set("password", "Password1!").unwrap();
    match form.submit().await {
        SubmitOutcome::Failed(failure) => {
            println!("  Failed: {failure}");
            println!("  State: {}", form.submission());
        }
        other => println!("  Unexpected outcome: {other:?}"),
    }

    println!("\nStep 3: retry");
    let outcome = form.submit().await;
    println!("  Outcome: {outcome:?}");
    println!("  State: {}", form.submission());
    println!("  Attempts: {}", attempts.get());

    println!("\nLifecycle events:");
    for event in events.try_iter() {
        if let FormEvent::Transition { from, to } = event {
            println!("  {from} -> {to}");
        }
    }

    println!("\nDirty fields: {:?}", form.dirty_fields());
    form.reset();
    println!("After reset, dirty: {}", form.is_dirty());
}
