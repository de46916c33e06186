//! Shared fixtures: the login form (email + strict password).

#![allow(dead_code)]

use std::sync::OnceLock;

use formwarden::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const LENGTH_MESSAGE: &str = "Password must be at least 8 characters long";
pub const UPPERCASE_MESSAGE: &str = "Password must contain at least one uppercase letter";
pub const SYMBOL_MESSAGE: &str = "Password must contain at least one symbol";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn uppercase_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z]").unwrap())
}

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap())
}

/// Password rules, in the order they are checked.
pub fn password_issues(password: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    if password.chars().count() < 8 {
        issues.push(Issue::at("password", LENGTH_MESSAGE));
    }
    if !uppercase_pattern().is_match(password) {
        issues.push(Issue::at("password", UPPERCASE_MESSAGE));
    }
    if !symbol_pattern().is_match(password) {
        issues.push(Issue::at("password", SYMBOL_MESSAGE));
    }
    issues
}

pub fn email_issues(email: &str) -> Vec<Issue> {
    if email_pattern().is_match(email) {
        Vec::new()
    } else {
        vec![Issue::at("email", EMAIL_MESSAGE)]
    }
}

/// Typed login model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> FormValidation<()> {
        Validation::all_vec(vec![
            FormValidation::from_issues((), email_issues(&self.email)),
            FormValidation::from_issues((), password_issues(&self.password)),
        ])
        .map(|_| ())
    }
}

/// Untyped login schema working directly on the values.
///
/// Missing or non-string values are treated as empty strings.
pub fn login_schema(values: &FormValues) -> ValidationResult {
    let text = |field: &str| {
        values
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut issues = email_issues(&text("email"));
    issues.extend(password_issues(&text("password")));
    ValidationResult::from_issues(values.clone(), issues)
}

pub fn empty_login() -> FormValues {
    FormValues::new().with("email", "").with("password", "")
}
