//! Input validation shared by handlers.
//!
//! Request DTOs derive [`validator::Validate`]; this module holds the auth
//! inputs, the custom rule they use, and helpers that flatten
//! [`ValidationErrors`] into user-facing messages.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(custom(function = "contains_at_sign"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Body of the password-reset request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailInput {
    #[validate(custom(function = "contains_at_sign"))]
    pub email: String,
}

/// Trivial email precondition: the address must contain `@`.
///
/// Full address validation is left to the auth provider.
pub fn contains_at_sign(value: &str) -> Result<(), ValidationError> {
    if value.contains('@') {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("Please enter a valid email address")))
    }
}

/// Key validator uses for struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

/// Per-field messages, sorted by field name for stable output.
///
/// Nested structs and lists are flattened into dotted / indexed keys such as
/// `equipment[0].name`; struct-level errors are reported under `input`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_messages("", errors, &mut out);
    out
}

fn collect_messages(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let field: &str = field.as_ref();
        let key = match (prefix.is_empty(), field == SCHEMA_KEY) {
            (true, true) => "input".to_string(),
            (true, false) => field.to_string(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{prefix}.{field}"),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.entry(key)
                    .or_default()
                    .extend(errs.iter().map(message_for));
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&key, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{key}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn message_for(error: &ValidationError) -> String {
    match &error.message {
        Some(msg) => msg.to_string(),
        None => format!("Invalid value ({})", error.code),
    }
}

/// Flatten validation errors into one `field: message; ...` line.
pub fn describe(errors: &ValidationErrors) -> String {
    field_messages(errors)
        .into_iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run derived validation and convert failures into [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bad_login_reports_both_fields() {
        let input = LoginInput {
            email: "bad".into(),
            password: "123".into(),
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn good_login_passes() {
        let input = LoginInput {
            email: "a@b.com".into(),
            password: "abcdef".into(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn messages_are_human_readable() {
        let input = LoginInput {
            email: "nobody".into(),
            password: "abcdef".into(),
        };
        let errors = input.validate().unwrap_err();
        let messages = field_messages(&errors);
        assert_eq!(
            messages["email"],
            vec!["Please enter a valid email address".to_string()]
        );
        assert_eq!(
            describe(&errors),
            "email: Please enter a valid email address"
        );
    }

    #[test]
    fn validate_input_maps_to_core_error() {
        let input = EmailInput {
            email: "missing-at".into(),
        };
        assert_matches!(validate_input(&input), Err(CoreError::Validation(msg)) if msg.starts_with("email:"));
    }
}
