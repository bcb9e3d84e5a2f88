//! Candidate field validation.
//!
//! Everything here is pure: the same input always yields the same verdict.
//! The payload types in `dto::candidate_dto` build `validator::ValidationErrors`
//! from these checks so routes can call `payload.validate()?`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

pub const CODE_REQUIRED: &str = "required";
pub const CODE_EMAIL: &str = "email";
pub const CODE_PHONE: &str = "phone";

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PHONE_INVALID: &str = "Please enter a valid phone number";

/// Field name to human-readable message. Empty means valid.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Borrowed view of the fields a candidate form carries.
#[derive(Debug, Default, Clone, Copy)]
pub struct CandidateForm<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// `local@domain.tld`: runs of non-whitespace, non-`@` characters around a
/// single `@`, with at least one `.` after it that has characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let allowed = |s: &str| !s.is_empty() && !s.chars().any(|c| c == '@' || c.is_whitespace());
    if !allowed(local) || !allowed(domain) {
        return false;
    }
    // Some split point must leave a non-empty label before and after the dot.
    domain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// Optional `+`, a leading digit 1-9, then at most 15 more digits. Spaces,
/// hyphens and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let mut chars = digits.chars();
    match chars.next() {
        Some('1'..='9') => {}
        _ => return false,
    }
    let rest = chars.as_str();
    rest.len() <= 15 && rest.chars().all(|c| c.is_ascii_digit())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub fn validate_required_fields(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if is_blank(first_name) {
        errors.insert("firstName", FIRST_NAME_REQUIRED);
    }
    if is_blank(last_name) {
        errors.insert("lastName", LAST_NAME_REQUIRED);
    }
    if is_blank(email) {
        errors.insert("email", EMAIL_REQUIRED);
    }
    errors
}

/// Full form check: required fields, email shape, then phone shape when a
/// phone number was given.
pub fn validate_candidate_form(form: &CandidateForm<'_>) -> FieldErrors {
    let mut errors = validate_required_fields(form.first_name, form.last_name, form.email);

    if let Some(email) = form.email.filter(|e| !e.trim().is_empty()) {
        if !is_valid_email(email) {
            errors.insert("email", EMAIL_INVALID);
        }
    }
    if let Some(phone) = form.phone.filter(|p| !p.is_empty()) {
        if !is_valid_phone(phone) {
            errors.insert("phone", PHONE_INVALID);
        }
    }
    errors
}

fn code_for(message: &str) -> &'static str {
    match message {
        EMAIL_INVALID => CODE_EMAIL,
        PHONE_INVALID => CODE_PHONE,
        _ => CODE_REQUIRED,
    }
}

/// Converts a field error map into the `validator` representation.
pub fn into_validation_errors(fields: FieldErrors) -> Result<(), ValidationErrors> {
    if fields.is_empty() {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    for (field, message) in fields {
        let mut error = ValidationError::new(code_for(message));
        error.message = Some(Cow::Borrowed(message));
        errors.add(field, error);
    }
    Err(errors)
}

/// Flattens `validator` errors back into field → first message.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            let first = list.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field.to_string(), message))
        })
        .collect()
}
