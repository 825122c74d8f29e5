//! Contact form validation and submission outcome.
//!
//! Validation mirrors what the page checks before posting: email fields must
//! look like an address, text fields need at least two characters, anything
//! else just needs a value. Values are trimmed first. Every required field is
//! checked so the page can flag all of them at once.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use url::form_urlencoded;

/// Shown for any transport error or non-success response.
pub const FAILURE_MESSAGE: &str =
    "There was an error sending your message. Please try again or contact me directly via WhatsApp.";

/// How long the success or failure notice stays up.
pub const NOTICE_DURATION: std::time::Duration = std::time::Duration::from_secs(5);

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

fn is_email(value: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(value))
}

/// Validation rule for a field, chosen by its input `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Text,
    /// Textareas and every other input type.
    Other,
}

impl FieldKind {
    pub fn from_input_type(ty: &str) -> Self {
        match ty {
            "email" => FieldKind::Email,
            "text" => FieldKind::Text,
            _ => FieldKind::Other,
        }
    }
}

/// Why a field was rejected. The message is shown under the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("This field must be at least 2 characters long")]
    TooShort,
    #[error("This field is required")]
    Required,
}

/// Check one value against `kind`.
pub fn validate(kind: FieldKind, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    match kind {
        FieldKind::Email if !is_email(value) => Err(FieldError::InvalidEmail),
        FieldKind::Text if value.chars().count() < 2 => Err(FieldError::TooShort),
        FieldKind::Other if value.is_empty() => Err(FieldError::Required),
        _ => Ok(()),
    }
}

/// One form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validate(self.kind, &self.value)
    }
}

/// The contact form's fields, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    fields: Vec<Field>,
}

impl ContactForm {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Errors for every required field that fails, by field name.
    pub fn errors(&self) -> Vec<(&str, FieldError)> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .filter_map(|f| f.validate().err().map(|e| (f.name.as_str(), e)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// `application/x-www-form-urlencoded` body with every field.
    pub fn encode(&self) -> String {
        let mut body = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            body.append_pair(&field.name, &field.value);
        }
        body.finish()
    }
}

/// Result of posting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
}

impl SubmitOutcome {
    /// Map a response status; `None` means the request never completed.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(code) if (200..300).contains(&code) => SubmitOutcome::Sent,
            Some(code) => {
                log::error!("form submission failed with status {code}");
                SubmitOutcome::Failed
            }
            None => {
                log::error!("form submission failed before a response");
                SubmitOutcome::Failed
            }
        }
    }

    /// Notice to show the user after a failure.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::Sent => None,
            SubmitOutcome::Failed => Some(FAILURE_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(validate(FieldKind::Email, " ada@example.com "), Ok(()));
        assert_eq!(validate(FieldKind::Email, "ada@example"), Err(FieldError::InvalidEmail));
        assert_eq!(validate(FieldKind::Email, "ada example@x.io"), Err(FieldError::InvalidEmail));
        assert_eq!(validate(FieldKind::Email, "@x.io"), Err(FieldError::InvalidEmail));
        assert_eq!(validate(FieldKind::Email, ""), Err(FieldError::InvalidEmail));
    }

    #[test]
    fn test_text_length_is_trimmed() {
        assert_eq!(validate(FieldKind::Text, "Al"), Ok(()));
        assert_eq!(validate(FieldKind::Text, " A "), Err(FieldError::TooShort));
        assert_eq!(validate(FieldKind::Text, "アイ"), Ok(()));
    }

    #[test]
    fn test_other_required() {
        assert_eq!(validate(FieldKind::Other, "   "), Err(FieldError::Required));
        assert_eq!(validate(FieldKind::Other, "x"), Ok(()));
        assert_eq!(FieldKind::from_input_type("textarea"), FieldKind::Other);
    }

    #[test]
    fn test_messages() {
        assert_eq!(FieldError::InvalidEmail.to_string(), "Please enter a valid email address");
        assert_eq!(FieldError::TooShort.to_string(), "This field must be at least 2 characters long");
        assert_eq!(FieldError::Required.to_string(), "This field is required");
    }

    #[test]
    fn test_reports_every_failing_field() {
        let form = ContactForm::new(vec![
            Field::new("name", FieldKind::Text, "A"),
            Field::new("email", FieldKind::Email, "nope"),
            Field::new("company", FieldKind::Text, "").optional(),
            Field::new("message", FieldKind::Other, ""),
        ]);
        assert_eq!(
            form.errors(),
            vec![
                ("name", FieldError::TooShort),
                ("email", FieldError::InvalidEmail),
                ("message", FieldError::Required),
            ]
        );
        assert!(!form.is_valid());
    }

    #[test]
    fn test_encode() {
        let form = ContactForm::new(vec![
            Field::new("name", FieldKind::Text, "Ada L"),
            Field::new("message", FieldKind::Other, "a&b=c"),
        ]);
        assert!(form.is_valid());
        assert_eq!(form.encode(), "name=Ada+L&message=a%26b%3Dc");
    }

    #[test]
    fn test_outcome() {
        assert_eq!(SubmitOutcome::from_status(Some(200)), SubmitOutcome::Sent);
        assert_eq!(SubmitOutcome::from_status(Some(204)).message(), None);
        assert_eq!(SubmitOutcome::from_status(Some(422)), SubmitOutcome::Failed);
        assert_eq!(SubmitOutcome::from_status(None).message(), Some(FAILURE_MESSAGE));
    }
}
