//! src/domain/subscriber_email.rs
use serde::Serialize;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty email")]
    Empty,
    #[error("Invalid email: {0}")]
    Invalid(String),
}

/// An email address that passed `is_valid_email`. This is the only thing the
/// subscription store accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty);
        }

        if is_valid_email(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::Invalid(s))
        }
    }
}

/// Syntactic sanity check: `local@domain.tld`.
///
/// Exactly one `@`, a non-empty local part, and a domain holding at least one
/// `.` with something on both sides of it. Whitespace is rejected anywhere.
/// Deliverability is not checked.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(is_form_whitespace) {
        return false;
    }

    let mut parts = candidate.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// The whitespace class browsers apply to form patterns (`\s`): Unicode
/// `White_Space` plus the byte order mark, without NEXT LINE.
fn is_form_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
