//! Admission checks run before a book or member reaches the store

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{DomainError, DomainResult};
use crate::models::{BookInput, Member};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

pub fn validate_email(email: &str) -> DomainResult<()> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

/// Trim a proposed member id and check it against the registry.
/// Returns the id in the form it will be stored.
pub fn admit_member_id(raw: &str, existing: &[Member]) -> DomainResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(DomainError::InvalidInput(
            "member id must not be empty".to_string(),
        ));
    }

    let lowered = id.to_lowercase();
    if existing.iter().any(|m| m.id.trim().to_lowercase() == lowered) {
        return Err(DomainError::DuplicateMemberId(id.to_string()));
    }

    Ok(id.to_string())
}

pub fn validate_member_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "member name must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_book_input(input: &BookInput) -> DomainResult<()> {
    if input.title.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "book title must not be empty".to_string(),
        ));
    }
    if input.stock < 1 {
        return Err(DomainError::InvalidInput(
            "stock must be at least 1".to_string(),
        ));
    }
    Ok(())
}
