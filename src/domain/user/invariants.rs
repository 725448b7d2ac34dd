use std::sync::OnceLock;

use regex::Regex;

use super::entity::User;
use crate::domain::{DomainError, DomainResult};

const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is a valid literal regex")
    })
}

pub fn validate_email(email: &str) -> DomainResult<()> {
    if !email_pattern().is_match(email.trim()) {
        return Err(DomainError::InvariantViolation(format!(
            "Invalid email address '{}'",
            email
        )));
    }
    Ok(())
}

/// Passwords need at least 8 characters with a letter and a digit
pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Password must have at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(DomainError::InvariantViolation(
            "Password must contain a letter and a digit".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_email(&user.email)?;
    if user.display_name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Display name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
