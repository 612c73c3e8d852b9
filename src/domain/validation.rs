//! Input rules shared by signup and profile forms.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{MAX_NAME_LENGTH, MIN_NAME_LENGTH, UNIVERSITY_EMAIL_SUFFIX};
use crate::errors::{AppError, AppResult};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z ]+$").expect("name pattern is valid"));

/// Emails are stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Job seekers sign up with their university address.
pub fn check_university_email(email: &str) -> AppResult<()> {
    let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("");
    if domain.len() > UNIVERSITY_EMAIL_SUFFIX.len() && domain.ends_with(UNIVERSITY_EMAIL_SUFFIX) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Please use your official university email ending with {}",
            UNIVERSITY_EMAIL_SUFFIX
        )))
    }
}

/// Person names: letters and spaces only.
pub fn check_person_name(field: &str, value: &str) -> AppResult<()> {
    let len = value.trim().chars().count() as u64;
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(AppError::validation(format!(
            "{} must be {}-{} characters",
            field, MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    if !NAME_PATTERN.is_match(value) {
        return Err(AppError::validation(format!(
            "{} can only contain letters and spaces",
            field
        )));
    }
    Ok(())
}

/// Split a contact name into first and last parts.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_university_email() {
        assert!(check_university_email("nimal@uom.ac.lk").is_ok());
        assert!(check_university_email("nimal@cse.mrt.ac.lk").is_ok());
        assert!(check_university_email("nimal@gmail.com").is_err());
        assert!(check_university_email("nimal@.ac.lk").is_err());
        assert!(check_university_email("no-at-sign.ac.lk").is_err());
    }

    #[test]
    fn test_person_name() {
        assert!(check_person_name("First name", "Anne Marie").is_ok());
        assert!(check_person_name("First name", "A").is_err());
        assert!(check_person_name("First name", "R2D2").is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(normalize_email("  Kasun@UOM.ac.lk "), "kasun@uom.ac.lk");
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Saman  Kumara Perera"),
            ("Saman".to_string(), "Kumara Perera".to_string())
        );
        assert_eq!(split_full_name("Madonna"), ("Madonna".to_string(), String::new()));
    }
}
