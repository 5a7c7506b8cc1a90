//! Form validation rules shared by the services.
//!
//! Forms derive [`Validate`]; services run [`validate_form`] before touching
//! any store, so a rejected form never reaches persistence.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use blog_core::error::AppError;
use blog_core::result::AppResult;

/// Symbols accepted as the special character of a password.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Run a form's rules, turning failures into one validation error that names
/// every rejected field.
pub fn validate_form<T: Validate>(form: &T) -> AppResult<()> {
    form.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .map(|e| e.message.as_deref().unwrap_or(&*e.code).to_string())
                    .unwrap_or_default();
                format!("{field}: {reason}")
            })
            .collect();
        fields.sort();
        AppError::validation(fields.join("; "))
    })
}

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Non-empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rejected("not_blank", "must not be blank"));
    }
    Ok(())
}

/// 5 to 15 lowercase ASCII letters or digits.
pub fn user_id(value: &str) -> Result<(), ValidationError> {
    let ok = (5..=15).contains(&value.len())
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !ok {
        return Err(rejected(
            "user_id",
            "must be 5 to 15 lowercase letters or digits",
        ));
    }
    Ok(())
}

/// At least 8 characters mixing a letter, a digit, and a symbol.
pub fn password(value: &str) -> Result<(), ValidationError> {
    let ok = value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !ok {
        return Err(rejected(
            "password",
            "must be at least 8 characters with a letter, a digit and a symbol",
        ));
    }
    Ok(())
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Two or more Hangul syllables.
pub fn user_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 2 || !value.chars().all(is_hangul) {
        return Err(rejected("user_name", "must be at least 2 Hangul characters"));
    }
    Ok(())
}

/// Two or more ASCII letters or Hangul syllables.
pub fn nickname(value: &str) -> Result<(), ValidationError> {
    let ok = value.chars().count() >= 2
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || is_hangul(c));
    if !ok {
        return Err(rejected(
            "nickname",
            "must be at least 2 letters or Hangul characters",
        ));
    }
    Ok(())
}

/// 10 or 11 digits, no separators. A blank value counts as absent.
pub fn phone_number(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let ok = (10..=11).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit());
    if !ok {
        return Err(rejected("phone_number", "must be 10 or 11 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rule() {
        assert!(user_id("user123").is_ok());
        assert!(user_id("abcd").is_err());
        assert!(user_id("abcdefghijklmnop").is_err());
        assert!(user_id("User123").is_err());
        assert!(user_id("user_12").is_err());
    }

    #[test]
    fn test_password_rule() {
        assert!(password("Password1!").is_ok());
        assert!(password("Pa1!").is_err());
        assert!(password("Password!!").is_err());
        assert!(password("12345678!").is_err());
        assert!(password("Password12").is_err());
    }

    #[test]
    fn test_name_rules() {
        assert!(user_name("홍길동").is_ok());
        assert!(user_name("홍").is_err());
        assert!(user_name("Hong").is_err());

        assert!(nickname("nickname").is_ok());
        assert!(nickname("별명").is_ok());
        assert!(nickname("n").is_err());
        assert!(nickname("nick1").is_err());
    }

    #[test]
    fn test_phone_number_rule() {
        assert!(phone_number("01012345678").is_ok());
        assert!(phone_number("0212345678").is_ok());
        assert!(phone_number("").is_ok());
        assert!(phone_number("010-1234-5678").is_err());
        assert!(phone_number("123456789").is_err());
    }

    #[test]
    fn test_blank_is_rejected() {
        assert!(not_blank(" x ").is_ok());
        assert!(not_blank("   ").is_err());
    }
}
