//! Custom validator functions shared by the payload types

use rust_decimal::Decimal;
use validator::{ValidateEmail, ValidationError};

/// Email is optional in forms; an empty string means "not given"
pub fn email_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email address".into()))
    }
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(ValidationError::new("range").with_message("Must not be negative".into()))
    } else {
        Ok(())
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message("Must not be empty".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_email_or_blank() {
        assert!(email_or_blank("").is_ok());
        assert!(email_or_blank("mario@example.com").is_ok());
        assert!(email_or_blank("not-an-email").is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::from_str("12.50").unwrap()).is_ok());
        assert!(non_negative(&Decimal::from_str("-0.01").unwrap()).is_err());
    }
}
