//! # Validation Module
//!
//! Input validation for Mercato add/update payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum)                                                   │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Payload shape                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                            │
//! │  └── Business rule validation (formats, ranges, past dates)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                         │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints                                                 │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercato_core::validation::{validate_email, validate_unit_price};
//!
//! validate_email("ada@example.com").unwrap();
//! validate_unit_price(9.99).unwrap();
//! ```

use chrono::{NaiveDate, Utc};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length (plain text, before hashing).
pub const PASSWORD_MIN_LEN: usize = 5;

/// Maximum password length (plain text, before hashing).
pub const PASSWORD_MAX_LEN: usize = 50;

/// Maximum length for free-text name-like fields.
pub const NAME_MAX_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a name-like text field (names, branch, city, category, gender).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 100 characters
pub fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: NAME_MAX_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`
/// - Non-empty local part
/// - Domain contains a dot and no whitespace
///
/// This is a lightweight shape check, not a full RFC 5322 parser; the
/// database unique index is the final arbiter of identity.
///
/// ## Example
/// ```rust
/// use mercato_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
                reason: "must contain exactly one '@'".to_string(),
            })
        }
    };

    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like local@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must start with `+`
/// - Followed by 7 to 15 digits
///
/// ## Example
/// ```rust
/// use mercato_core::validation::validate_phone_number;
///
/// assert!(validate_phone_number("+15551234567").is_ok());
/// assert!(validate_phone_number("555-1234").is_err());
/// ```
pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    let digits = match phone.strip_prefix('+') {
        Some(rest) => rest,
        None => {
            return Err(ValidationError::InvalidFormat {
                field: "phone_number".to_string(),
                reason: "must start with '+'".to_string(),
            })
        }
    };

    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must be '+' followed by 7-15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a plain-text password before hashing.
///
/// ## Rules
/// - 5 to 50 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < PASSWORD_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: PASSWORD_MIN_LEN,
        });
    }

    if password.len() > PASSWORD_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: PASSWORD_MAX_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Date & Number Validators
// =============================================================================

/// Validates a birth date: it must be strictly earlier than today.
pub fn validate_date_of_birth(date_of_birth: NaiveDate) -> ValidationResult<()> {
    if date_of_birth >= Utc::now().date_naive() {
        return Err(ValidationError::NotInPast {
            field: "date_of_birth".to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price: finite and non-negative.
pub fn validate_unit_price(unit_price: f64) -> ValidationResult<()> {
    if !unit_price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "unit_price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if unit_price < 0.0 {
        return Err(ValidationError::Negative {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

/// Validates a line-item quantity: non-negative.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("branch", "Downtown").is_ok());
        assert!(validate_text("branch", "   ").is_err());
        assert!(validate_text("branch", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.co").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("ada@").is_err());
        assert!(validate_email("ada@nodot").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("ada@ex ample.com").is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+15551234567").is_ok());
        assert!(validate_phone_number("+1234567").is_ok());
        assert!(validate_phone_number("15551234567").is_err());
        assert!(validate_phone_number("+123").is_err());
        assert!(validate_phone_number("+1234567890123456").is_err());
        assert!(validate_phone_number("+123abc4567").is_err());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("root1").is_ok());
        assert!(validate_password("1234").is_err());
        assert!(validate_password(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_birth_date_must_be_in_past() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let today = Utc::now().date_naive();
        let tomorrow = today + Duration::days(1);

        assert!(validate_date_of_birth(yesterday).is_ok());
        assert!(validate_date_of_birth(today).is_err());
        assert!(validate_date_of_birth(tomorrow).is_err());
    }

    #[test]
    fn test_unit_price_non_negative() {
        assert!(validate_unit_price(0.0).is_ok());
        assert!(validate_unit_price(10.5).is_ok());
        assert!(validate_unit_price(-0.01).is_err());
        assert!(validate_unit_price(f64::NAN).is_err());
        assert!(validate_unit_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_quantity_non_negative() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(5).is_ok());
        assert!(validate_quantity(-1).is_err());
    }
}
