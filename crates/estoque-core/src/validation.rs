//! # Validation Module
//!
//! Input validation utilities for EstoquePlus.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal prompts (estoque-cli)                               │
//! │  ├── Parse typed text into numbers / Money                             │
//! │  └── Immediate re-prompt on garbage                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stock rules (estoque-core::stock)                            │
//! │  └── THIS MODULE: positivity, required fields, limits                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY on mercadorias.id                                     │
//! │  └── PRIMARY KEY on users.username                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_GOOD_ID_LEN, MAX_GOOD_NAME_LEN, MAX_MOVEMENT_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a good id.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
///
/// ## Example
/// ```rust
/// use estoque_core::validation::validate_good_id;
///
/// assert!(validate_good_id("P1").is_ok());
/// assert!(validate_good_id("  ").is_err());
/// ```
pub fn validate_good_id(id: &str) -> ValidationResult<()> {
    require("id", id, MAX_GOOD_ID_LEN)
}

/// Validates a good name (required, at most 200 characters).
pub fn validate_good_name(name: &str) -> ValidationResult<()> {
    require("name", name, MAX_GOOD_NAME_LEN)
}

/// Validates a username. Only emptiness is checked.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    Ok(())
}

/// Validates a password. Only emptiness is checked.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a movement quantity (purchase, restock or sale).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_MOVEMENT_QUANTITY
///
/// ## Example
/// ```rust
/// use estoque_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price: strictly positive and at most
/// [`MAX_UNIT_PRICE_CENTS`].
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::Overflow {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Parsers (typed text → validated values)
// =============================================================================

/// Parses and validates a positive price typed by the user.
///
/// ## Example
/// ```rust
/// use estoque_core::validation::parse_price;
///
/// assert_eq!(parse_price("purchase price", "10,50").unwrap().cents(), 1050);
/// assert!(parse_price("purchase price", "0").is_err());
/// assert!(parse_price("purchase price", "ten").is_err());
/// ```
pub fn parse_price(field: &str, input: &str) -> ValidationResult<Money> {
    let price: Money = input.parse().map_err(|err| rename_field(err, field))?;
    validate_price(field, price)?;
    Ok(price)
}

/// Parses and validates a positive quantity typed by the user.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty: i64 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

fn rename_field(err: ValidationError, field: &str) -> ValidationError {
    let field = field.to_string();
    match err {
        ValidationError::Required { .. } => ValidationError::Required { field },
        ValidationError::TooLong { max, .. } => ValidationError::TooLong { field, max },
        ValidationError::OutOfRange { min, max, .. } => {
            ValidationError::OutOfRange { field, min, max }
        }
        ValidationError::MustBePositive { .. } => ValidationError::MustBePositive { field },
        ValidationError::InvalidFormat { reason, .. } => {
            ValidationError::InvalidFormat { field, reason }
        }
        ValidationError::Overflow { .. } => ValidationError::Overflow { field },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_good_id() {
        assert!(validate_good_id("P1").is_ok());
        assert!(validate_good_id("caneta azul").is_ok());

        assert!(validate_good_id("").is_err());
        assert!(validate_good_id("   ").is_err());
        assert!(validate_good_id(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_good_name() {
        assert!(validate_good_name("Widget").is_ok());
        assert!(validate_good_name("").is_err());
        assert!(validate_good_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_username("a").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_password("b").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_MOVEMENT_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_MOVEMENT_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("sale price", Money::from_cents(1)).is_ok());
        assert!(validate_price("sale price", Money::zero()).is_err());
        assert!(validate_price("sale price", Money::from_cents(-100)).is_err());
        assert!(validate_price("sale price", Money::from_cents(MAX_UNIT_PRICE_CENTS)).is_ok());
        assert!(matches!(
            validate_price("sale price", Money::from_cents(MAX_UNIT_PRICE_CENTS + 1)),
            Err(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_parse_price_reports_field() {
        let err = parse_price("sale price", "abc").unwrap_err();
        assert_eq!(err.to_string(), "sale price has invalid format: not a number");

        let err = parse_price("sale price", "-1").unwrap_err();
        assert_eq!(err.to_string(), "sale price must be positive");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-3").is_err());
    }
}
