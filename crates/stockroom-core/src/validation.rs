//! # Validation Module
//!
//! Field parsers that turn raw form text into typed values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console                                                      │
//! │  └── Collects raw text, one prompt per field                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (via `forms`)                                    │
//! │  ├── Required text present                                             │
//! │  ├── Quantity is a positive integer                                    │
//! │  ├── Money is a non-negative decimal, at most 2 fraction digits        │
//! │  └── Unit is one of the fixed set                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (quantity > 0), CHECK (amount >= 0)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimal input is parsed digit by digit into integer hundredths, so
//! "2.50" becomes exactly 250 cents and "8.25" exactly 825 bps.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_money, parse_quantity};
//!
//! assert_eq!(parse_quantity("quantity", "10").unwrap(), 10);
//! assert_eq!(parse_money("unit_cost", "2.50").unwrap().cents(), 250);
//! assert!(parse_quantity("quantity", "0").is_err());
//! assert!(parse_money("unit_cost", "abc").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, TaxRate};
use crate::types::UnitOfMeasure;
use crate::{MAX_AMOUNT_CENTS, MAX_QUANTITY, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Text
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Trimmed value must not be empty
/// - At most `MAX_TEXT_LEN` characters
///
/// ## Returns
/// The trimmed value.
pub fn require_text(field: &str, input: &str) -> ValidationResult<String> {
    let value = input.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    check_length(field, value)?;
    Ok(value.to_string())
}

/// Validates an optional free-text field. Blank input becomes `None`.
pub fn optional_text(field: &str, input: &str) -> ValidationResult<Option<String>> {
    let value = input.trim();

    if value.is_empty() {
        return Ok(None);
    }

    check_length(field, value)?;
    Ok(Some(value.to_string()))
}

fn check_length(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numbers
// =============================================================================

/// Parses a quantity.
///
/// ## Rules
/// - Must be a whole number ("10", not "10.5")
/// - Must be positive (> 0)
/// - Must not exceed `MAX_QUANTITY`
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("quantity", " 12 ").unwrap(), 12);
/// assert!(parse_quantity("quantity", "-3").is_err());
/// assert!(parse_quantity("quantity", "2.5").is_err());
/// ```
pub fn parse_quantity(field: &str, input: &str) -> ValidationResult<i64> {
    let value = input.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    let qty: i64 = value
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "must be a whole number"))?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "1".to_string(),
            max: MAX_QUANTITY.to_string(),
        });
    }

    Ok(qty)
}

/// Parses a non-negative money amount ("2.50", "$9.99", "10").
///
/// ## Rules
/// - Required
/// - Decimal with at most two fraction digits; a leading `$` is allowed
/// - Zero is allowed (free items), negatives are not
/// - Must not exceed `MAX_AMOUNT_CENTS`
pub fn parse_money(field: &str, input: &str) -> ValidationResult<Money> {
    let value = input.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    let value = value.strip_prefix('$').unwrap_or(value).trim();
    let max = Money::from_cents(MAX_AMOUNT_CENTS);
    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: Money::zero().to_string(),
        max: max.to_string(),
    };

    if let Some(rest) = value.strip_prefix('-') {
        // "-1.00" is a number, just not an acceptable one
        parse_hundredths(field, rest)?;
        return Err(out_of_range());
    }

    let cents = parse_hundredths(field, value)?;
    if cents > MAX_AMOUNT_CENTS {
        return Err(out_of_range());
    }

    Ok(Money::from_cents(cents))
}

/// Parses a tax percentage ("8.25", "8.25%", "0").
///
/// Blank input means no tax. Accepts 0 to 100 with at most two decimals.
pub fn parse_tax_percent(field: &str, input: &str) -> ValidationResult<TaxRate> {
    let value = input.trim();

    if value.is_empty() {
        return Ok(TaxRate::zero());
    }

    let value = value.strip_suffix('%').unwrap_or(value).trim();
    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: "0".to_string(),
        max: "100".to_string(),
    };

    if let Some(rest) = value.strip_prefix('-') {
        parse_hundredths(field, rest)?;
        return Err(out_of_range());
    }

    let bps = parse_hundredths(field, value)?;
    if bps > TaxRate::MAX_BPS as i64 {
        return Err(out_of_range());
    }

    Ok(TaxRate::from_bps(bps as u32))
}

/// Parses an unsigned decimal with at most two fraction digits into
/// hundredths: "2.5" → 250, "10" → 1000, ".75" → 75.
fn parse_hundredths(field: &str, value: &str) -> ValidationResult<i64> {
    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(ValidationError::invalid_format(field, "must be a number"));
    }

    if frac.len() > 2 {
        return Err(ValidationError::invalid_format(
            field,
            "at most 2 decimal places",
        ));
    }

    let too_large = || ValidationError::invalid_format(field, "number is too large");

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| too_large())?
    };

    // "5" → 50 hundredths, "05" → 5
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| too_large())? * 10,
        _ => frac.parse().map_err(|_| too_large())?,
    };

    whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(too_large)
}

// =============================================================================
// Units
// =============================================================================

/// Parses a unit of measure from the fixed set.
pub fn parse_unit(field: &str, input: &str) -> ValidationResult<UnitOfMeasure> {
    if input.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    UnitOfMeasure::parse(input).ok_or_else(|| ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: UnitOfMeasure::names(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
