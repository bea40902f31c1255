//! # Validation Module
//!
//! Input validation and lenient numeric parsing for Workshop Manager.
//!
//! ## Two Kinds of Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Handling                                     │
//! │                                                                         │
//! │  Strict (rejects with ValidationError)                                  │
//! │  ├── admin PIN              validate_pin                                │
//! │  ├── reception identity     validate_vehicle_identity                   │
//! │  └── work order ID          validate_order_id                           │
//! │                                                                         │
//! │  Lenient (never fails, coerces to zero)                                 │
//! │  ├── cost fields            parse_amount   "12.5x" → $12.50             │
//! │  └── hours worked           parse_hours    "abc"   → 0                  │
//! │                                                                         │
//! │  Cost fields are typed one keystroke at a time; half-typed values       │
//! │  must not block the form.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use workshop_core::validation::{parse_amount, validate_pin};
//!
//! assert!(validate_pin("1234").is_ok());
//! assert_eq!(parse_amount("250.5").cents(), 250_50);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::VehicleInfo;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest accepted admin PIN.
pub const MIN_PIN_LENGTH: usize = 4;

/// Longest accepted admin PIN (the keypad stops at six digits).
pub const MAX_PIN_LENGTH: usize = 6;

/// Largest amount a single cost field accepts: $999,999,999.99.
pub const MAX_AMOUNT: Money = Money::from_cents(999_999_999_99);

// =============================================================================
// Strict Validators
// =============================================================================

/// Validates an admin PIN.
///
/// ## Rules
/// - ASCII digits only
/// - Between 4 and 6 digits
///
/// ```rust
/// use workshop_core::validation::validate_pin;
///
/// assert!(validate_pin("1234").is_ok());
/// assert!(validate_pin("123456").is_ok());
/// assert!(validate_pin("123").is_err());
/// assert!(validate_pin("12a4").is_err());
/// ```
pub fn validate_pin(pin: &str) -> ValidationResult<()> {
    if pin.is_empty() {
        return Err(ValidationError::Required {
            field: "pin".to_string(),
        });
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pin".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if pin.len() < MIN_PIN_LENGTH {
        return Err(ValidationError::TooShort {
            field: "pin".to_string(),
            min: MIN_PIN_LENGTH,
        });
    }

    if pin.len() > MAX_PIN_LENGTH {
        return Err(ValidationError::TooLong {
            field: "pin".to_string(),
            max: MAX_PIN_LENGTH,
        });
    }

    Ok(())
}

/// Reception cannot be saved until the vehicle is identifiable.
///
/// Plates or VIN, either one is enough. Whitespace-only does not count.
pub fn validate_vehicle_identity(vehicle: &VehicleInfo) -> ValidationResult<()> {
    if vehicle.plates.trim().is_empty() && vehicle.vin.trim().is_empty() {
        return Err(ValidationError::MissingVehicleIdentity);
    }
    Ok(())
}

/// Checks the `YYMMDD-NN` shape: six digits, a dash, two or more digits.
///
/// The date part is not checked against the calendar.
pub fn validate_order_id(id: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "order_id".to_string(),
        reason: "expected YYMMDD-NN".to_string(),
    };

    let (date, seq) = id.split_once('-').ok_or_else(invalid)?;

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if date.len() != 6 || !all_digits(date) || seq.len() < 2 || !all_digits(seq) {
        return Err(invalid());
    }

    Ok(())
}

// =============================================================================
// Lenient Parsers
// =============================================================================

/// Parses a typed cost into Money.
///
/// ## Rules
/// ```text
/// "250"      → $250.00
/// "99.999"   → $100.00   (rounded to the cent)
/// "12abc"    → $12.00    (leading number is kept)
/// ""  "abc"  → $0.00
/// "-40"      → $0.00     (costs are never negative)
/// "1,250.5"  → $1.00     (thousands separators are not supported)
/// "1e12"     → $1.00     (no exponents either)
/// above MAX_AMOUNT → $0.00
/// ```
pub fn parse_amount(text: &str) -> Money {
    let value = parse_leading_number(text);
    if value <= 0.0 {
        return Money::zero();
    }
    let cents = (value * 100.0).round();
    if cents > MAX_AMOUNT.cents() as f64 {
        return Money::zero();
    }
    Money::from_cents(cents as i64)
}

/// Parses typed hours worked with the same coercion as [`parse_amount`].
pub fn parse_hours(text: &str) -> f64 {
    parse_leading_number(text).max(0.0)
}

/// Longest numeric prefix of `text` as f64, or 0.0 if there is none.
fn parse_leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    // A lone sign or dot has no digits
    if !text[digits_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return 0.0;
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats fractional hours as `"2h 30m"`, or `"3h"` on a whole hour.
///
/// Minutes are rounded; 59.6 minutes carry into the next hour.
///
/// ```rust
/// use workshop_core::validation::format_hours;
///
/// assert_eq!(format_hours(2.5), "2h 30m");
/// assert_eq!(format_hours(3.0), "3h");
/// ```
pub fn format_hours(hours: f64) -> String {
    let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
    let mut h = hours.floor() as u64;
    let mut m = ((hours - hours.floor()) * 60.0).round() as u64;
    if m == 60 {
        h += 1;
        m = 0;
    }

    if m == 0 {
        format!("{}h", h)
    } else {
        format!("{}h {}m", h, m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pin() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("0000").is_ok());
        assert!(validate_pin("987654").is_ok());

        assert!(matches!(
            validate_pin(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_pin("123"),
            Err(ValidationError::TooShort { min: 4, .. })
        ));
        assert!(matches!(
            validate_pin("1234567"),
            Err(ValidationError::TooLong { max: 6, .. })
        ));
        assert!(matches!(
            validate_pin("12 34"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_pin("١٢٣٤").is_err());
    }

    #[test]
    fn test_vehicle_identity() {
        let mut vehicle = VehicleInfo::default();
        assert!(matches!(
            validate_vehicle_identity(&vehicle),
            Err(ValidationError::MissingVehicleIdentity)
        ));

        vehicle.plates = "   ".to_string();
        assert!(validate_vehicle_identity(&vehicle).is_err());

        vehicle.plates = "ABC-123".to_string();
        assert!(validate_vehicle_identity(&vehicle).is_ok());

        let vin_only = VehicleInfo {
            vin: "1HGCM82633A004352".to_string(),
            ..VehicleInfo::default()
        };
        assert!(validate_vehicle_identity(&vin_only).is_ok());
    }

    #[test]
    fn test_validate_order_id() {
        assert!(validate_order_id("250615-01").is_ok());
        assert!(validate_order_id("250615-100").is_ok());

        assert!(validate_order_id("250615-1").is_err());
        assert!(validate_order_id("25061-01").is_err());
        assert!(validate_order_id("250615_01").is_err());
        assert!(validate_order_id("2506AB-01").is_err());
        assert!(validate_order_id("250615-0x").is_err());
        assert!(validate_order_id("").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("250").cents(), 250_00);
        assert_eq!(parse_amount("  250.5 ").cents(), 250_50);
        assert_eq!(parse_amount("0.1").cents(), 10);
        assert_eq!(parse_amount("99.999").cents(), 100_00);
        assert_eq!(parse_amount(".75").cents(), 75);
        assert_eq!(parse_amount("12abc").cents(), 12_00);
    }

    #[test]
    fn test_parse_amount_coerces_garbage_to_zero() {
        assert!(parse_amount("").is_zero());
        assert!(parse_amount("abc").is_zero());
        assert!(parse_amount("-40").is_zero());
        assert!(parse_amount("-").is_zero());
        assert!(parse_amount(".").is_zero());
    }

    #[test]
    fn test_parse_amount_rejects_out_of_range() {
        assert!(parse_amount("99999999999999999999").is_zero());
        assert!(parse_amount("1000000000").is_zero());
        assert_eq!(parse_amount("999999999.99"), MAX_AMOUNT);
    }

    #[test]
    fn test_parse_amount_stops_at_thousands_separator() {
        assert_eq!(parse_amount("1,250.5").cents(), 1_00);
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("2.5"), 2.5);
        assert_eq!(parse_hours("3h"), 3.0);
        assert_eq!(parse_hours("x"), 0.0);
        assert_eq!(parse_hours("-1"), 0.0);
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(0.0), "0h");
        assert_eq!(format_hours(1.0), "1h");
        assert_eq!(format_hours(2.5), "2h 30m");
        assert_eq!(format_hours(2.25), "2h 15m");
        assert_eq!(format_hours(3.75), "3h 45m");
        assert_eq!(format_hours(0.5), "0h 30m");
        assert_eq!(format_hours(8.33), "8h 20m");
        assert_eq!(format_hours(1.01), "1h 1m");
    }

    #[test]
    fn test_format_hours_carries_rounded_minutes() {
        assert_eq!(format_hours(0.9999), "1h");
        assert_eq!(format_hours(-2.0), "0h");
        assert_eq!(format_hours(f64::NAN), "0h");
    }
}
