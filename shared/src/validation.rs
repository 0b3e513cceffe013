//! Validation utilities for the Fuel Station Dashboard

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::reading::ReadingEntry;

// ============================================================================
// Reading Validations
// ============================================================================

/// Validate a meter or gauge value is not negative
pub fn validate_non_negative(value: Option<Decimal>) -> Result<(), &'static str> {
    match value {
        Some(v) if v < Decimal::ZERO => Err("Readings cannot be negative"),
        _ => Ok(()),
    }
}

/// Integer digits of the dip and purchase columns, `NUMERIC(12,2)`
pub const VOLUME_INTEGER_DIGITS: u32 = 10;

/// Integer digits of the totalizer columns, `NUMERIC(14,2)`
pub const TOTALIZER_INTEGER_DIGITS: u32 = 12;

/// Decimal places stored for every reading value
pub const READING_DECIMAL_PLACES: u32 = 2;

/// Validate a value is stored without rounding in a column with
/// `integer_digits` digits before the point and two after it
pub fn validate_stored_precision(value: Option<Decimal>, integer_digits: u32) -> Result<(), &'static str> {
    let Some(v) = value else {
        return Ok(());
    };
    if v.normalize().scale() > READING_DECIMAL_PLACES {
        return Err("At most 2 decimal places are allowed");
    }
    if v.abs() >= Decimal::from(10u64.pow(integer_digits)) {
        return Err("Value is too large");
    }
    Ok(())
}

/// Validate a dip does not exceed the tank's capacity
pub fn validate_dip_within_capacity(dip: Option<Decimal>, capacity: Decimal) -> Result<(), &'static str> {
    match dip {
        Some(d) if d > capacity => Err("Dip exceeds tank capacity"),
        _ => Ok(()),
    }
}

/// Validate one tank's entry against its capacity.
///
/// Returns the offending field name with the message.
pub fn validate_reading_entry(
    entry: &ReadingEntry,
    capacity: Decimal,
) -> Result<(), (&'static str, &'static str)> {
    let fields = [
        ("opening_dip", entry.opening_dip, VOLUME_INTEGER_DIGITS),
        ("closing_dip", entry.closing_dip, VOLUME_INTEGER_DIGITS),
        ("opening_totalizer", entry.opening_totalizer, TOTALIZER_INTEGER_DIGITS),
        ("closing_totalizer", entry.closing_totalizer, TOTALIZER_INTEGER_DIGITS),
        ("purchase_qty", entry.purchase_qty, VOLUME_INTEGER_DIGITS),
    ];
    for (field, value, integer_digits) in fields {
        validate_non_negative(value).map_err(|m| (field, m))?;
        validate_stored_precision(value, integer_digits).map_err(|m| (field, m))?;
    }

    validate_dip_within_capacity(entry.opening_dip, capacity).map_err(|m| ("opening_dip", m))?;
    validate_dip_within_capacity(entry.closing_dip, capacity).map_err(|m| ("closing_dip", m))?;
    Ok(())
}

/// Validate readings are not recorded for a future day
pub fn validate_reading_date(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date > today {
        return Err("Reading date cannot be in the future");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}
