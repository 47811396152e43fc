//! Validation utilities for the Farm Market platform

use rust_decimal::Decimal;

/// Validate a product price or order amount
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than zero");
    }
    Ok(())
}
