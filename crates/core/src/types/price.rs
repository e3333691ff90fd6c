//! Price formatting and parsing.
//!
//! Prices travel as `rust_decimal::Decimal`. The backend sends them either as
//! JSON numbers or as strings; `Decimal`'s serde impl accepts both.

use rust_decimal::Decimal;

/// Format a price for display, always with two decimals (e.g. `$19.90`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Parse a price typed by an admin.
///
/// Accepts an optional leading `$`. The result must be non-negative and have
/// at most two decimal places.
///
/// # Errors
///
/// Returns a human-readable message suitable for a form error.
pub fn parse_price(input: &str) -> Result<Decimal, String> {
    let raw = input.trim().trim_start_matches('$');
    let value: Decimal = raw
        .parse()
        .map_err(|_| format!("invalid price: {input}"))?;
    if value.is_sign_negative() {
        return Err("price must not be negative".to_owned());
    }
    if value.scale() > 2 {
        return Err("price must have at most two decimal places".to_owned());
    }
    Ok(value)
}
