//! Currency conversion
//!
//! Amounts travel over the API as Brazilian Real display strings
//! (`R$ 53.549,47`) and are stored as integer cents. Parsing goes through
//! `Decimal` so no binary floating-point error leaks into the stored value.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Currency symbol stripped on parse and emitted on format
const CURRENCY_SYMBOL: &str = "R$";

/// Separator between symbol and digits (what pt-BR locale formatting emits)
const SYMBOL_SEPARATOR: char = '\u{a0}';

/// Errors that can occur when converting a display amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

/// Parse a localized currency string into integer cents.
///
/// The symbol and all whitespace are removed, `.` thousands separators are
/// dropped and the decimal comma becomes a decimal point. The value is
/// multiplied by 100 and rounded to the nearest cent (midpoint away from
/// zero).
///
/// # Example
/// ```
/// use ledger_desk::domain::parse_amount;
///
/// assert_eq!(parse_amount("R$ 53.549,47").unwrap(), 5_354_947);
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(display: &str) -> Result<i64, AmountError> {
    let cleaned: String = display
        .replacen(CURRENCY_SYMBOL, "", 1)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);

    let value = Decimal::from_str(&cleaned)
        .map_err(|_| AmountError::InvalidAmount(display.to_string()))?;

    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AmountError::OutOfRange(display.to_string()))
}

/// Render integer cents as a localized currency string (`R$ 1.234,56`).
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!(
        "{}{}{}{},{:02}",
        sign, CURRENCY_SYMBOL, SYMBOL_SEPARATOR, grouped, fraction
    )
}
