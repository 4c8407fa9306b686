//! Conversions between API amounts and stored minor units.
//!
//! Amounts travel through the API as [`Decimal`] with at most two fractional
//! digits and are persisted as integer paise, so sums and balances computed by
//! the database are exact on every backend.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::AppError;

const MINOR_UNIT_SCALE: u32 = 2;

/// Exclusive bound on a single amount, in minor units. Keeps running ledger
/// sums far below the `BIGINT` limit.
pub const MAX_MINOR_UNITS: i64 = 1_000_000_000_000_000;

pub fn to_minor_units(amount: Decimal) -> Result<i64, AppError> {
    let normalized = amount.normalize();
    if normalized.scale() > MINOR_UNIT_SCALE {
        return Err(AppError::validation(format!(
            "Amount {amount} has more than {MINOR_UNIT_SCALE} decimal places"
        )));
    }
    normalized
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .filter(|minor| minor.abs() < MAX_MINOR_UNITS)
        .ok_or_else(|| AppError::validation(format!("Amount {amount} is out of range")))
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Like [`to_minor_units`] but also rejects negative amounts.
pub fn non_negative_minor_units(amount: Decimal, field: &str) -> Result<i64, AppError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::validation(format!("{field} cannot be negative")));
    }
    to_minor_units(amount)
}

/// Formats an amount with thousands separators and two decimals, e.g. `₹ 50,000.00`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp(MINOR_UNIT_SCALE);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{symbol} {sign}{grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minor_units_conversion() {
        assert_eq!(to_minor_units(dec!(50000)).unwrap(), 5_000_000);
        assert_eq!(to_minor_units(dec!(1250.5)).unwrap(), 125_050);
        assert_eq!(to_minor_units(dec!(0.01)).unwrap(), 1);
        assert_eq!(to_minor_units(dec!(12.300)).unwrap(), 1_230);
        assert_eq!(from_minor_units(125_050), dec!(1250.50));
    }

    #[test]
    fn test_rejects_sub_minor_precision() {
        assert!(matches!(
            to_minor_units(dec!(10.005)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_amounts_at_the_cap() {
        assert_eq!(
            to_minor_units(dec!(9999999999999.99)).unwrap(),
            MAX_MINOR_UNITS - 1
        );
        for amount in [dec!(10000000000000), dec!(-10000000000000), dec!(90000000000000000)] {
            assert!(matches!(to_minor_units(amount), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_non_negative_guard() {
        assert!(non_negative_minor_units(dec!(-1), "Payout").is_err());
        assert_eq!(non_negative_minor_units(dec!(0), "Payout").unwrap(), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("₹", dec!(50000)), "₹ 50,000.00");
        assert_eq!(format_amount("₹", dec!(999.5)), "₹ 999.50");
        assert_eq!(format_amount("₹", dec!(1234567.891)), "₹ 1,234,567.89");
        assert_eq!(format_amount("₹", dec!(-949999)), "₹ -949,999.00");
        assert_eq!(format_amount("", dec!(0)), "0.00");
    }
}
