//! Money parsing and display helpers.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{errors::LedgerError, ledger::TransactionKind};

/// Minor-unit digits shown for every amount.
pub const DISPLAY_PRECISION: u32 = 2;

/// Parses user or persisted text into a decimal.
///
/// Accepts plain (`12.5`, `-3`) and scientific (`1e3`) notation; surrounding
/// whitespace is ignored.
pub fn parse_decimal(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput("amount is required".into()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidInput(format!("`{trimmed}` is not a valid amount")))
}

/// Renders `value` with the currency symbol and two decimals, e.g. `₹1150.00`.
pub fn format_amount(symbol: &str, value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(
        DISPLAY_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", symbol, rounded.abs())
    } else {
        format!("{}{:.2}", symbol, rounded.abs())
    }
}

/// Renders a transaction amount with the sign it contributes, e.g. `-₹50.00`.
pub fn format_signed(symbol: &str, kind: TransactionKind, amount: Decimal) -> String {
    let body = format_amount(symbol, amount.abs());
    match kind {
        TransactionKind::Income => format!("+{body}"),
        TransactionKind::Expense => format!("-{body}"),
    }
}

/// Day/month/year rendering used in transaction lists (`15/3/2024`).
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_two_decimals_with_symbol() {
        assert_eq!(format_amount("₹", dec!(1150)), "₹1150.00");
        assert_eq!(format_amount("₹", dec!(0.005)), "₹0.01");
        assert_eq!(format_amount("$", dec!(-20.5)), "-$20.50");
        assert_eq!(format_amount("$", dec!(-0.001)), "$0.00");
    }

    #[test]
    fn signed_rendering_follows_kind() {
        assert_eq!(
            format_signed("₹", TransactionKind::Income, dec!(200)),
            "+₹200.00"
        );
        assert_eq!(
            format_signed("₹", TransactionKind::Expense, dec!(50)),
            "-₹50.00"
        );
    }

    #[test]
    fn parses_plain_and_scientific_amounts() {
        assert_eq!(parse_decimal(" 150 ").unwrap(), dec!(150));
        assert_eq!(parse_decimal("-12.75").unwrap(), dec!(-12.75));
        assert_eq!(parse_decimal("1e3").unwrap(), dec!(1000));
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("12abc").is_err());
    }

    #[test]
    fn date_matches_day_month_year_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "5/3/2024");
    }
}
