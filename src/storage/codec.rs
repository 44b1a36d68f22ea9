//! Wire encoding for the two persisted keys.

use rust_decimal::Decimal;

use super::Result;
use crate::{currency::parse_decimal, errors::LedgerError, ledger::Transaction};

pub fn encode_transactions(transactions: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string(transactions)?)
}

pub fn decode_transactions(raw: &str) -> Result<Vec<Transaction>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_baseline(baseline: Decimal) -> String {
    baseline.to_string()
}

pub fn decode_baseline(raw: &str) -> Result<Decimal> {
    parse_decimal(raw).map_err(|_| {
        LedgerError::Storage(format!("stored balance `{}` is not a number", raw.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, TransactionKind};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_list_round_trips_with_order_and_scale() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let pay = Transaction::new(
            2,
            TransactionKind::Income,
            "Pay",
            dec!(1000.10),
            Category::Other,
            at,
        );
        let bus = Transaction::new(
            1,
            TransactionKind::Expense,
            "Bus",
            dec!(0.30),
            Category::Transport,
            at,
        );
        let transactions = vec![pay, bus];
        let encoded = encode_transactions(&transactions).unwrap();
        let decoded = decode_transactions(&encoded).unwrap();
        assert_eq!(decoded, transactions);
        assert_eq!(decoded[0].amount.to_string(), "1000.10");
        assert_eq!(decoded[1].amount.to_string(), "0.30");
    }

    #[test]
    fn decodes_legacy_float_encoded_list() {
        let raw = r#"[{"id":1717243200000,"type":"expense","description":"Tea","amount":12.5,"category":"food","date":"2024-06-01T12:00:00.000Z"}]"#;
        let decoded = decode_transactions(raw).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].amount, dec!(12.5));
    }

    #[test]
    fn malformed_list_is_a_storage_error() {
        let err = decode_transactions("{not json").unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[test]
    fn baseline_is_a_plain_numeric_string() {
        assert_eq!(encode_baseline(dec!(500)), "500");
        assert_eq!(encode_baseline(dec!(-12.50)), "-12.50");
        assert_eq!(decode_baseline("1150.75").unwrap(), dec!(1150.75));
        assert!(matches!(decode_baseline("NaN"), Err(LedgerError::Storage(_))));
    }
}
