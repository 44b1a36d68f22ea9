use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::{currency::parse_decimal, errors::LedgerError};

/// A recorded income or expense event. Immutable once created.
///
/// Field names on the wire follow the persisted record layout
/// `{id, type, description, amount, category, date}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: i64,
        kind: TransactionKind,
        description: impl Into<String>,
        amount: Decimal,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            description: description.into(),
            amount,
            category,
            timestamp,
        }
    }

    /// Amount with the sign it contributes to a balance.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.apply_sign(self.amount)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    pub fn apply_sign(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

/// Raw user input for a new transaction, prior to validation.
///
/// `amount` stays textual so the entry boundary owns parsing and rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub description: String,
    pub amount: String,
    pub category: Category,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount: amount.into(),
            category,
        }
    }

    pub fn income(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: Category,
    ) -> Self {
        Self::new(TransactionKind::Income, description, amount, category)
    }

    pub fn expense(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: Category,
    ) -> Self {
        Self::new(TransactionKind::Expense, description, amount, category)
    }

    /// Checks the draft and returns the trimmed description and parsed amount.
    pub fn validate(&self) -> Result<(String, Decimal), LedgerError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(LedgerError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        let amount = parse_decimal(&self.amount)?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "amount must be greater than zero (got {amount})"
            )));
        }
        Ok((description.to_string(), amount))
    }
}
