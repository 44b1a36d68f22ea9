use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Complete in-memory ledger state: a baseline plus every recorded transaction.
///
/// `transactions` is newest-first by insertion; new entries are prepended.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub baseline: Decimal,
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn new(baseline: Decimal, transactions: Vec<Transaction>) -> Self {
        Self {
            baseline,
            transactions,
        }
    }

    pub fn prepend(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn latest_id(&self) -> Option<i64> {
        self.transactions.iter().map(|txn| txn.id).max()
    }
}
