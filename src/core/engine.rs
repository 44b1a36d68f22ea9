//! Pure balance and window computations over a ledger snapshot.
//!
//! Nothing here mutates or caches; every call recomputes from its inputs.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{window_start, LedgerSnapshot, Transaction, TransactionKind, ViewWindow};

/// Income and expense sums over some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl KindTotals {
    /// Income minus expense, clamped to the `Decimal` range.
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }

    pub fn checked_net(&self) -> Option<Decimal> {
        self.income.checked_sub(self.expense)
    }

    /// Adds one transaction, or `None` when its sum leaves the `Decimal` range.
    pub fn checked_with(mut self, txn: &Transaction) -> Option<Self> {
        match txn.kind {
            TransactionKind::Income => self.income = self.income.checked_add(txn.amount)?,
            TransactionKind::Expense => self.expense = self.expense.checked_add(txn.amount)?,
        }
        Some(self)
    }
}

/// Everything a period view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub window: ViewWindow,
    pub since: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub totals: KindTotals,
    pub current_balance: Decimal,
}

/// Baseline plus income minus expense over every transaction, ignoring windows.
///
/// The store refuses changes that would leave this range, but a hand-edited
/// file can still get there, so out-of-range results clamp at `Decimal::MAX`
/// or `Decimal::MIN`.
pub fn current_balance(snapshot: &LedgerSnapshot) -> Decimal {
    checked_balance(snapshot).unwrap_or_else(|| {
        snapshot
            .transactions
            .iter()
            .fold(snapshot.baseline, |balance, txn| {
                balance.saturating_add(txn.signed_amount())
            })
    })
}

/// `None` when the balance or either per-kind total overflows.
pub fn checked_balance(snapshot: &LedgerSnapshot) -> Option<Decimal> {
    let totals = checked_totals(&snapshot.transactions)?;
    snapshot.baseline.checked_add(totals.checked_net()?)
}

pub fn checked_totals(transactions: &[Transaction]) -> Option<KindTotals> {
    transactions
        .iter()
        .try_fold(KindTotals::default(), |totals, txn| totals.checked_with(txn))
}

/// Transactions inside `window` as seen from `now`, in their original order.
pub fn filter_by_window<Tz: TimeZone>(
    transactions: &[Transaction],
    window: ViewWindow,
    now: &DateTime<Tz>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|txn| window.contains(&txn.timestamp, now))
        .cloned()
        .collect()
}

/// Per-kind sums, saturating like `current_balance`.
pub fn aggregate_by_kind(transactions: &[Transaction]) -> KindTotals {
    transactions
        .iter()
        .fold(KindTotals::default(), |mut totals, txn| {
            match txn.kind {
                TransactionKind::Income => {
                    totals.income = totals.income.saturating_add(txn.amount)
                }
                TransactionKind::Expense => {
                    totals.expense = totals.expense.saturating_add(txn.amount)
                }
            }
            totals
        })
}

pub fn summarize<Tz: TimeZone>(
    snapshot: &LedgerSnapshot,
    window: ViewWindow,
    now: &DateTime<Tz>,
) -> PeriodSummary {
    let transactions = filter_by_window(&snapshot.transactions, window, now);
    let totals = aggregate_by_kind(&transactions);
    PeriodSummary {
        window,
        since: window_start(window, now),
        transactions,
        totals,
        current_balance: current_balance(snapshot),
    }
}
