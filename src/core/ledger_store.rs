use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{
    engine::{self, PeriodSummary},
    time::Clock,
};
use crate::{
    errors::LedgerError,
    ledger::{LedgerSnapshot, Transaction, TransactionDraft, ViewWindow},
    storage::{
        codec, KeyValueStore, PendingWrite, PersistenceWriter, BALANCE_KEY, TRANSACTIONS_KEY,
    },
};

/// What carrying the balance forward does with existing transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CarryForwardPolicy {
    /// Keep the list. Those transactions are then counted again on top of
    /// the carried baseline.
    #[default]
    RetainHistory,
    /// Drop the list together with the baseline swap, so the balance is unchanged.
    ClearHistory,
}

impl CarryForwardPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CarryForwardPolicy::RetainHistory => "retain-history",
            CarryForwardPolicy::ClearHistory => "clear-history",
        }
    }
}

impl fmt::Display for CarryForwardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarryForwardPolicy {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retain-history" | "retain" => Ok(CarryForwardPolicy::RetainHistory),
            "clear-history" | "clear" => Ok(CarryForwardPolicy::ClearHistory),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown carry-forward policy `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarryForwardOutcome {
    pub previous_baseline: Decimal,
    pub new_baseline: Decimal,
    /// Number of transactions removed; always zero under `RetainHistory`.
    pub cleared: usize,
}

/// Anomalies met while loading persisted state. Loading itself never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Reads both persisted keys, substituting empty defaults for anything missing
/// or unreadable.
pub fn load_snapshot(backend: &dyn KeyValueStore) -> (LedgerSnapshot, LoadReport) {
    let mut report = LoadReport::default();

    let transactions = match backend.get(TRANSACTIONS_KEY) {
        Ok(Some(raw)) => codec::decode_transactions(&raw).unwrap_or_else(|err| {
            report.warn(format!("discarding unreadable transaction list: {err}"));
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            report.warn(format!("could not read transaction list: {err}"));
            Vec::new()
        }
    };

    let baseline = match backend.get(BALANCE_KEY) {
        Ok(Some(raw)) => codec::decode_baseline(&raw).unwrap_or_else(|err| {
            report.warn(format!("discarding unreadable baseline: {err}"));
            Decimal::ZERO
        }),
        Ok(None) => Decimal::ZERO,
        Err(err) => {
            report.warn(format!("could not read baseline: {err}"));
            Decimal::ZERO
        }
    };

    let snapshot = LedgerSnapshot::new(baseline, transactions);
    if engine::checked_balance(&snapshot).is_none() {
        report.warn(
            "stored balance exceeds the supported range; totals are clamped until it is reset"
                .to_string(),
        );
    }
    (snapshot, report)
}

fn out_of_range(action: &str) -> LedgerError {
    LedgerError::InvalidInput(format!(
        "{action} would take the balance outside the supported range"
    ))
}

/// Owns the live snapshot and hands every change to the background writer.
pub struct LedgerStore {
    snapshot: LedgerSnapshot,
    clock: Arc<dyn Clock>,
    policy: CarryForwardPolicy,
    report: LoadReport,
    writer: PersistenceWriter,
}

impl fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore")
            .field("snapshot", &self.snapshot)
            .field("policy", &self.policy)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl LedgerStore {
    /// Populates a store from `backend`.
    ///
    /// Bad or missing data never fails the load; the only error is being
    /// unable to start the writer thread.
    pub fn load(
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        policy: CarryForwardPolicy,
    ) -> Result<Self, LedgerError> {
        let (snapshot, report) = load_snapshot(backend.as_ref());
        info!(
            transactions = snapshot.len(),
            baseline = %snapshot.baseline,
            warnings = report.warnings.len(),
            "ledger loaded"
        );
        let writer = PersistenceWriter::spawn(backend)?;
        Ok(Self {
            snapshot,
            clock,
            policy,
            report,
            writer,
        })
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn baseline(&self) -> Decimal {
        self.snapshot.baseline
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn policy(&self) -> CarryForwardPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CarryForwardPolicy) {
        self.policy = policy;
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn current_balance(&self) -> Decimal {
        engine::current_balance(&self.snapshot)
    }

    pub fn view<Tz: TimeZone>(&self, window: ViewWindow, now: &DateTime<Tz>) -> PeriodSummary {
        engine::summarize(&self.snapshot, window, now)
    }

    /// Validates `draft`, records it as the newest transaction and persists.
    ///
    /// On invalid input, including amounts that would overflow the balance,
    /// nothing changes and nothing is written.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, LedgerError> {
        let (description, amount) = draft.validate()?;
        let transaction = Transaction::new(
            self.next_id(),
            draft.kind,
            description,
            amount,
            draft.category,
            self.clock.now(),
        );
        if self
            .balance_after(self.snapshot.baseline, Some(&transaction))
            .is_none()
        {
            return Err(out_of_range("this transaction"));
        }
        self.snapshot.prepend(transaction.clone());
        debug!(
            id = transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "transaction added"
        );
        self.persist(false);
        Ok(transaction)
    }

    pub fn set_balance(&mut self, value: Decimal) -> Result<(), LedgerError> {
        if self.balance_after(value, None).is_none() {
            return Err(out_of_range("this baseline"));
        }
        debug!(previous = %self.snapshot.baseline, baseline = %value, "baseline set");
        self.snapshot.baseline = value;
        self.persist(true);
        Ok(())
    }

    /// Makes the current balance the new baseline, dropping the history
    /// under `ClearHistory`.
    ///
    /// Fails without changes when the current balance, or under
    /// `RetainHistory` the balance after the carry, is out of range.
    pub fn carry_forward_balance(&mut self) -> Result<CarryForwardOutcome, LedgerError> {
        let previous_baseline = self.snapshot.baseline;
        let new_baseline = engine::checked_balance(&self.snapshot)
            .ok_or_else(|| out_of_range("carrying forward"))?;
        if self.policy == CarryForwardPolicy::RetainHistory
            && self.balance_after(new_baseline, None).is_none()
        {
            return Err(out_of_range("carrying forward"));
        }
        self.snapshot.baseline = new_baseline;
        let cleared = match self.policy {
            CarryForwardPolicy::RetainHistory => 0,
            CarryForwardPolicy::ClearHistory => {
                let cleared = self.snapshot.len();
                self.snapshot.transactions.clear();
                cleared
            }
        };
        debug!(
            previous = %previous_baseline,
            baseline = %new_baseline,
            cleared,
            policy = %self.policy,
            "balance carried forward"
        );
        self.persist(true);
        Ok(CarryForwardOutcome {
            previous_baseline,
            new_baseline,
            cleared,
        })
    }

    /// Queues the whole snapshot, baseline included, for writing.
    pub fn save(&self) {
        self.persist(true);
    }

    /// Blocks until every queued write has been attempted.
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn persist(&self, include_baseline: bool) {
        let transactions = match codec::encode_transactions(&self.snapshot.transactions) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(error = %err, "failed to encode transactions; snapshot not persisted");
                return;
            }
        };
        let baseline = include_baseline.then(|| codec::encode_baseline(self.snapshot.baseline));
        self.writer.submit(PendingWrite {
            transactions,
            baseline,
        });
    }

    /// Balance over the current list with `baseline`, plus `extra` if given.
    fn balance_after(&self, baseline: Decimal, extra: Option<&Transaction>) -> Option<Decimal> {
        let mut totals = engine::checked_totals(&self.snapshot.transactions)?;
        if let Some(txn) = extra {
            totals = totals.checked_with(txn)?;
        }
        baseline.checked_add(totals.checked_net()?)
    }

    fn next_id(&self) -> i64 {
        let candidate = self.clock.now().timestamp_millis();
        match self.snapshot.latest_id() {
            Some(latest) if candidate <= latest => latest + 1,
            _ => candidate,
        }
    }
}
