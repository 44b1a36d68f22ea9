//! Ledger state management and the pure computations over it.

pub mod engine;
pub mod ledger_store;
pub mod time;
pub mod utils;

pub use engine::{
    aggregate_by_kind, checked_balance, current_balance, filter_by_window, summarize, KindTotals,
    PeriodSummary,
};
pub use ledger_store::{
    load_snapshot, CarryForwardOutcome, CarryForwardPolicy, LedgerStore, LoadReport,
};
pub use time::{Clock, FixedClock, SystemClock};
