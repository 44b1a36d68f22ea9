//! Ledger domain models: transactions, categories, snapshots and view windows.

pub mod category;
pub mod snapshot;
pub mod transaction;
pub mod window;

pub use category::Category;
pub use snapshot::LedgerSnapshot;
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
pub use window::{start_of_day, window_start, ViewWindow};
