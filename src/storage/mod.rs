//! Key-value persistence for ledger snapshots.

pub mod codec;
pub mod json_backend;
pub mod memory;
pub mod writer;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key holding the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the baseline balance as a plain decimal string.
pub const BALANCE_KEY: &str = "monthly-balance";

/// Abstraction over durable string key-value backends.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use writer::{PendingWrite, PersistenceWriter};
