#![doc(test(attr(deny(warnings))))]

//! Spendly keeps a personal income and expense ledger: a baseline balance,
//! an append-only transaction list, and day, week and month views over it.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(None);
        tracing::info!("Spendly tracing initialized.");
    });
}
