#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use spendly::{
    core::{CarryForwardPolicy, FixedClock, LedgerStore},
    storage::JsonFileStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn clock_at(now: DateTime<Utc>) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(now))
}

/// Opens a store over JSON files in `dir`.
pub fn open_store(dir: &Path, clock: Arc<FixedClock>, policy: CarryForwardPolicy) -> LedgerStore {
    let backend = JsonFileStore::new(dir.to_path_buf()).expect("create json store");
    LedgerStore::load(Arc::new(backend), clock, policy).expect("load ledger store")
}
