use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

/// Overrides the application directory when set.
pub const HOME_ENV: &str = "SPENDLY_HOME";
const DEFAULT_DIR_NAME: &str = "spendly";
const FALLBACK_DIR_NAME: &str = ".spendly";
const STORE_DIR: &str = "store";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to the platform data dir.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::data_dir()
        .map(|base| base.join(DEFAULT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(FALLBACK_DIR_NAME))
}

/// Directory holding the persisted ledger keys.
pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
