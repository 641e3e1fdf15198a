// Runtime configuration: where the credential, ledger, export and log files live

use std::env;
use std::path::{Path, PathBuf};

pub const USERS_FILE_ENV: &str = "EXPENSE_TRACKER_USERS_FILE";
pub const DATA_FILE_ENV: &str = "EXPENSE_TRACKER_DATA_FILE";
pub const EXPORT_DIR_ENV: &str = "EXPENSE_TRACKER_EXPORT_DIR";
pub const LOG_FILE_ENV: &str = "EXPENSE_TRACKER_LOG_FILE";

pub const DEFAULT_USERS_FILE: &str = "users.json";
pub const DEFAULT_DATA_FILE: &str = "expenses.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub users_file: PathBuf,
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    /// When set, log events go here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            export_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by any non-empty `EXPENSE_TRACKER_*` variable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(path) = var(USERS_FILE_ENV) {
            config.users_file = PathBuf::from(path);
        }
        if let Some(path) = var(DATA_FILE_ENV) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = var(EXPORT_DIR_ENV) {
            config.export_dir = PathBuf::from(path);
        }
        config.log_file = var(LOG_FILE_ENV).map(PathBuf::from);

        config
    }

    /// Builder pattern: keep every file under one directory
    pub fn in_dir(dir: &Path) -> Self {
        AppConfig {
            users_file: dir.join(DEFAULT_USERS_FILE),
            data_file: dir.join(DEFAULT_DATA_FILE),
            export_dir: dir.to_path_buf(),
            log_file: None,
        }
    }

    pub fn export_path(&self, user: &str) -> PathBuf {
        self.export_dir.join(export_file_name(user))
    }
}

/// `{user}_expenses.xlsx`, with anything that could leave the export
/// directory replaced by `_`
pub fn export_file_name(user: &str) -> String {
    let safe: String = user
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("{}_expenses.xlsx", safe)
}
