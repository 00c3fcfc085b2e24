//! Store location configuration.

use std::path::PathBuf;

/// Environment override for the on-disk store path.
pub const DB_PATH_ENV: &str = "GACHITODO_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "gachitodo.sqlite3";

/// Where the process-wide store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// SQLite file; parent directories are created on open.
    File(PathBuf),
    /// Private in-memory database, gone once the handle is reset.
    Memory,
}

impl StoreConfig {
    /// Resolves the store file from `GACHITODO_DB_PATH`.
    ///
    /// Unset or blank values fall back to `<temp_dir>/gachitodo.sqlite3`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(DB_PATH_ENV).ok().as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        }
    }

    pub(crate) fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}
