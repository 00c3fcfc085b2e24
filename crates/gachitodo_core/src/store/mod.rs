//! Process-wide store handle.
//!
//! # Responsibility
//! - Open the backing SQLite store lazily on first use and reuse it for the
//!   rest of the process.
//! - Allow the cached connection to be discarded for test isolation.
//!
//! # Invariants
//! - At most one connection is cached at a time.
//! - A cached connection always has migrations applied.
//! - Callers only see the connection inside [`with_store`], under the lock.

use crate::db::{open_db, open_db_in_memory, DbError};
use log::{debug, info};
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::cell::Cell;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

mod config;

pub use config::{StoreConfig, DB_PATH_ENV};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to prepare store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("store handle lock poisoned by an earlier panic")]
    Poisoned,
    #[error("store handle is already in use on this thread")]
    Reentrant,
}

#[derive(Default)]
struct StoreSlot {
    config: Option<StoreConfig>,
    conn: Option<Connection>,
}

static STORE: Lazy<Mutex<StoreSlot>> = Lazy::new(|| Mutex::new(StoreSlot::default()));

thread_local! {
    static IN_STORE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as holding the store lock until dropped.
struct ReentryGuard;

impl ReentryGuard {
    fn enter() -> StoreResult<Self> {
        if IN_STORE.with(|flag| flag.replace(true)) {
            return Err(StoreError::Reentrant);
        }
        Ok(Self)
    }
}

impl Drop for ReentryGuard {
    fn drop(&mut self) {
        IN_STORE.with(|flag| flag.set(false));
    }
}

/// Sets the location used by the next open.
///
/// Any cached connection is dropped so the new location takes effect on the
/// next [`with_store`] call.
pub fn configure_store(config: StoreConfig) {
    let mut slot = lock_recovering();
    info!(
        "event=store_configure module=store status=ok mode={} had_connection={}",
        config.mode(),
        slot.conn.is_some()
    );
    slot.conn = None;
    slot.config = Some(config);
}

/// Runs `f` against the shared connection, opening it on first use.
///
/// The handle lock is held while `f` runs. `f` must not touch the shared
/// handle again: a nested `with_store` (including any `Shared*Repository`
/// call) fails with `StoreError::Reentrant`, and a nested
/// [`configure_store`], [`reset_store`] or [`is_store_open`] deadlocks.
///
/// # Errors
/// - Open/migration failures are returned as `StoreError` converted into `E`.
/// - `Reentrant` when called from inside another `with_store` closure.
/// - Errors returned by `f` pass through unchanged.
pub fn with_store<T, E>(f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
where
    E: From<StoreError>,
{
    let _reentry = ReentryGuard::enter()?;
    let mut slot = STORE.lock().map_err(|_| StoreError::Poisoned)?;
    if let Some(conn) = slot.conn.as_ref() {
        return f(conn);
    }

    let config = slot.config.clone().unwrap_or_else(StoreConfig::from_env);
    let conn = slot.conn.insert(open_store(&config)?);
    f(conn)
}

/// Discards the cached connection; the next [`with_store`] opens a fresh one.
///
/// Also clears lock poisoning left behind by a panicking caller.
pub fn reset_store() {
    let mut slot = lock_recovering();
    let had_connection = slot.conn.take().is_some();
    drop(slot);
    STORE.clear_poison();
    debug!("event=store_reset module=store status=ok had_connection={had_connection}");
}

/// Returns whether a connection is currently cached.
pub fn is_store_open() -> bool {
    lock_recovering().conn.is_some()
}

fn lock_recovering() -> std::sync::MutexGuard<'static, StoreSlot> {
    STORE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn open_store(config: &StoreConfig) -> StoreResult<Connection> {
    let conn = match config {
        StoreConfig::File(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            open_db(path)?
        }
        StoreConfig::Memory => open_db_in_memory()?,
    };
    Ok(conn)
}
