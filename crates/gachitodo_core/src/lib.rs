//! Core domain logic for gachitodo.
//! This crate owns task/goal persistence and the in-memory views built on it.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{Goal, GoalId};
pub use model::task::{NewTask, Task, TaskId, TaskValidationError};
pub use repo::goal_repo::{GoalRepository, SharedGoalRepository, SqliteGoalRepository};
pub use repo::task_repo::{SharedTaskRepository, SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::goal_service::GoalService;
pub use service::progress::{goal_progress, progress_by_goal, GoalProgress};
pub use service::task_service::TaskService;
pub use store::{
    configure_store, is_store_open, reset_store, with_store, StoreConfig, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
