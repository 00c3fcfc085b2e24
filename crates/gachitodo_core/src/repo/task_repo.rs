//! Task collection contract and SQLite implementations.
//!
//! # Responsibility
//! - Persist whole task records keyed by id.
//! - Map dates/timestamps to their text forms at the SQL boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before touching SQL.
//! - `goal_id` is stored without a foreign key; goal deletion never cascades.

use crate::clock;
use crate::model::task::{Task, TaskId};
use crate::repo::{
    ensure_connection_ready, parse_timestamp_column, parse_uuid, RepoError, RepoResult,
};
use crate::store::with_store;
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    goal_id,
    scheduled_date,
    completed,
    completed_at,
    created_at
FROM tasks";

const TASK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "goal_id",
    "scheduled_date",
    "completed",
    "completed_at",
    "created_at",
];

/// Durable task collection.
pub trait TaskRepository {
    /// Returns every stored task in unspecified order.
    fn get_all(&self) -> RepoResult<Vec<Task>>;
    /// Inserts or fully overwrites the task with the same id.
    fn put(&self, task: &Task) -> RepoResult<()>;
    /// Removes the task if present.
    fn delete(&self, id: TaskId) -> RepoResult<()>;
}

/// Task collection bound to a borrowed connection.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{TASK_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn put(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                goal_id,
                scheduled_date,
                completed,
                completed_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                goal_id = excluded.goal_id,
                scheduled_date = excluded.scheduled_date,
                completed = excluded.completed,
                completed_at = excluded.completed_at,
                created_at = excluded.created_at;",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.goal_id.map(|id| id.to_string()),
                task.scheduled_date.as_ref().map(clock::format_date),
                bool_to_int(task.completed),
                task.completed_at.as_ref().map(clock::format_timestamp),
                clock::format_timestamp(&task.created_at),
            ],
        )?;

        Ok(())
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

/// Task collection backed by the process-wide store handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTaskRepository;

impl TaskRepository for SharedTaskRepository {
    fn get_all(&self) -> RepoResult<Vec<Task>> {
        with_store(|conn| SqliteTaskRepository::try_new(conn)?.get_all())
    }

    fn put(&self, task: &Task) -> RepoResult<()> {
        with_store(|conn| SqliteTaskRepository::try_new(conn)?.put(task))
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        with_store(|conn| SqliteTaskRepository::try_new(conn)?.delete(id))
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "tasks.id")?;

    let goal_id = match row.get::<_, Option<String>>("goal_id")? {
        Some(value) => Some(parse_uuid(&value, "tasks.goal_id")?),
        None => None,
    };

    let scheduled_date = match row.get::<_, Option<String>>("scheduled_date")? {
        Some(value) => Some(clock::parse_date(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid date `{value}` in tasks.scheduled_date"
            ))
        })?),
        None => None,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let completed_at = match row.get::<_, Option<String>>("completed_at")? {
        Some(value) => Some(parse_timestamp_column(&value, "tasks.completed_at")?),
        None => None,
    };

    let created_text: String = row.get("created_at")?;

    let task = Task {
        id,
        title: row.get("title")?,
        goal_id,
        scheduled_date,
        completed,
        completed_at,
        created_at: parse_timestamp_column(&created_text, "tasks.created_at")?,
    };
    task.validate()?;
    Ok(task)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
