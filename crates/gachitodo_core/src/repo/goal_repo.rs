//! Goal collection contract and SQLite implementations.

use crate::clock;
use crate::model::goal::{Goal, GoalId};
use crate::repo::{ensure_connection_ready, parse_timestamp_column, parse_uuid, RepoResult};
use crate::store::with_store;
use rusqlite::{params, Connection, Row};

const GOAL_COLUMNS: &[&str] = &["id", "title", "created_at"];

/// Durable goal collection.
pub trait GoalRepository {
    /// Returns every stored goal in unspecified order.
    fn get_all(&self) -> RepoResult<Vec<Goal>>;
    /// Inserts or fully overwrites the goal with the same id.
    fn put(&self, goal: &Goal) -> RepoResult<()>;
    /// Removes the goal if present. Tasks pointing at it are left untouched.
    fn delete(&self, id: GoalId) -> RepoResult<()>;
}

/// Goal collection bound to a borrowed connection.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "goals", GOAL_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Goal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, created_at FROM goals;")?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }

    fn put(&self, goal: &Goal) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO goals (id, title, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                created_at = excluded.created_at;",
            params![
                goal.id.to_string(),
                goal.title.as_str(),
                clock::format_timestamp(&goal.created_at),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: GoalId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM goals WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

/// Goal collection backed by the process-wide store handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedGoalRepository;

impl GoalRepository for SharedGoalRepository {
    fn get_all(&self) -> RepoResult<Vec<Goal>> {
        with_store(|conn| SqliteGoalRepository::try_new(conn)?.get_all())
    }

    fn put(&self, goal: &Goal) -> RepoResult<()> {
        with_store(|conn| SqliteGoalRepository::try_new(conn)?.put(goal))
    }

    fn delete(&self, id: GoalId) -> RepoResult<()> {
        with_store(|conn| SqliteGoalRepository::try_new(conn)?.delete(id))
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    Ok(Goal {
        id: parse_uuid(&id_text, "goals.id")?,
        title: row.get("title")?,
        created_at: parse_timestamp_column(&created_text, "goals.created_at")?,
    })
}
