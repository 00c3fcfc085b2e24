//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its creation input.
//! - Own the completion transition (`completed` + `completed_at`).
//!
//! # Invariants
//! - `completed_at` is `Some` if and only if `completed` is `true`.
//! - `created_at` is set once by [`Task::new`] and never rewritten.
//! - `goal_id` is a weak reference; goal deletion leaves it dangling.

use crate::clock;
use crate::model::goal::GoalId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type TaskId = Uuid;

/// Unit of work, optionally scheduled for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<GoalId>,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::optional_timestamp"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::model::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new task. Everything else is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub goal_id: Option<GoalId>,
    pub scheduled_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_goal(mut self, goal_id: GoalId) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("task {id}: completed={completed} does not match completed_at presence")]
    CompletedAtMismatch { id: TaskId, completed: bool },
}

impl Task {
    /// Builds an incomplete task with a fresh id and `created_at = now`.
    pub fn new(data: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            goal_id: data.goal_id,
            scheduled_date: data.scheduled_date,
            completed: false,
            completed_at: None,
            created_at: clock::now(),
        }
    }

    /// Returns a copy marked completed at `at`. Other fields are untouched.
    pub fn with_completion(&self, at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(at),
            ..self.clone()
        }
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.scheduled_date == Some(date)
    }

    pub fn belongs_to(&self, goal_id: GoalId) -> bool {
        self.goal_id == Some(goal_id)
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.completed != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletedAtMismatch {
                id: self.id,
                completed: self.completed,
            });
        }
        Ok(())
    }
}
