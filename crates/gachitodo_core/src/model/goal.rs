//! Goal domain model.

use crate::clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type GoalId = Uuid;

/// Long-running objective that tasks may point at through `Task::goal_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(with = "crate::model::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Creates a goal with a fresh id stamped with the current time.
    ///
    /// The title is stored as given.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: clock::now(),
        }
    }
}
