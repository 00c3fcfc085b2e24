//! Goal progress aggregation over in-memory collections.
//!
//! Pure functions; nothing is cached.

use crate::model::goal::{Goal, GoalId};
use crate::model::task::Task;

/// Task counts for one goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalProgress {
    pub total: usize,
    pub done: usize,
}

impl GoalProgress {
    /// `done / total * 100`, or `0.0` for a goal without tasks.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.done as f64 / self.total as f64 * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Counts the tasks linked to `goal_id` and how many of them are completed.
pub fn goal_progress(goal_id: GoalId, tasks: &[Task]) -> GoalProgress {
    tasks
        .iter()
        .filter(|task| task.belongs_to(goal_id))
        .fold(GoalProgress::default(), |mut acc, task| {
            acc.total += 1;
            if task.completed {
                acc.done += 1;
            }
            acc
        })
}

/// Progress for every goal, in the order the goals are given.
pub fn progress_by_goal(goals: &[Goal], tasks: &[Task]) -> Vec<(GoalId, GoalProgress)> {
    goals
        .iter()
        .map(|goal| (goal.id, goal_progress(goal.id, tasks)))
        .collect()
}
