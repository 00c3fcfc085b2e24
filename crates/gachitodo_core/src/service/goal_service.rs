//! Goal mirror with write-through creation and deletion.

use crate::model::goal::{Goal, GoalId};
use crate::repo::goal_repo::GoalRepository;
use crate::repo::RepoResult;
use log::{debug, error, info};

/// In-memory goal collection layered over a [`GoalRepository`].
pub struct GoalService<R: GoalRepository> {
    repo: R,
    goals: Vec<Goal>,
    loading: bool,
}

impl<R: GoalRepository> GoalService<R> {
    /// Creates a service in the loading state with an empty mirror.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            goals: Vec::new(),
            loading: true,
        }
    }

    /// Current mirror, newest first.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the mirror with the store contents, newest first.
    ///
    /// `loading` is cleared on both outcomes; a failure keeps the old mirror.
    pub fn load(&mut self) -> RepoResult<()> {
        self.loading = true;
        let result = self.repo.get_all();
        self.loading = false;

        let mut goals = result.inspect_err(|err| {
            error!("event=goals_load module=service status=error error={err}");
        })?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        info!(
            "event=goals_load module=service status=ok count={}",
            goals.len()
        );
        self.goals = goals;
        Ok(())
    }

    /// Creates, persists and prepends a goal. The title is taken verbatim.
    pub fn add_goal(&mut self, title: impl Into<String>) -> RepoResult<Goal> {
        let goal = Goal::new(title);
        self.repo.put(&goal)?;
        debug!("event=goal_add module=service status=ok goal_id={}", goal.id);
        self.goals.insert(0, goal.clone());
        Ok(goal)
    }

    /// Deletes from the store, then from memory. Linked tasks keep their
    /// `goal_id`.
    pub fn delete_goal(&mut self, id: GoalId) -> RepoResult<()> {
        self.repo.delete(id)?;
        self.goals.retain(|goal| goal.id != id);
        debug!("event=goal_delete module=service status=ok goal_id={id}");
        Ok(())
    }

    /// Looks a goal up in memory; dangling references resolve to `None`.
    pub fn find_goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::GoalService;
    use crate::model::goal::{Goal, GoalId};
    use crate::repo::goal_repo::GoalRepository;
    use crate::repo::{RepoError, RepoResult};
    use chrono::Duration;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeGoalRepository {
        rows: RefCell<Vec<Goal>>,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
    }

    impl GoalRepository for FakeGoalRepository {
        fn get_all(&self) -> RepoResult<Vec<Goal>> {
            if self.fail_reads.get() {
                return Err(RepoError::InvalidData("read failed".to_string()));
            }
            Ok(self.rows.borrow().clone())
        }

        fn put(&self, goal: &Goal) -> RepoResult<()> {
            if self.fail_writes.get() {
                return Err(RepoError::InvalidData("write failed".to_string()));
            }
            let mut rows = self.rows.borrow_mut();
            rows.retain(|row| row.id != goal.id);
            rows.push(goal.clone());
            Ok(())
        }

        fn delete(&self, id: GoalId) -> RepoResult<()> {
            if self.fail_writes.get() {
                return Err(RepoError::InvalidData("delete failed".to_string()));
            }
            self.rows.borrow_mut().retain(|row| row.id != id);
            Ok(())
        }
    }

    fn loaded(repo: FakeGoalRepository) -> GoalService<FakeGoalRepository> {
        let mut service = GoalService::new(repo);
        service.load().unwrap();
        service
    }

    #[test]
    fn load_sorts_newest_first() {
        let mut older = Goal::new("older");
        older.created_at -= Duration::days(1);
        let newer = Goal::new("newer");
        let repo = FakeGoalRepository::default();
        repo.rows.borrow_mut().extend([older, newer]);

        let service = loaded(repo);
        let titles: Vec<_> = service.goals().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[test]
    fn failed_load_clears_loading_and_keeps_previous_mirror() {
        let mut service = loaded(FakeGoalRepository::default());
        let goal = service.add_goal("Learn Spanish").unwrap();
        service.repo.fail_reads.set(true);

        assert!(service.load().is_err());
        assert!(!service.is_loading());
        assert_eq!(service.goals(), [goal]);
    }

    #[test]
    fn failed_first_load_still_clears_loading() {
        let repo = FakeGoalRepository::default();
        repo.fail_reads.set(true);
        let mut service = GoalService::new(repo);
        assert!(service.is_loading());

        assert!(service.load().is_err());
        assert!(!service.is_loading());
        assert!(service.goals().is_empty());
    }

    #[test]
    fn failed_add_leaves_mirror_untouched() {
        let mut service = loaded(FakeGoalRepository::default());
        service.repo.fail_writes.set(true);

        assert!(service.add_goal("lost").is_err());
        assert!(service.goals().is_empty());
    }

    #[test]
    fn failed_delete_leaves_goal_in_memory() {
        let mut service = loaded(FakeGoalRepository::default());
        let goal = service.add_goal("stays").unwrap();
        service.repo.fail_writes.set(true);

        assert!(service.delete_goal(goal.id).is_err());
        assert_eq!(service.find_goal(goal.id), Some(&goal));
        assert_eq!(service.repo.rows.borrow().len(), 1);
    }
}
