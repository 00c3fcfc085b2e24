//! Task mirror with optimistic writes.
//!
//! # Invariants
//! - `tasks` is ordered by `created_at` descending after every load; new
//!   tasks are prepended.
//! - `loading` is cleared when a load finishes, whether it failed or not.
//! - `complete_task` updates memory first and never surfaces the store
//!   write result.

use crate::clock;
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::{debug, error, info, warn};

/// In-memory task collection layered over a [`TaskRepository`].
pub struct TaskService<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    loading: bool,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service in the loading state with an empty mirror.
    ///
    /// Call [`TaskService::load`] to populate it.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            tasks: Vec::new(),
            loading: true,
        }
    }

    /// Current mirror, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the mirror with the store contents, newest first.
    ///
    /// On failure the previous mirror is kept and the error returned.
    pub fn load(&mut self) -> RepoResult<()> {
        self.loading = true;
        let result = self.repo.get_all();
        self.loading = false;

        match result {
            Ok(mut tasks) => {
                sort_newest_first(&mut tasks);
                info!(
                    "event=tasks_load module=service status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => {
                error!("event=tasks_load module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Creates, persists and prepends a new incomplete task.
    ///
    /// The mirror is untouched when the store write fails.
    pub fn add_task(&mut self, data: NewTask) -> RepoResult<Task> {
        let task = Task::new(data);
        self.repo.put(&task)?;
        debug!("event=task_add module=service status=ok task_id={}", task.id);
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Marks a task completed in memory, then writes it without waiting on
    /// the outcome.
    ///
    /// Unknown ids are ignored. A failed store write is logged and dropped:
    /// the mirror keeps the completed record and the caller is not told.
    pub fn complete_task(&mut self, id: TaskId) {
        let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_complete module=service status=skipped reason=not_found task_id={id}");
            return;
        };

        let updated = slot.with_completion(clock::now());
        *slot = updated.clone();

        if let Err(err) = self.repo.put(&updated) {
            warn!(
                "event=task_complete module=service status=write_dropped task_id={} error={}",
                id, err
            );
        }
    }

    /// Deletes from the store, then from memory.
    pub fn delete_task(&mut self, id: TaskId) -> RepoResult<()> {
        self.repo.delete(id)?;
        self.tasks.retain(|task| task.id != id);
        debug!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// First incomplete task scheduled for today's local date.
    pub fn today_task(&self) -> Option<&Task> {
        self.today_task_on(clock::today())
    }

    /// First incomplete task scheduled for `date`, in mirror order.
    ///
    /// Several tasks may share a date; only the newest incomplete one is
    /// surfaced.
    pub fn today_task_on(&self, date: NaiveDate) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|task| !task.completed && task.is_scheduled_on(date))
    }

    pub fn today_tasks(&self) -> Vec<&Task> {
        self.tasks_scheduled_on(clock::today())
    }

    /// Every task scheduled for `date`, completed or not.
    pub fn tasks_scheduled_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.is_scheduled_on(date))
            .collect()
    }

    pub fn all_done_today(&self) -> bool {
        self.all_done_on(clock::today())
    }

    /// True when something is scheduled for `date` and all of it is done.
    pub fn all_done_on(&self, date: NaiveDate) -> bool {
        let scheduled = self.tasks_scheduled_on(date);
        !scheduled.is_empty() && scheduled.iter().all(|task| task.completed)
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.completed).collect()
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
