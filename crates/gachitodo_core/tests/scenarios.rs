use gachitodo_core::clock;
use gachitodo_core::db::open_db_in_memory;
use gachitodo_core::{
    goal_progress, progress_by_goal, GoalRepository, GoalService, NewTask, SqliteGoalRepository,
    SqliteTaskRepository, TaskRepository, TaskService,
};

#[test]
fn add_task_returns_record_and_writes_through() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();

    let created = tasks.add_task(NewTask::new("Study English")).unwrap();

    assert!(!created.id.is_nil());
    assert!(!created.completed);
    assert_eq!(created.completed_at, None);
    assert_eq!(tasks.tasks()[0], created);

    let stored = SqliteTaskRepository::try_new(&conn)
        .unwrap()
        .get_all()
        .unwrap();
    assert_eq!(stored, vec![created]);
}

#[test]
fn added_tasks_are_prepended() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();

    tasks.add_task(NewTask::new("first")).unwrap();
    tasks.add_task(NewTask::new("second")).unwrap();

    let titles: Vec<_> = tasks.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["second", "first"]);
}

#[test]
fn complete_task_persists_completion() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();
    let task = tasks.add_task(NewTask::new("Read")).unwrap();

    tasks.complete_task(task.id);

    let in_memory = tasks.find_task(task.id).unwrap().clone();
    assert!(in_memory.completed);
    assert!(in_memory.completed_at.is_some());
    assert_eq!(in_memory.created_at, task.created_at);

    let mut reloaded = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    reloaded.load().unwrap();
    assert_eq!(reloaded.tasks(), [in_memory]);
}

#[test]
fn complete_unknown_task_leaves_collection_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();
    tasks.add_task(NewTask::new("Read")).unwrap();
    let before = tasks.tasks().to_vec();

    tasks.complete_task(uuid::Uuid::new_v4());

    assert_eq!(tasks.tasks(), before.as_slice());
}

#[test]
fn delete_task_removes_from_memory_and_store() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();
    let keep = tasks.add_task(NewTask::new("keep")).unwrap();
    let gone = tasks.add_task(NewTask::new("gone")).unwrap();

    tasks.delete_task(gone.id).unwrap();

    assert!(tasks.find_task(gone.id).is_none());
    let stored = SqliteTaskRepository::try_new(&conn)
        .unwrap()
        .get_all()
        .unwrap();
    assert_eq!(stored, vec![keep]);
}

#[test]
fn today_task_follows_schedule_and_completion() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();
    let today = clock::today();

    assert!(tasks.today_task_on(today).is_none());

    tasks.add_task(NewTask::new("Study English")).unwrap();
    assert!(tasks.today_task_on(today).is_none());

    let read = tasks
        .add_task(NewTask::new("Read").scheduled_on(today))
        .unwrap();
    assert_eq!(tasks.today_task_on(today).map(|t| t.id), Some(read.id));

    tasks.complete_task(read.id);
    assert!(tasks.today_task_on(today).is_none());
    assert!(tasks.all_done_on(today));
    assert_eq!(tasks.tasks_scheduled_on(today).len(), 1);
}

#[test]
fn today_task_ignores_other_dates() {
    let conn = open_db_in_memory().unwrap();
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks.load().unwrap();
    let today = clock::today();

    tasks
        .add_task(NewTask::new("today").scheduled_on(today))
        .unwrap();
    tasks
        .add_task(NewTask::new("long ago").scheduled_on(today.pred_opt().unwrap()))
        .unwrap();

    assert_eq!(tasks.today_task_on(today).map(|t| t.title.as_str()), Some("today"));
}

#[test]
fn goal_progress_counts_linked_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mut goals = GoalService::new(SqliteGoalRepository::try_new(&conn).unwrap());
    let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    goals.load().unwrap();
    tasks.load().unwrap();

    let goal = goals.add_goal("Learn Spanish").unwrap();
    let first = tasks
        .add_task(NewTask::new("Vocabulary").with_goal(goal.id))
        .unwrap();
    tasks
        .add_task(NewTask::new("Grammar").with_goal(goal.id))
        .unwrap();
    tasks.complete_task(first.id);

    let progress = goal_progress(goal.id, tasks.tasks());
    assert_eq!((progress.total, progress.done), (2, 1));
    assert_eq!(progress.percent(), 50.0);

    let rows = progress_by_goal(goals.goals(), tasks.tasks());
    assert_eq!(rows, vec![(goal.id, progress)]);
}

#[test]
fn goal_service_add_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let mut goals = GoalService::new(SqliteGoalRepository::try_new(&conn).unwrap());
    assert!(goals.is_loading());
    goals.load().unwrap();
    assert!(!goals.is_loading());

    let older = goals.add_goal("older").unwrap();
    let newer = goals.add_goal("  untrimmed  ").unwrap();
    assert_eq!(newer.title, "  untrimmed  ");
    assert_eq!(goals.goals()[0].id, newer.id);
    assert_eq!(goals.find_goal(older.id), Some(&older));

    goals.delete_goal(older.id).unwrap();
    assert!(goals.find_goal(older.id).is_none());

    let stored = SqliteGoalRepository::try_new(&conn)
        .unwrap()
        .get_all()
        .unwrap();
    assert_eq!(stored, vec![newer]);
}
