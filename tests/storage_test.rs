//! Storage-level tests for invariants the HTTP surface can't observe directly.

use taskd::storage::{Storage, TitleOrder};
use tempfile::TempDir;

#[tokio::test]
async fn task_ids_are_never_reused() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path()).await.unwrap();

    let first = storage.create_task("One", "first", None).await.unwrap();
    storage.delete_task(first.id).await.unwrap();

    // AUTOINCREMENT: a deleted row's id is never handed out again.
    let second = storage.create_task("Two", "second", None).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn title_sort_uses_case_sensitive_collation() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path()).await.unwrap();

    storage.create_task("alpha", "lowercase", None).await.unwrap();
    storage.create_task("Zulu", "uppercase z", None).await.unwrap();
    storage.create_task("Alpha", "uppercase a", None).await.unwrap();

    let titles: Vec<String> = storage
        .list_tasks(TitleOrder::Asc)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    // BINARY collation: all uppercase sorts before any lowercase.
    assert_eq!(titles, ["Alpha", "Zulu", "alpha"]);

    let titles: Vec<String> = storage
        .list_tasks(TitleOrder::Unsorted)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["alpha", "Zulu", "Alpha"]);
}

#[tokio::test]
async fn completion_timestamp_round_trips() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path()).await.unwrap();

    let task = storage.create_task("Toggle", "state", None).await.unwrap();
    assert!(!task.is_complete());

    let stamped = "2026-08-06T09:30:00+00:00";
    let task = storage
        .set_task_completed_at(task.id, Some(stamped))
        .await
        .unwrap();
    assert_eq!(task.completed_at.as_deref(), Some(stamped));

    let task = storage.set_task_completed_at(task.id, None).await.unwrap();
    assert!(task.completed_at.is_none());
}

#[tokio::test]
async fn delete_goal_nullifies_attached_tasks() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path()).await.unwrap();

    let goal = storage.create_goal("Doomed").await.unwrap();
    let t1 = storage.create_task("A", "first", None).await.unwrap();
    let t2 = storage.create_task("B", "second", None).await.unwrap();
    storage.attach_task_to_goal(t1.id, goal.id).await.unwrap();
    storage.attach_task_to_goal(t2.id, goal.id).await.unwrap();

    assert_eq!(storage.tasks_for_goal(goal.id).await.unwrap().len(), 2);

    storage.delete_goal(goal.id).await.unwrap();

    assert!(storage.get_goal(goal.id).await.unwrap().is_none());
    for id in [t1.id, t2.id] {
        let task = storage.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.goal_id, None);
    }
}

#[tokio::test]
async fn storage_reopens_existing_database() {
    let dir = TempDir::new().unwrap();

    {
        let storage = Storage::new(dir.path()).await.unwrap();
        storage.create_task("Persistent", "survives reopen", None).await.unwrap();
    }

    let storage = Storage::new(dir.path()).await.unwrap();
    let tasks = storage.list_tasks(TitleOrder::Unsorted).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Persistent");
}
