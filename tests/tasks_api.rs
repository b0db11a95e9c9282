//! Integration tests for the /tasks resource.
//! Spins up the REST server on a random port and exercises it over HTTP.

use std::sync::Arc;
use taskd::{config::ServerConfig, notify::Notifier, rest, storage::Storage, AppContext};
use tempfile::TempDir;

/// Build a full server on port 0 and return its base URL.
/// No notification token is configured, so completion sends are skipped.
async fn spawn_server(dir: &TempDir) -> String {
    let data_dir = dir.path().to_path_buf();
    let config = Arc::new(ServerConfig::new(
        Some(0),
        Some(data_dir.clone()),
        None,
        Some("error".to_string()),
        None,
        None,
    ));
    let storage = Arc::new(Storage::new(&data_dir).await.unwrap());
    let notifier = Arc::new(Notifier::new(&config));
    let ctx = Arc::new(AppContext {
        config,
        storage,
        notifier,
        started_at: std::time::Instant::now(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, rest::build_router(ctx)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn create_task(base: &str, title: &str, description: &str) -> i64 {
    let resp = reqwest::Client::new()
        .post(format!("{base}/tasks"))
        .json(&serde_json::json!({ "title": title, "description": description }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["task"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_task_returns_201_with_fresh_id() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/tasks"))
        .json(&serde_json::json!({
            "title": "Water the plants",
            "description": "Back porch first"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = resp.json().await.unwrap();
    let task = &body["task"];
    assert_eq!(task["title"], "Water the plants");
    assert_eq!(task["description"], "Back porch first");
    assert_eq!(task["is_task_complete"], false);
    // Unattached tasks carry no goal_id key at all.
    assert!(task.get("goal_id").is_none());

    let first_id = task["id"].as_i64().unwrap();
    let second_id = create_task(&base, "Second", "task").await;
    assert!(second_id > first_id);
}

#[tokio::test]
async fn create_task_missing_fields_is_invalid_data() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    for payload in [
        serde_json::json!({ "title": "No description" }),
        serde_json::json!({ "description": "No title" }),
        serde_json::json!({}),
    ] {
        let resp = client
            .post(format!("{base}/tasks"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "details": "Invalid data" }));
    }
}

#[tokio::test]
async fn create_task_with_completed_at_starts_complete() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tasks"))
        .json(&serde_json::json!({
            "title": "Already done",
            "description": "Retroactive entry",
            "completed_at": "2026-08-01T12:00:00+00:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["task"]["is_task_complete"], true);
}

#[tokio::test]
async fn read_task_unknown_id_is_404() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let resp = reqwest::get(format!("{base}/tasks/99999")).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Task 99999 not found" }));
}

#[tokio::test]
async fn read_task_non_numeric_id_is_400() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let resp = reqwest::get(format!("{base}/tasks/abc")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Task abc invalid" }));
}

#[tokio::test]
async fn list_tasks_sorts_by_title() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    create_task(&base, "Charlie", "third alphabetically").await;
    create_task(&base, "Alpha", "first alphabetically").await;
    create_task(&base, "Bravo", "second alphabetically").await;

    let titles = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    };

    let body: serde_json::Value = reqwest::get(format!("{base}/tasks?sort=asc"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["Alpha", "Bravo", "Charlie"]);

    let body: serde_json::Value = reqwest::get(format!("{base}/tasks?sort=desc"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["Charlie", "Bravo", "Alpha"]);

    // No param (or an unrecognized value) preserves insertion order.
    let body: serde_json::Value = reqwest::get(format!("{base}/tasks"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["Charlie", "Alpha", "Bravo"]);

    let body: serde_json::Value = reqwest::get(format!("{base}/tasks?sort=sideways"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["Charlie", "Alpha", "Bravo"]);
}

#[tokio::test]
async fn update_task_overwrites_title_and_description_only() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let id = create_task(&base, "Old title", "Old description").await;

    // Completion state must survive an update untouched.
    client
        .patch(format!("{base}/tasks/{id}/mark_complete"))
        .send()
        .await
        .unwrap();

    let resp = client
        .put(format!("{base}/tasks/{id}"))
        .json(&serde_json::json!({
            "title": "New title",
            "description": "New description"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["task"]["title"], "New title");
    assert_eq!(body["task"]["description"], "New description");
    assert_eq!(body["task"]["is_task_complete"], true);
}

#[tokio::test]
async fn update_task_missing_field_is_invalid_data() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let id = create_task(&base, "Title", "Description").await;

    let resp = reqwest::Client::new()
        .put(format!("{base}/tasks/{id}"))
        .json(&serde_json::json!({ "title": "Only a title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "details": "Invalid data" }));
}

#[tokio::test]
async fn delete_task_reports_details() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let id = create_task(&base, "Go on my daily walk 🏞", "Notice something new every day").await;

    let resp = client
        .delete(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "details": format!(
                "Task {id} \"Go on my daily walk 🏞\" successfully deleted"
            )
        })
    );

    let resp = client.get(format!("{base}/tasks/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn mark_complete_and_incomplete_toggle_completion() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let id = create_task(&base, "Toggle me", "On and off").await;

    let resp = client
        .patch(format!("{base}/tasks/{id}/mark_complete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["task"]["is_task_complete"], true);

    // Repeating is idempotent on status.
    let resp = client
        .patch(format!("{base}/tasks/{id}/mark_complete"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["task"]["is_task_complete"], true);

    let resp = client
        .patch(format!("{base}/tasks/{id}/mark_incomplete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["task"]["is_task_complete"], false);
}
