// rest/routes/tasks.rs — Task resource routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::rest::error::ApiError;
use crate::storage::{TaskRow, TitleOrder};
use crate::AppContext;

use super::load_task;

/// Wire shape of a task. `is_task_complete` derives from the completion
/// timestamp; `goal_id` is omitted entirely while the task is unattached.
pub(crate) fn task_body(task: &TaskRow) -> Value {
    let mut body = json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "is_task_complete": task.is_complete(),
    });
    if let Some(goal_id) = task.goal_id {
        body["goal_id"] = json!(goal_id);
    }
    body
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp; absent or null means the task starts incomplete.
    pub completed_at: Option<String>,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(title), Some(description)) = (body.title, body.description) else {
        return Err(ApiError::InvalidData);
    };

    let task = ctx
        .storage
        .create_task(&title, &description, body.completed_at.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "task": task_body(&task) }))))
}

#[derive(Deserialize)]
pub struct ListTasksQuery {
    pub sort: Option<String>,
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Value>, ApiError> {
    // Anything other than "asc"/"desc" (including no param) is unsorted.
    let order = match query.sort.as_deref() {
        Some("asc") => TitleOrder::Asc,
        Some("desc") => TitleOrder::Desc,
        _ => TitleOrder::Unsorted,
    };

    let tasks = ctx.storage.list_tasks(order).await?;
    let list: Vec<Value> = tasks.iter().map(task_body).collect();
    Ok(Json(json!(list)))
}

pub async fn read_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = load_task(&ctx.storage, &id).await?;
    Ok(Json(json!({ "task": task_body(&task) })))
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let task = load_task(&ctx.storage, &id).await?;

    let (Some(title), Some(description)) = (body.title, body.description) else {
        return Err(ApiError::InvalidData);
    };

    let task = ctx.storage.update_task(task.id, &title, &description).await?;
    Ok(Json(json!({ "task": task_body(&task) })))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = load_task(&ctx.storage, &id).await?;
    ctx.storage.delete_task(task.id).await?;

    Ok(Json(json!({
        "details": format!("Task {} \"{}\" successfully deleted", task.id, task.title)
    })))
}

pub async fn mark_complete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = load_task(&ctx.storage, &id).await?;

    // Repeating refreshes the timestamp; the task simply stays complete.
    let now = Utc::now().to_rfc3339();
    let task = ctx
        .storage
        .set_task_completed_at(task.id, Some(&now))
        .await?;

    // After the commit, so a dead webhook endpoint cannot undo or block it.
    ctx.notifier.task_completed(&task.title);

    Ok(Json(json!({ "task": task_body(&task) })))
}

pub async fn mark_incomplete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = load_task(&ctx.storage, &id).await?;
    let task = ctx.storage.set_task_completed_at(task.id, None).await?;
    Ok(Json(json!({ "task": task_body(&task) })))
}
