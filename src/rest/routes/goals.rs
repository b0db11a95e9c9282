// rest/routes/goals.rs — Goal resource routes, including the nested
// one(Goal)-to-many(Task) relationship endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::rest::error::ApiError;
use crate::storage::GoalRow;
use crate::AppContext;

use super::load_goal;
use super::tasks::task_body;

fn goal_body(goal: &GoalRow) -> Value {
    json!({
        "id": goal.id,
        "title": goal.title,
    })
}

#[derive(Deserialize)]
pub struct CreateGoalRequest {
    pub title: Option<String>,
}

pub async fn create_goal(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Some(title) = body.title else {
        return Err(ApiError::InvalidData);
    };

    let goal = ctx.storage.create_goal(&title).await?;
    Ok((StatusCode::CREATED, Json(json!({ "goal": goal_body(&goal) }))))
}

pub async fn list_goals(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let goals = ctx.storage.list_goals().await?;
    let list: Vec<Value> = goals.iter().map(goal_body).collect();
    Ok(Json(json!(list)))
}

pub async fn read_goal(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let goal = load_goal(&ctx.storage, &id).await?;
    Ok(Json(json!({ "goal": goal_body(&goal) })))
}

#[derive(Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
}

pub async fn update_goal(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateGoalRequest>,
) -> Result<Json<Value>, ApiError> {
    let goal = load_goal(&ctx.storage, &id).await?;

    let Some(title) = body.title else {
        return Err(ApiError::InvalidData);
    };

    let goal = ctx.storage.update_goal(goal.id, &title).await?;
    Ok(Json(json!({ "goal": goal_body(&goal) })))
}

pub async fn delete_goal(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let goal = load_goal(&ctx.storage, &id).await?;
    ctx.storage.delete_goal(goal.id).await?;

    Ok(Json(json!({
        "details": format!("Goal {} \"{}\" successfully deleted", goal.id, goal.title)
    })))
}

#[derive(Deserialize)]
pub struct AttachTasksRequest {
    pub task_ids: Option<Vec<i64>>,
}

/// Attach a batch of tasks to a goal, in payload order. Each attachment
/// commits individually: an unknown id aborts the request at that point and
/// earlier attachments stay committed.
pub async fn attach_tasks(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<AttachTasksRequest>,
) -> Result<Json<Value>, ApiError> {
    let goal = load_goal(&ctx.storage, &id).await?;

    let task_ids = body.task_ids.ok_or(ApiError::InvalidData)?;

    for task_id in &task_ids {
        let task = ctx
            .storage
            .get_task(*task_id)
            .await?
            .ok_or(ApiError::NotFound {
                kind: "Task",
                id: *task_id,
            })?;
        ctx.storage.attach_task_to_goal(task.id, goal.id).await?;
    }

    // The input list echoed back, not a re-fetch.
    Ok(Json(json!({ "id": goal.id, "task_ids": task_ids })))
}

pub async fn list_goal_tasks(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let goal = load_goal(&ctx.storage, &id).await?;
    let tasks = ctx.storage.tasks_for_goal(goal.id).await?;
    let list: Vec<Value> = tasks.iter().map(task_body).collect();

    Ok(Json(json!({
        "id": goal.id,
        "title": goal.title,
        "tasks": list,
    })))
}
