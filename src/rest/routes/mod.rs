pub mod goals;
pub mod health;
pub mod tasks;

use crate::rest::error::ApiError;
use crate::storage::{GoalRow, Storage, TaskRow};

// Every single-entity operation goes through one of these before any further
// logic runs: parse the raw path segment as an integer id (400 on failure),
// then resolve it to a row (404 on a miss).

pub(crate) async fn load_task(storage: &Storage, raw: &str) -> Result<TaskRow, ApiError> {
    let id: i64 = raw.parse().map_err(|_| ApiError::InvalidId {
        kind: "Task",
        raw: raw.to_string(),
    })?;
    storage
        .get_task(id)
        .await?
        .ok_or(ApiError::NotFound { kind: "Task", id })
}

pub(crate) async fn load_goal(storage: &Storage, raw: &str) -> Result<GoalRow, ApiError> {
    let id: i64 = raw.parse().map_err(|_| ApiError::InvalidId {
        kind: "Goal",
        raw: raw.to_string(),
    })?;
    storage
        .get_goal(id)
        .await?
        .ok_or(ApiError::NotFound { kind: "Goal", id })
}
