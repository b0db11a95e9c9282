// rest/mod.rs — Public REST API server.
//
// Axum HTTP server (local only unless bound to 0.0.0.0).
//
// Endpoints:
//   POST   /tasks
//   GET    /tasks?sort=asc|desc
//   GET    /tasks/{id}
//   PUT    /tasks/{id}
//   DELETE /tasks/{id}
//   PATCH  /tasks/{id}/mark_complete
//   PATCH  /tasks/{id}/mark_incomplete
//   POST   /goals
//   GET    /goals
//   GET    /goals/{id}
//   PUT    /goals/{id}
//   DELETE /goals/{id}
//   POST   /goals/{id}/tasks
//   GET    /goals/{id}/tasks
//   GET    /health

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, patch},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Tasks
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(routes::tasks::read_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/tasks/{id}/mark_complete",
            patch(routes::tasks::mark_complete),
        )
        .route(
            "/tasks/{id}/mark_incomplete",
            patch(routes::tasks::mark_incomplete),
        )
        // Goals
        .route(
            "/goals",
            get(routes::goals::list_goals).post(routes::goals::create_goal),
        )
        .route(
            "/goals/{id}",
            get(routes::goals::read_goal)
                .put(routes::goals::update_goal)
                .delete(routes::goals::delete_goal),
        )
        .route(
            "/goals/{id}/tasks",
            get(routes::goals::list_goal_tasks).post(routes::goals::attach_tasks),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
