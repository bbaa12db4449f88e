use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::records;
use crate::{
    app_state::AppState,
    domain::{
        kanban::DropTarget,
        models::{Task, TaskDraft, TaskId, TaskStatus},
    },
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(records::list::<Task>).post(create_task))
        .route(
            "/:id",
            get(records::get_one::<Task>)
                .patch(records::update::<Task>)
                .delete(records::delete_one::<Task>),
        )
        .route("/:id/position", put(reorder_task))
        .route("/:id/move", post(move_task))
}

#[instrument(name = "POST /tasks", skip_all)]
async fn create_task(
    State(app_state): State<AppState>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = app_state.kanban.create_task(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody {
    status: TaskStatus,
    position: i32,
}

#[instrument(name = "PUT /tasks/:id/position", skip(app_state))]
async fn reorder_task(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Task>, ApiError> {
    let task = app_state
        .kanban
        .reorder(&TaskId::from(id), body.status, body.position)
        .await?;
    Ok(Json(task))
}

#[instrument(name = "POST /tasks/:id/move", skip(app_state))]
async fn move_task(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(target): Json<DropTarget>,
) -> Result<Json<Task>, ApiError> {
    let task = app_state.kanban.move_task(&TaskId::from(id), &target).await?;
    Ok(Json(task))
}
