use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dashboard::TodayQuery, records};
use crate::{
    app_state::AppState,
    domain::{
        dashboard::ProjectOverview,
        kanban::KanbanBoard,
        models::{Deliverable, Goal, Milestone, Project, ProjectId, Task},
    },
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    records::crud_router::<Project>()
        .route("/:id/tasks", records::children::<Task>())
        .route("/:id/milestones", records::children::<Milestone>())
        .route("/:id/goals", records::children::<Goal>())
        .route("/:id/deliverables", records::children::<Deliverable>())
        .route("/:id/board", get(project_board))
        .route("/:id/overview", get(project_overview))
}

#[instrument(name = "GET /projects/:id/board", skip(app_state))]
async fn project_board(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<KanbanBoard>, ApiError> {
    let board = app_state.kanban.board(&ProjectId::from(id)).await?;
    Ok(Json(board))
}

#[instrument(name = "GET /projects/:id/overview", skip(app_state))]
async fn project_overview(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<ProjectOverview>, ApiError> {
    let overview = app_state
        .dashboard
        .project_overview(&ProjectId::from(id), query.today())
        .await?;
    Ok(Json(overview))
}
