use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::records;
use crate::{
    app_state::AppState,
    domain::models::{Goal, GoalId, GoalProgress},
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    records::crud_router::<Goal>().route("/:id/progress", get(goal_progress))
}

#[instrument(name = "GET /goals/:id/progress", skip(app_state))]
async fn goal_progress(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalProgress>, ApiError> {
    let goal = app_state.records::<Goal>().require(&GoalId::from(id)).await?;
    Ok(Json(goal.progress()))
}
