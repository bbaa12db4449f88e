use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tracing::instrument;

use crate::{app_state::AppState, domain::dashboard::UpcomingItem, routes::ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/upcoming", get(upcoming))
}

/// `?today=YYYY-MM-DD`, defaulting to the current UTC date.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayQuery {
    today: Option<Date>,
}

impl TodayQuery {
    pub(crate) fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }
}

#[instrument(name = "GET /dashboard/upcoming", skip(app_state))]
async fn upcoming(
    State(app_state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<Vec<UpcomingItem>>, ApiError> {
    let items = app_state.dashboard.upcoming(query.today()).await?;
    Ok(Json(items))
}
