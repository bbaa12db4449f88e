use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::records;
use crate::{
    app_state::AppState,
    domain::{
        models::{Lead, LeadId},
        services::ConvertedLead,
    },
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    records::crud_router::<Lead>().route("/:id/convert", post(convert_lead))
}

#[instrument(name = "POST /leads/:id/convert", skip(app_state))]
async fn convert_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConvertedLead>, ApiError> {
    let converted = app_state
        .lead_conversion()
        .convert(&LeadId::from(id))
        .await?;
    Ok(Json(converted))
}
