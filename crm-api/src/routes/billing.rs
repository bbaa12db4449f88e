use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use super::records;
use crate::{
    app_state::AppState,
    domain::{
        models::{Payment, Subscription},
        services::{Signup, SignupRequest},
    },
    routes::ApiError,
};

pub fn subscriptions() -> Router<AppState> {
    records::crud_router::<Subscription>().route("/:id/payments", records::children::<Payment>())
}

/// `POST /signups` records a subscription together with its first payment and agreements.
pub fn signups() -> Router<AppState> {
    Router::new().route("/", post(sign_up))
}

#[instrument(name = "POST /signups", skip(app_state))]
async fn sign_up(
    State(app_state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Signup>), ApiError> {
    let signup = app_state.billing().sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(signup)))
}
