//! Generic JSON handlers shared by every record collection.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::{
        models::{Editable, Record},
        repositories::{Repositories, StoreFor},
    },
    routes::ApiError,
};

/// `GET/POST /` and `GET/PATCH/DELETE /:id`.
pub(crate) fn crud_router<E>() -> Router<AppState>
where
    E: Editable,
    Repositories: StoreFor<E>,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route(
            "/:id",
            get(get_one::<E>).patch(update::<E>).delete(delete_one::<E>),
        )
}

/// `GET/POST /` and `GET /:id`, for records that never change after creation.
pub(crate) fn append_only_router<E>() -> Router<AppState>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route("/:id", get(get_one::<E>))
}

#[instrument(name = "list", skip_all, fields(collection = E::COLLECTION))]
pub(crate) async fn list<E>(
    State(app_state): State<AppState>,
    Query(filter): Query<E::Filter>,
) -> Result<Json<Vec<E>>, ApiError>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    let records = app_state.records::<E>().list(&filter).await?;
    Ok(Json(records))
}

#[instrument(name = "list by parent", skip(app_state), fields(collection = E::COLLECTION))]
pub(crate) async fn list_children<E>(
    State(app_state): State<AppState>,
    Path(parent_id): Path<String>,
) -> Result<Json<Vec<E>>, ApiError>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    let records = app_state.records::<E>().list_by_parent(&parent_id).await?;
    Ok(Json(records))
}

#[instrument(name = "get", skip(app_state), fields(collection = E::COLLECTION))]
pub(crate) async fn get_one<E>(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, ApiError>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    let record = app_state.records::<E>().require(&E::Id::from(id)).await?;
    Ok(Json(record))
}

#[instrument(name = "create", skip_all, fields(collection = E::COLLECTION))]
pub(crate) async fn create<E>(
    State(app_state): State<AppState>,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<E>), ApiError>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    let record = app_state.records::<E>().create(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(name = "update", skip(app_state, patch), fields(collection = E::COLLECTION))]
pub(crate) async fn update<E>(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<E>, ApiError>
where
    E: Editable,
    Repositories: StoreFor<E>,
{
    let record = app_state
        .records::<E>()
        .update(&E::Id::from(id), patch)
        .await?;
    Ok(Json(record))
}

#[instrument(name = "delete", skip(app_state), fields(collection = E::COLLECTION))]
pub(crate) async fn delete_one<E>(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    E: Editable,
    Repositories: StoreFor<E>,
{
    app_state.records::<E>().delete(&E::Id::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shorthand for the owner-scoped list routes, e.g. `/projects/:id/tasks`.
pub(crate) fn children<E>() -> axum::routing::MethodRouter<AppState>
where
    E: Record,
    Repositories: StoreFor<E>,
{
    get(list_children::<E>)
}
