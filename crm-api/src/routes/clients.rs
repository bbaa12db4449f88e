use axum::Router;

use super::records;
use crate::{
    app_state::AppState,
    domain::models::{Agreement, Client, ClientCommunication, Project, Subscription, SupportTicket},
};

pub fn router() -> Router<AppState> {
    records::crud_router::<Client>()
        .route("/:id/projects", records::children::<Project>())
        .route("/:id/communications", records::children::<ClientCommunication>())
        .route("/:id/tickets", records::children::<SupportTicket>())
        .route("/:id/subscriptions", records::children::<Subscription>())
        .route("/:id/agreements", records::children::<Agreement>())
}
