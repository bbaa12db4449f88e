use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{
    entity::{filter_eq, filter_eq_opt},
    ClientId, CommunicationId, Entity, ProjectId, Record,
};
use crate::domain::{error::require_text, CrmError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommunicationType {
    Email,
    Call,
    Note,
    Message,
    Meeting,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
    Internal,
}

/// An entry in a client's communication log. Entries are never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCommunication {
    pub id: CommunicationId,
    pub client_id: ClientId,
    pub project_id: Option<ProjectId>,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub direction: Direction,
    pub subject: Option<String>,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationDraft {
    pub client_id: ClientId,
    pub project_id: Option<ProjectId>,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub direction: Direction,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationFilter {
    pub client_id: Option<ClientId>,
    pub project_id: Option<ProjectId>,
    #[serde(rename = "type")]
    pub kind: Option<CommunicationType>,
    pub direction: Option<Direction>,
}

impl Entity for ClientCommunication {
    const COLLECTION: &'static str = "communications";
    type Id = CommunicationId;

    fn id(&self) -> &CommunicationId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for ClientCommunication {
    type Draft = CommunicationDraft;
    type Filter = CommunicationFilter;

    fn from_draft(
        id: CommunicationId,
        draft: CommunicationDraft,
        now: OffsetDateTime,
    ) -> Result<Self, CrmError> {
        require_text("body", &draft.body)?;
        Ok(Self {
            id,
            client_id: draft.client_id,
            project_id: draft.project_id,
            kind: draft.kind,
            direction: draft.direction,
            subject: draft.subject,
            body: draft.body,
            created_at: now,
        })
    }

    fn matches(&self, filter: &CommunicationFilter) -> bool {
        filter_eq(&filter.client_id, &self.client_id)
            && filter_eq_opt(&filter.project_id, self.project_id.as_ref())
            && filter_eq(&filter.kind, &self.kind)
            && filter_eq(&filter.direction, &self.direction)
    }
}
