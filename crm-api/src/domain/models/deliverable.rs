use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{entity::filter_eq, DeliverableId, Editable, Entity, ProjectId, Record};
use crate::domain::{error::require_text, CrmError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliverableStatus {
    #[default]
    Pending,
    InProgress,
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: DeliverableId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: DeliverableStatus,
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: DeliverableStatus,
    pub due_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverablePatch {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<DeliverableStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub due_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<DeliverableStatus>,
}

impl Entity for Deliverable {
    const COLLECTION: &'static str = "deliverables";
    type Id = DeliverableId;

    fn id(&self) -> &DeliverableId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.project_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Deliverable {
    type Draft = DeliverableDraft;
    type Filter = DeliverableFilter;

    fn from_draft(
        id: DeliverableId,
        draft: DeliverableDraft,
        now: OffsetDateTime,
    ) -> Result<Self, CrmError> {
        require_text("title", &draft.title)?;
        Ok(Self {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &DeliverableFilter) -> bool {
        filter_eq(&filter.project_id, &self.project_id) && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Deliverable {
    type Patch = DeliverablePatch;

    fn apply_patch(&mut self, patch: DeliverablePatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(title) = patch.title {
            require_text("title", &title)?;
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.updated_at = now;
        Ok(())
    }
}
