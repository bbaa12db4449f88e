use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{entity::filter_eq, Editable, Entity, MilestoneId, ProjectId, Record};
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
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MilestoneStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: MilestoneId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: MilestoneStatus,
    pub target_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: MilestoneStatus,
    pub target_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePatch {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<MilestoneStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub target_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<MilestoneStatus>,
}

impl Entity for Milestone {
    const COLLECTION: &'static str = "milestones";
    type Id = MilestoneId;

    fn id(&self) -> &MilestoneId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.project_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Milestone {
    type Draft = MilestoneDraft;
    type Filter = MilestoneFilter;

    fn from_draft(
        id: MilestoneId,
        draft: MilestoneDraft,
        now: OffsetDateTime,
    ) -> Result<Self, CrmError> {
        require_text("title", &draft.title)?;
        Ok(Self {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            target_date: draft.target_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &MilestoneFilter) -> bool {
        filter_eq(&filter.project_id, &self.project_id) && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Milestone {
    type Patch = MilestonePatch;

    fn apply_patch(&mut self, patch: MilestonePatch, now: OffsetDateTime) -> Result<(), CrmError> {
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
        if let Some(target_date) = patch.target_date {
            self.target_date = target_date;
        }
        self.updated_at = now;
        Ok(())
    }
}
