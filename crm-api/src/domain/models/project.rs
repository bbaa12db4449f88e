use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{entity::filter_eq, money::check_money, ClientId, Editable, Entity, ProjectId, Record};
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
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

/// A budget in an explicit currency. No conversion happens anywhere in the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub amount: f64,
    /// ISO-4217 code, e.g. "SEK".
    pub currency: String,
}

impl Budget {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    fn validate(&self) -> Result<(), CrmError> {
        check_money("budget", self.amount, &self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub client_id: ClientId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget: Option<Budget>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Project {
    fn validate(&self) -> Result<(), CrmError> {
        require_text("name", &self.name)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(CrmError::validation("end date must not precede start date"));
            }
        }
        if let Some(budget) = &self.budget {
            budget.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub client_id: ClientId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget: Option<Budget>,
}

impl ProjectDraft {
    pub fn new(client_id: impl Into<ClientId>, name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            start_date: None,
            end_date: None,
            budget: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<Date>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub budget: Option<Option<Budget>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<ProjectStatus>,
}

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Project {
    type Draft = ProjectDraft;
    type Filter = ProjectFilter;

    fn from_draft(id: ProjectId, draft: ProjectDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        let project = Self {
            id,
            client_id: draft.client_id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            budget: draft.budget,
            created_at: now,
            updated_at: now,
        };
        project.validate()?;
        Ok(project)
    }

    fn matches(&self, filter: &ProjectFilter) -> bool {
        filter_eq(&filter.client_id, &self.client_id) && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Project {
    type Patch = ProjectPatch;

    fn apply_patch(&mut self, patch: ProjectPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        self.validate()?;
        self.updated_at = now;
        Ok(())
    }
}
