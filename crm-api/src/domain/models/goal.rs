use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{entity::filter_eq, Editable, Entity, GoalId, ProjectId, Record};
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
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Achieved,
    Abandoned,
}

/// A measurable project objective, e.g. "automate 10 workflows".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: GoalStatus,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: Option<String>,
    pub target_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Goal {
    /// Completion in whole percent, clamped to `0..=100`.
    ///
    /// A goal without a positive target has made no measurable progress.
    pub fn progress_percentage(&self) -> u8 {
        if self.target_value <= 0.0 || !self.target_value.is_finite() {
            return 0;
        }
        let ratio = (self.current_value / self.target_value * 100.0).round();
        ratio.clamp(0.0, 100.0) as u8
    }

    pub fn progress(&self) -> GoalProgress {
        GoalProgress {
            goal_id: self.id.clone(),
            title: self.title.clone(),
            current_value: self.current_value,
            target_value: self.target_value,
            percentage: self.progress_percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub title: String,
    pub current_value: f64,
    pub target_value: f64,
    pub percentage: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub current_value: f64,
    pub target_value: f64,
    pub unit: Option<String>,
    pub target_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<GoalStatus>,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub unit: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub target_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<GoalStatus>,
}

fn check_values(current: f64, target: f64) -> Result<(), CrmError> {
    if !current.is_finite() || !target.is_finite() {
        return Err(CrmError::validation("goal values must be finite numbers"));
    }
    Ok(())
}

impl Entity for Goal {
    const COLLECTION: &'static str = "goals";
    type Id = GoalId;

    fn id(&self) -> &GoalId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.project_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Goal {
    type Draft = GoalDraft;
    type Filter = GoalFilter;

    fn from_draft(id: GoalId, draft: GoalDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("title", &draft.title)?;
        check_values(draft.current_value, draft.target_value)?;
        Ok(Self {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            current_value: draft.current_value,
            target_value: draft.target_value,
            unit: draft.unit,
            target_date: draft.target_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &GoalFilter) -> bool {
        filter_eq(&filter.project_id, &self.project_id) && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Goal {
    type Patch = GoalPatch;

    fn apply_patch(&mut self, patch: GoalPatch, now: OffsetDateTime) -> Result<(), CrmError> {
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
        if let Some(current_value) = patch.current_value {
            self.current_value = current_value;
        }
        if let Some(target_value) = patch.target_value {
            self.target_value = target_value;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(target_date) = patch.target_date {
            self.target_date = target_date;
        }
        check_values(self.current_value, self.target_value)?;
        self.updated_at = now;
        Ok(())
    }
}
