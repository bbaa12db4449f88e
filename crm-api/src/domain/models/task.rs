use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{
    entity::{filter_eq, filter_eq_opt},
    Editable, Entity, Priority, ProjectId, Record, TaskId, UserId,
};
use crate::domain::{error::require_text, CrmError};

/// Kanban stages, in board order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A unit of work inside a project, ranked within its status column by `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub position: i32,
    pub assignee_id: Option<UserId>,
    pub parent_task_id: Option<TaskId>,
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// Whether the task is still open and its due date lies before `today`.
    pub fn is_overdue(&self, today: Date) -> bool {
        !self.status.is_terminal() && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    /// Left empty to append to the end of the status column.
    pub position: Option<i32>,
    pub assignee_id: Option<UserId>,
    pub parent_task_id: Option<TaskId>,
    pub due_date: Option<Date>,
}

impl TaskDraft {
    pub fn new(project_id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            position: None,
            assignee_id: None,
            parent_task_id: None,
            due_date: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_due_date(mut self, due_date: Date) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub position: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub assignee_id: Option<Option<UserId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_task_id: Option<Option<TaskId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub due_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<UserId>,
    pub parent_task_id: Option<TaskId>,
}

fn check_position(position: i32) -> Result<(), CrmError> {
    if position < 0 {
        return Err(CrmError::validation("position must not be negative"));
    }
    Ok(())
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.project_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Task {
    type Draft = TaskDraft;
    type Filter = TaskFilter;

    fn from_draft(id: TaskId, draft: TaskDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("title", &draft.title)?;
        let position = draft.position.unwrap_or(0);
        check_position(position)?;

        Ok(Self {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            position,
            assignee_id: draft.assignee_id,
            parent_task_id: draft.parent_task_id,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &TaskFilter) -> bool {
        filter_eq(&filter.project_id, &self.project_id)
            && filter_eq(&filter.status, &self.status)
            && filter_eq(&filter.priority, &self.priority)
            && filter_eq_opt(&filter.assignee_id, self.assignee_id.as_ref())
            && filter_eq_opt(&filter.parent_task_id, self.parent_task_id.as_ref())
    }
}

impl Editable for Task {
    type Patch = TaskPatch;

    fn apply_patch(&mut self, patch: TaskPatch, now: OffsetDateTime) -> Result<(), CrmError> {
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
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(position) = patch.position {
            check_position(position)?;
            self.position = position;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(parent_task_id) = patch.parent_task_id {
            if parent_task_id.as_ref() == Some(&self.id) {
                return Err(CrmError::validation("a task cannot be its own parent"));
            }
            self.parent_task_id = parent_task_id;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn task() -> Task {
        let draft = TaskDraft::new("p1", "Write proposal").with_due_date(date!(2026 - 03 - 01));
        Task::from_draft(TaskId::new("t1"), draft, datetime!(2026-01-01 09:00 UTC)).unwrap()
    }

    #[test]
    fn draft_defaults_to_todo_at_position_zero() {
        let task = task();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.position, 0);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn blank_title_is_rejected() {
        let draft = TaskDraft::new("p1", "   ");
        let result = Task::from_draft(TaskId::new("t1"), draft, OffsetDateTime::UNIX_EPOCH);
        assert!(matches!(result, Err(CrmError::Validation(_))));
    }

    #[test]
    fn patch_clears_nullable_fields_and_keeps_the_rest() {
        let mut task = task();
        let patch: TaskPatch =
            serde_json::from_value(serde_json::json!({ "dueDate": null, "priority": "urgent" }))
                .unwrap();
        let later = datetime!(2026-01-02 09:00 UTC);

        task.apply_patch(patch, later).unwrap();

        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.title, "Write proposal");
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn task_cannot_parent_itself() {
        let mut task = task();
        let patch = TaskPatch {
            parent_task_id: Some(Some(TaskId::new("t1"))),
            ..Default::default()
        };
        assert!(task.apply_patch(patch, OffsetDateTime::UNIX_EPOCH).is_err());
    }

    #[test]
    fn overdue_ignores_done_tasks() {
        let mut task = task();
        assert!(task.is_overdue(date!(2026 - 03 - 02)));
        assert!(!task.is_overdue(date!(2026 - 03 - 01)));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(date!(2026 - 03 - 02)));
    }

    #[test]
    fn statuses_serialize_in_snake_case() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
    }
}
