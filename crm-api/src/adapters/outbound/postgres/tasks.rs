use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{ProjectId, Task, TaskId, UserId},
    CrmError,
};

#[derive(FromRow)]
pub struct TaskRow {
    id: String,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    position: i32,
    assignee_id: Option<String>,
    parent_task_id: Option<String>,
    due_date: Option<Date>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Task {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "description",
        "status",
        "priority",
        "position",
        "assignee_id",
        "parent_task_id",
        "due_date",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("project_id");

    type Row = TaskRow;

    fn from_row(row: TaskRow) -> Result<Self, CrmError> {
        Ok(Task {
            id: TaskId::from(row.id),
            project_id: ProjectId::from(row.project_id),
            title: row.title,
            description: row.description,
            status: parse_column("status", &row.status)?,
            priority: parse_column("priority", &row.priority)?,
            position: row.position,
            assignee_id: row.assignee_id.map(UserId::from),
            parent_task_id: row.parent_task_id.map(TaskId::from),
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.project_id.as_str())
            .bind(self.title.as_str())
            .bind(self.description.as_deref())
            .bind(self.status.to_string())
            .bind(self.priority.to_string())
            .bind(self.position)
            .bind(self.assignee_id.as_ref().map(UserId::as_str))
            .bind(self.parent_task_id.as_ref().map(TaskId::as_str))
            .bind(self.due_date)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
