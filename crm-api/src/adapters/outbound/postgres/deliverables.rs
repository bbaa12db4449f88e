use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Deliverable, DeliverableId, ProjectId},
    CrmError,
};

#[derive(FromRow)]
pub struct DeliverableRow {
    id: String,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    due_date: Option<Date>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Deliverable {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "description",
        "status",
        "due_date",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("project_id");

    type Row = DeliverableRow;

    fn from_row(row: DeliverableRow) -> Result<Self, CrmError> {
        Ok(Deliverable {
            id: DeliverableId::from(row.id),
            project_id: ProjectId::from(row.project_id),
            title: row.title,
            description: row.description,
            status: parse_column("status", &row.status)?,
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
            .bind(self.due_date)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
