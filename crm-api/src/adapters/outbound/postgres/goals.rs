use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Goal, GoalId, ProjectId},
    CrmError,
};

#[derive(FromRow)]
pub struct GoalRow {
    id: String,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    current_value: f64,
    target_value: f64,
    unit: Option<String>,
    target_date: Option<Date>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Goal {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "description",
        "status",
        "current_value",
        "target_value",
        "unit",
        "target_date",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("project_id");

    type Row = GoalRow;

    fn from_row(row: GoalRow) -> Result<Self, CrmError> {
        Ok(Goal {
            id: GoalId::from(row.id),
            project_id: ProjectId::from(row.project_id),
            title: row.title,
            description: row.description,
            status: parse_column("status", &row.status)?,
            current_value: row.current_value,
            target_value: row.target_value,
            unit: row.unit,
            target_date: row.target_date,
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
            .bind(self.current_value)
            .bind(self.target_value)
            .bind(self.unit.as_deref())
            .bind(self.target_date)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
