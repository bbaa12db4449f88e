use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Budget, ClientId, Project, ProjectId},
    CrmError,
};

#[derive(FromRow)]
pub struct ProjectRow {
    id: String,
    client_id: String,
    name: String,
    description: Option<String>,
    status: String,
    start_date: Option<Date>,
    end_date: Option<Date>,
    budget_amount: Option<f64>,
    budget_currency: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Project {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "name",
        "description",
        "status",
        "start_date",
        "end_date",
        "budget_amount",
        "budget_currency",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("client_id");

    type Row = ProjectRow;

    fn from_row(row: ProjectRow) -> Result<Self, CrmError> {
        // The schema's CHECK keeps both budget columns set or both null.
        let budget = match (row.budget_amount, row.budget_currency) {
            (Some(amount), Some(currency)) => Some(Budget { amount, currency }),
            _ => None,
        };

        Ok(Project {
            id: ProjectId::from(row.id),
            client_id: ClientId::from(row.client_id),
            name: row.name,
            description: row.description,
            status: parse_column("status", &row.status)?,
            start_date: row.start_date,
            end_date: row.end_date,
            budget,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.client_id.as_str())
            .bind(self.name.as_str())
            .bind(self.description.as_deref())
            .bind(self.status.to_string())
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.budget.as_ref().map(|b| b.amount))
            .bind(self.budget.as_ref().map(|b| b.currency.as_str()))
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
