use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{ClientId, ProjectId, SupportTicket, TicketId},
    CrmError,
};

#[derive(FromRow)]
pub struct TicketRow {
    id: String,
    client_id: String,
    project_id: Option<String>,
    subject: String,
    description: String,
    status: String,
    priority: String,
    resolved_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for SupportTicket {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "project_id",
        "subject",
        "description",
        "status",
        "priority",
        "resolved_at",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("client_id");

    type Row = TicketRow;

    fn from_row(row: TicketRow) -> Result<Self, CrmError> {
        Ok(SupportTicket {
            id: TicketId::from(row.id),
            client_id: ClientId::from(row.client_id),
            project_id: row.project_id.map(ProjectId::from),
            subject: row.subject,
            description: row.description,
            status: parse_column("status", &row.status)?,
            priority: parse_column("priority", &row.priority)?,
            resolved_at: row.resolved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.client_id.as_str())
            .bind(self.project_id.as_ref().map(ProjectId::as_str))
            .bind(self.subject.as_str())
            .bind(self.description.as_str())
            .bind(self.status.to_string())
            .bind(self.priority.to_string())
            .bind(self.resolved_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
