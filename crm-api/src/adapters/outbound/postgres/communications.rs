use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{ClientCommunication, ClientId, CommunicationId, ProjectId},
    CrmError,
};

/// `kind` is stored in a column named `type`, like the JSON field.
#[derive(FromRow)]
pub struct CommunicationRow {
    id: String,
    client_id: String,
    project_id: Option<String>,
    #[sqlx(rename = "type")]
    kind: String,
    direction: String,
    subject: Option<String>,
    body: String,
    created_at: OffsetDateTime,
}

impl TableMapping for ClientCommunication {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "project_id",
        "type",
        "direction",
        "subject",
        "body",
        "created_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("client_id");

    type Row = CommunicationRow;

    fn from_row(row: CommunicationRow) -> Result<Self, CrmError> {
        Ok(ClientCommunication {
            id: CommunicationId::from(row.id),
            client_id: ClientId::from(row.client_id),
            project_id: row.project_id.map(ProjectId::from),
            kind: parse_column("type", &row.kind)?,
            direction: parse_column("direction", &row.direction)?,
            subject: row.subject,
            body: row.body,
            created_at: row.created_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.client_id.as_str())
            .bind(self.project_id.as_ref().map(ProjectId::as_str))
            .bind(self.kind.to_string())
            .bind(self.direction.to_string())
            .bind(self.subject.as_deref())
            .bind(self.body.as_str())
            .bind(self.created_at)
    }
}
