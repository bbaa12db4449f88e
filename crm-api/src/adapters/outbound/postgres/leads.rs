use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{ClientId, Lead, LeadId},
    CrmError,
};

#[derive(FromRow)]
pub struct LeadRow {
    id: String,
    name: String,
    email: String,
    company: Option<String>,
    phone: Option<String>,
    source: Option<String>,
    message: Option<String>,
    status: String,
    converted_client_id: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Lead {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "company",
        "phone",
        "source",
        "message",
        "status",
        "converted_client_id",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = None;

    type Row = LeadRow;

    fn from_row(row: LeadRow) -> Result<Self, CrmError> {
        Ok(Lead {
            id: LeadId::from(row.id),
            name: row.name,
            email: row.email,
            company: row.company,
            phone: row.phone,
            source: row.source,
            message: row.message,
            status: parse_column("status", &row.status)?,
            converted_client_id: row.converted_client_id.map(ClientId::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.name.as_str())
            .bind(self.email.as_str())
            .bind(self.company.as_deref())
            .bind(self.phone.as_deref())
            .bind(self.source.as_deref())
            .bind(self.message.as_deref())
            .bind(self.status.to_string())
            .bind(self.converted_client_id.as_ref().map(ClientId::as_str))
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
