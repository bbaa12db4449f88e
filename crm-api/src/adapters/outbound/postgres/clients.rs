use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Client, ClientId},
    CrmError,
};

#[derive(FromRow)]
pub struct ClientRow {
    id: String,
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Client {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "company",
        "email",
        "phone",
        "status",
        "notes",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = None;

    type Row = ClientRow;

    fn from_row(row: ClientRow) -> Result<Self, CrmError> {
        Ok(Client {
            id: ClientId::from(row.id),
            name: row.name,
            company: row.company,
            email: row.email,
            phone: row.phone,
            status: parse_column("status", &row.status)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.name.as_str())
            .bind(self.company.as_deref())
            .bind(self.email.as_deref())
            .bind(self.phone.as_deref())
            .bind(self.status.to_string())
            .bind(self.notes.as_deref())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
