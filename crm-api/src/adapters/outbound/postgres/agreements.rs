use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Agreement, AgreementId, ClientId, SubscriptionId},
    CrmError,
};

#[derive(FromRow)]
pub struct AgreementRow {
    id: String,
    client_id: String,
    subscription_id: Option<String>,
    document: String,
    version: String,
    status: String,
    signer_name: Option<String>,
    signer_email: Option<String>,
    accepted_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Agreement {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "subscription_id",
        "document",
        "version",
        "status",
        "signer_name",
        "signer_email",
        "accepted_at",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("client_id");

    type Row = AgreementRow;

    fn from_row(row: AgreementRow) -> Result<Self, CrmError> {
        Ok(Agreement {
            id: AgreementId::from(row.id),
            client_id: ClientId::from(row.client_id),
            subscription_id: row.subscription_id.map(SubscriptionId::from),
            document: parse_column("document", &row.document)?,
            version: row.version,
            status: parse_column("status", &row.status)?,
            signer_name: row.signer_name,
            signer_email: row.signer_email,
            accepted_at: row.accepted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.client_id.as_str())
            .bind(self.subscription_id.as_ref().map(SubscriptionId::as_str))
            .bind(self.document.to_string())
            .bind(self.version.as_str())
            .bind(self.status.to_string())
            .bind(self.signer_name.as_deref())
            .bind(self.signer_email.as_deref())
            .bind(self.accepted_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
