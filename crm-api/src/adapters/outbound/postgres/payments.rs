use sqlx::FromRow;
use time::OffsetDateTime;

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{Payment, PaymentId, SubscriptionId},
    CrmError,
};

#[derive(FromRow)]
pub struct PaymentRow {
    id: String,
    subscription_id: String,
    amount: f64,
    currency: String,
    status: String,
    method: Option<String>,
    reference: Option<String>,
    paid_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Payment {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "subscription_id",
        "amount",
        "currency",
        "status",
        "method",
        "reference",
        "paid_at",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("subscription_id");

    type Row = PaymentRow;

    fn from_row(row: PaymentRow) -> Result<Self, CrmError> {
        Ok(Payment {
            id: PaymentId::from(row.id),
            subscription_id: SubscriptionId::from(row.subscription_id),
            amount: row.amount,
            currency: row.currency,
            status: parse_column("status", &row.status)?,
            method: row.method,
            reference: row.reference,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.subscription_id.as_str())
            .bind(self.amount)
            .bind(self.currency.as_str())
            .bind(self.status.to_string())
            .bind(self.method.as_deref())
            .bind(self.reference.as_deref())
            .bind(self.paid_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
