use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use super::{parse_column, PgQuery, TableMapping};
use crate::domain::{
    models::{ClientId, Subscription, SubscriptionId},
    CrmError,
};

#[derive(FromRow)]
pub struct SubscriptionRow {
    id: String,
    client_id: String,
    plan: String,
    status: String,
    amount: f64,
    currency: String,
    billing_interval: String,
    start_date: Date,
    end_date: Option<Date>,
    cancelled_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TableMapping for Subscription {
    // `interval` is a reserved word in SQL.
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "plan",
        "status",
        "amount",
        "currency",
        "billing_interval",
        "start_date",
        "end_date",
        "cancelled_at",
        "created_at",
        "updated_at",
    ];
    const PARENT_COLUMN: Option<&'static str> = Some("client_id");

    type Row = SubscriptionRow;

    fn from_row(row: SubscriptionRow) -> Result<Self, CrmError> {
        Ok(Subscription {
            id: SubscriptionId::from(row.id),
            client_id: ClientId::from(row.client_id),
            plan: row.plan,
            status: parse_column("status", &row.status)?,
            amount: row.amount,
            currency: row.currency,
            interval: parse_column("billing_interval", &row.billing_interval)?,
            start_date: row.start_date,
            end_date: row.end_date,
            cancelled_at: row.cancelled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id.as_str())
            .bind(self.client_id.as_str())
            .bind(self.plan.as_str())
            .bind(self.status.to_string())
            .bind(self.amount)
            .bind(self.currency.as_str())
            .bind(self.interval.to_string())
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.cancelled_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
