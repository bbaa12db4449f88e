//! PostgreSQL implementation of the EntityStore port.
//!
//! Each entity maps onto one table (named after its collection) through
//! [`TableMapping`]. Cascades on delete are enforced by the schema's foreign
//! keys, see `migrations/`.

mod agreements;
mod clients;
mod communications;
mod deliverables;
mod goals;
mod leads;
mod milestones;
mod payments;
mod projects;
mod subscriptions;
mod tasks;
mod tickets;

use std::str::FromStr;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    FromRow, PgPool, Postgres,
};

use crate::domain::{models::Entity, ports::outbound::EntityStore, CrmError};

pub(crate) type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Two-way translation between an entity and its table row.
pub trait TableMapping: Entity {
    /// Column names, `id` first, in the order [`Self::bind_columns`] binds them.
    const COLUMNS: &'static [&'static str];

    /// Foreign key answering `get_by_parent`, if the entity has an owner.
    const PARENT_COLUMN: Option<&'static str>;

    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    fn from_row(row: Self::Row) -> Result<Self, CrmError>;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_sql(table: &str, columns: &[&str], filter_column: Option<&str>) -> String {
    let filter = filter_column
        .map(|column| format!(" WHERE {column} = $1"))
        .unwrap_or_default();
    format!(
        "SELECT {} FROM {table}{filter} ORDER BY created_at DESC",
        columns.join(", ")
    )
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len()).map(|i| format!("${i}")).join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

/// Assumes `columns[0]` is the primary key, bound as `$1`. Every other column
/// is assigned so the placeholder count matches what `bind_columns` binds.
fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .join(", ");
    format!("UPDATE {table} SET {assignments} WHERE id = $1")
}

fn delete_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = $1")
}

/// Parses a TEXT column holding a snake_case enum value.
pub(crate) fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, CrmError> {
    value.parse().map_err(|_| {
        tracing::error!(column, value, "unexpected value in database column");
        CrmError::storage(format!("unexpected value '{value}' in column {column}"))
    })
}

fn db_failure(err: sqlx::Error) -> CrmError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return CrmError::validation(format!(
                "referenced record does not exist: {}",
                db_err.message()
            ));
        }
        if db_err.is_unique_violation() {
            return CrmError::Conflict(db_err.message().to_string());
        }
    }

    tracing::error!(error = %err, "database query failed");
    CrmError::storage(err.to_string())
}

#[async_trait]
impl<E: TableMapping> EntityStore<E> for PostgresStore {
    async fn get_all(&self) -> Result<Vec<E>, CrmError> {
        let sql = select_sql(E::COLLECTION, E::COLUMNS, None);
        let rows = sqlx::query_as::<_, E::Row>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_failure)?;

        rows.into_iter().map(E::from_row).collect()
    }

    async fn get_by_parent(&self, parent_id: &str) -> Result<Vec<E>, CrmError> {
        let Some(parent_column) = E::PARENT_COLUMN else {
            return Ok(Vec::new());
        };

        let sql = select_sql(E::COLLECTION, E::COLUMNS, Some(parent_column));
        let rows = sqlx::query_as::<_, E::Row>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_failure)?;

        rows.into_iter().map(E::from_row).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<E>, CrmError> {
        let sql = select_sql(E::COLLECTION, E::COLUMNS, Some("id"));
        let row = sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_failure)?;

        row.map(E::from_row).transpose()
    }

    async fn insert(&self, entity: &E) -> Result<(), CrmError> {
        let sql = insert_sql(E::COLLECTION, E::COLUMNS);
        entity
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(db_failure)?;

        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), CrmError> {
        let sql = update_sql(E::COLLECTION, E::COLUMNS);
        let result = entity
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(db_failure)?;

        if result.rows_affected() == 0 {
            return Err(CrmError::not_found(E::COLLECTION, entity.id().as_ref()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, CrmError> {
        let result = sqlx::query(&delete_sql(E::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_failure)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        Agreement, ClientStatus, Payment, Project, Subscription, Task, TaskStatus,
    };

    #[test]
    fn select_orders_newest_first() {
        assert_eq!(
            select_sql("clients", &["id", "name", "created_at"], None),
            "SELECT id, name, created_at FROM clients ORDER BY created_at DESC"
        );
        assert_eq!(
            select_sql("tasks", &["id", "project_id"], Some("project_id")),
            "SELECT id, project_id FROM tasks WHERE project_id = $1 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn insert_numbers_placeholders_in_column_order() {
        assert_eq!(
            insert_sql("goals", &["id", "title", "created_at"]),
            "INSERT INTO goals (id, title, created_at) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn update_assigns_every_column_but_the_key() {
        assert_eq!(
            update_sql("tasks", &["id", "title", "updated_at"]),
            "UPDATE tasks SET title = $2, updated_at = $3 WHERE id = $1"
        );
    }

    #[test]
    fn mappings_start_with_the_primary_key() {
        assert_eq!(Task::COLUMNS[0], "id");
        assert_eq!(Project::COLUMNS[0], "id");
        assert_eq!(Task::PARENT_COLUMN, Some("project_id"));
        assert!(Task::COLUMNS.contains(&"created_at"));
    }

    #[test]
    fn update_sql_covers_every_mapped_table() {
        let sql = update_sql(Project::COLLECTION, Project::COLUMNS);
        assert!(sql.starts_with("UPDATE projects SET client_id = $2"));
        assert!(sql.contains("budget_currency = $9"));
        assert!(sql.ends_with("updated_at = $11 WHERE id = $1"));
    }

    #[test]
    fn billing_tables_hang_off_their_owners() {
        assert_eq!(Subscription::PARENT_COLUMN, Some("client_id"));
        assert_eq!(Payment::PARENT_COLUMN, Some("subscription_id"));
        assert_eq!(Agreement::PARENT_COLUMN, Some("client_id"));
        assert!(Subscription::COLUMNS.contains(&"billing_interval"));
    }

    #[test]
    fn parses_snake_case_columns() {
        let status: TaskStatus = parse_column("status", "in_progress").unwrap();
        assert_eq!(status, TaskStatus::InProgress);

        let bad = parse_column::<ClientStatus>("status", "deleted");
        assert!(matches!(bad, Err(CrmError::Storage(_))));
    }
}
