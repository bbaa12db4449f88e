//! Composition root.
//!
//! The only place that names concrete storage adapters. The backend is picked
//! once from configuration; everything downstream sees `Repositories`.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::{
    adapters::outbound::{
        local::{JsonFileKeyValueStore, LocalStore, MemoryKeyValueStore},
        postgres::PostgresStore,
    },
    config::{DatabaseSettings, LocalStoreSettings, Settings},
    domain::{ports::outbound::KeyValueStore, repositories::Repositories},
};

pub async fn build_repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    match &settings.database {
        Some(database) => {
            let store = connect_postgres(database).await?;
            Ok(Repositories::new(Arc::new(store)))
        }
        None => {
            let store = open_local_store(&settings.local_store)?;
            Ok(Repositories::new(Arc::new(store)))
        }
    }
}

async fn connect_postgres(database: &DatabaseSettings) -> anyhow::Result<PostgresStore> {
    tracing::info!(
        host = %database.host,
        database = %database.database_name,
        "using PostgreSQL backend"
    );

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect_with(database.with_db())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(PostgresStore::new(pool))
}

fn open_local_store(local: &LocalStoreSettings) -> anyhow::Result<LocalStore> {
    let kv: Arc<dyn KeyValueStore> = match &local.path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using local JSON file backend");
            Arc::new(JsonFileKeyValueStore::open(path)?)
        }
        None => {
            tracing::warn!("no database or local_store.path configured, data is kept in memory only");
            Arc::new(MemoryKeyValueStore::default())
        }
    };

    Ok(LocalStore::new(kv, local.namespace.clone()))
}
