//! Entity persistence port (outbound).
//!
//! One interface for both backends. The composition root picks PostgreSQL or
//! the local key-value store once, and every service talks to this trait.

use async_trait::async_trait;

use crate::domain::{models::Entity, CrmError};

#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// All records of the collection, newest first.
    async fn get_all(&self) -> Result<Vec<E>, CrmError>;

    /// Records owned by `parent_id`, newest first.
    async fn get_by_parent(&self, parent_id: &str) -> Result<Vec<E>, CrmError>;

    /// `Ok(None)` when no record has this id.
    async fn get_by_id(&self, id: &str) -> Result<Option<E>, CrmError>;

    async fn insert(&self, entity: &E) -> Result<(), CrmError>;

    /// Replaces the stored record with the same id. Fails with `NotFound` if absent.
    async fn update(&self, entity: &E) -> Result<(), CrmError>;

    /// Removes the record and its dependents. Returns false when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, CrmError>;

    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
