use std::sync::Arc;

use crate::domain::{
    models::{Editable, Entity, Record},
    ports::outbound::EntityStore,
    CrmError,
};

use super::timestamp;

/// Create/read/update/delete for any record type.
///
/// Filtering happens here rather than in the backends, so both stores only
/// need to answer "all", "by parent" and "by id".
pub struct RecordService<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
}

impl<E: Entity> Clone for RecordService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<E: Record> RecordService<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store }
    }

    /// Matching records, newest first.
    pub async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, CrmError> {
        let records = self.store.get_all().await?;
        Ok(records.into_iter().filter(|r| r.matches(filter)).collect())
    }

    pub async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<E>, CrmError> {
        self.store.get_by_parent(parent_id).await
    }

    pub async fn get(&self, id: &E::Id) -> Result<Option<E>, CrmError> {
        self.store.get_by_id(id.as_ref()).await
    }

    /// Like [`Self::get`], but a missing record is an error.
    pub async fn require(&self, id: &E::Id) -> Result<E, CrmError> {
        self.get(id)
            .await?
            .ok_or_else(|| CrmError::not_found(E::COLLECTION, id.as_ref()))
    }

    #[tracing::instrument(skip_all, fields(collection = E::COLLECTION))]
    pub async fn create(&self, draft: E::Draft) -> Result<E, CrmError> {
        let id = E::Id::from(self.store.generate_id());
        let record = E::from_draft(id, draft, timestamp())?;
        self.store.insert(&record).await?;

        tracing::info!(id = %record.id(), "created record");
        Ok(record)
    }
}

impl<E: Editable> RecordService<E> {
    #[tracing::instrument(skip_all, fields(collection = E::COLLECTION, id = %id))]
    pub async fn update(&self, id: &E::Id, patch: E::Patch) -> Result<E, CrmError> {
        let mut record = self.require(id).await?;
        record.apply_patch(patch, timestamp())?;
        self.store.update(&record).await?;

        tracing::debug!("updated record");
        Ok(record)
    }

    /// Writes an already-modified record back.
    pub(crate) async fn replace(&self, record: &E) -> Result<(), CrmError> {
        self.store.update(record).await
    }

    #[tracing::instrument(skip_all, fields(collection = E::COLLECTION, id = %id))]
    pub async fn delete(&self, id: &E::Id) -> Result<(), CrmError> {
        if !self.store.delete(id.as_ref()).await? {
            return Err(CrmError::not_found(E::COLLECTION, id.as_ref()));
        }

        tracing::info!("deleted record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::local::LocalStore;
    use crate::domain::models::{
        Client, ClientDraft, ClientFilter, ClientId, ClientPatch, ClientStatus,
    };

    fn service() -> RecordService<Client> {
        RecordService::new(Arc::new(LocalStore::in_memory("test")))
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let clients = service();
        let mut draft = ClientDraft::new("Acme");
        draft.email = Some("ops@acme.test".to_string());

        let created = clients.create(draft).await.unwrap();
        let fetched = clients.get(&created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn create_then_delete_then_get_is_absent() {
        let clients = service();
        let created = clients.create(ClientDraft::new("Acme")).await.unwrap();

        clients.delete(&created.id).await.unwrap();

        assert_eq!(clients.get(&created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_a_missing_record_is_not_found() {
        let result = service().delete(&ClientId::new("nope")).await;
        assert!(matches!(result, Err(CrmError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_applies_patch_and_persists() {
        let clients = service();
        let created = clients.create(ClientDraft::new("Acme")).await.unwrap();
        let patch = ClientPatch {
            status: Some(ClientStatus::Archived),
            ..Default::default()
        };

        let updated = clients.update(&created.id, patch).await.unwrap();

        assert_eq!(updated.status, ClientStatus::Archived);
        assert_eq!(clients.require(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn rejected_patch_is_not_persisted() {
        let clients = service();
        let created = clients.create(ClientDraft::new("Acme")).await.unwrap();
        let patch = ClientPatch {
            name: Some(String::new()),
            ..Default::default()
        };

        assert!(clients.update(&created.id, patch).await.is_err());
        assert_eq!(clients.require(&created.id).await.unwrap().name, "Acme");
    }

    #[tokio::test]
    async fn list_applies_filters() {
        let clients = service();
        clients.create(ClientDraft::new("Acme")).await.unwrap();
        clients.create(ClientDraft::new("Globex")).await.unwrap();
        let filter = ClientFilter {
            search: Some("glob".to_string()),
            ..Default::default()
        };

        let found = clients.list(&filter).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Globex");
        assert_eq!(clients.list(&ClientFilter::default()).await.unwrap().len(), 2);
    }
}
