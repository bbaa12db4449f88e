//! Local fallback backend.
//!
//! Every collection is one JSON array stored under `<namespace>:<collection>`
//! in a [`KeyValueStore`]. Used when no database is configured.
//!
//! Key-value calls may hit the filesystem, so they run on tokio's blocking
//! pool while an async mutex serializes read-modify-write cycles.

mod cascade;
mod key_value;

use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{
    models::Entity,
    ports::outbound::{EntityStore, KeyValueStore, StorageError},
    CrmError,
};

use cascade::{dependents_of, references_from, OnDelete};
pub use key_value::{JsonFileKeyValueStore, MemoryKeyValueStore};

pub struct LocalStore {
    collections: Arc<Collections>,
    /// Held for every read-modify-write cycle.
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            collections: Arc::new(Collections {
                kv,
                namespace: namespace.into(),
            }),
            lock: Mutex::new(()),
        }
    }

    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::default()), namespace)
    }

    /// Runs `op` on the blocking pool with the store lock held.
    async fn run<T, F>(&self, op: F) -> Result<T, CrmError>
    where
        T: Send + 'static,
        F: FnOnce(&Collections) -> Result<T, CrmError> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let collections = self.collections.clone();
        tokio::task::spawn_blocking(move || op(&collections))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "local store task failed");
                CrmError::storage(err.to_string())
            })?
    }
}

/// Synchronous access to the namespaced collections. Callers hold the store lock.
struct Collections {
    kv: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl Collections {
    fn key(&self, collection: &str) -> String {
        format!("{}:{}", self.namespace, collection)
    }

    /// Raw rows of a collection, oldest first. A missing key is an empty collection.
    fn rows(&self, collection: &str) -> Result<Vec<Value>, CrmError> {
        let key = self.key(collection);
        match self.kv.get(&key).map_err(|e| storage_failure(&key, e))? {
            None => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows),
            Some(_) => {
                tracing::warn!(%key, "local collection is not an array");
                Err(CrmError::storage(format!("{key} is not a collection")))
            }
        }
    }

    fn save_rows(&self, collection: &str, rows: Vec<Value>) -> Result<(), CrmError> {
        let key = self.key(collection);
        if rows.is_empty() {
            return self.kv.remove(&key).map_err(|e| storage_failure(&key, e));
        }
        self.kv
            .set(&key, Value::Array(rows))
            .map_err(|e| storage_failure(&key, e))
    }

    fn records<E: Entity>(&self) -> Result<Vec<E>, CrmError> {
        let mut records = self
            .rows(E::COLLECTION)?
            .into_iter()
            .rev()
            .map(from_row::<E>)
            .collect::<Result<Vec<E>, _>>()?;

        // Stable, so same-instant records stay newest-inserted first.
        records.sort_by_key(|r| Reverse(r.created_at()));
        Ok(records)
    }

    fn contains(&self, collection: &str, id: &str) -> Result<bool, CrmError> {
        Ok(self.rows(collection)?.iter().any(|row| row_id(row) == Some(id)))
    }

    /// Rejects a row whose foreign keys point at records that do not exist,
    /// as the SQL schema's REFERENCES constraints do.
    fn check_references(&self, collection: &str, row: &Value) -> Result<(), CrmError> {
        for relation in references_from(collection) {
            let Some(parent_id) = row.get(relation.field).and_then(Value::as_str) else {
                continue;
            };
            if !self.contains(relation.parent, parent_id)? {
                return Err(CrmError::validation(format!(
                    "referenced record does not exist: {}.{} = {parent_id}",
                    relation.child, relation.field
                )));
            }
        }
        Ok(())
    }

    fn insert(&self, collection: &str, id: &str, row: Value) -> Result<(), CrmError> {
        let mut rows = self.rows(collection)?;
        if rows.iter().any(|existing| row_id(existing) == Some(id)) {
            return Err(CrmError::Conflict(format!(
                "{collection} already has a record with id {id}"
            )));
        }
        self.check_references(collection, &row)?;

        rows.push(row);
        self.save_rows(collection, rows)
    }

    fn replace(&self, collection: &'static str, id: &str, row: Value) -> Result<(), CrmError> {
        let mut rows = self.rows(collection)?;
        let slot = rows
            .iter_mut()
            .find(|existing| row_id(existing) == Some(id))
            .ok_or_else(|| CrmError::not_found(collection, id))?;
        self.check_references(collection, &row)?;

        *slot = row;
        self.save_rows(collection, rows)
    }

    /// Deletes `id` from `collection` and applies the foreign-key rules to
    /// every dependent collection, transitively.
    ///
    /// Collections are written one at a time. If a later write fails, the
    /// earlier ones stay applied and the error is returned.
    fn delete_with_dependents(&self, collection: &'static str, id: &str) -> Result<bool, CrmError> {
        let mut rows = self.rows(collection)?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        if rows.len() == before {
            return Ok(false);
        }
        self.save_rows(collection, rows)?;

        let mut pending = vec![(collection, id.to_string())];
        while let Some((parent, parent_id)) = pending.pop() {
            for relation in dependents_of(parent) {
                let mut rows = self.rows(relation.child)?;
                let mut changed = false;

                match relation.on_delete {
                    OnDelete::Cascade => rows.retain(|row| {
                        if !references(row, relation.field, &parent_id) {
                            return true;
                        }
                        if let Some(child_id) = row_id(row) {
                            pending.push((relation.child, child_id.to_string()));
                        }
                        changed = true;
                        false
                    }),
                    OnDelete::SetNull => {
                        for row in rows.iter_mut() {
                            if references(row, relation.field, &parent_id) {
                                row[relation.field] = Value::Null;
                                changed = true;
                            }
                        }
                    }
                }

                if changed {
                    tracing::debug!(
                        parent,
                        child = relation.child,
                        field = relation.field,
                        "applied delete rule"
                    );
                    self.save_rows(relation.child, rows)?;
                }
            }
        }

        Ok(true)
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn references(row: &Value, field: &str, id: &str) -> bool {
    row.get(field).and_then(Value::as_str) == Some(id)
}

fn to_row<E: Entity>(entity: &E) -> Result<Value, CrmError> {
    serde_json::to_value(entity).map_err(|e| storage_failure(E::COLLECTION, StorageError::from(e)))
}

fn from_row<E: Entity>(row: Value) -> Result<E, CrmError> {
    serde_json::from_value(row).map_err(|e| storage_failure(E::COLLECTION, StorageError::from(e)))
}

fn storage_failure(key: &str, err: StorageError) -> CrmError {
    tracing::warn!(%key, error = %err, "local store failure");
    CrmError::storage(err.to_string())
}

#[async_trait]
impl<E: Entity> EntityStore<E> for LocalStore {
    async fn get_all(&self) -> Result<Vec<E>, CrmError> {
        self.run(|c| c.records::<E>()).await
    }

    async fn get_by_parent(&self, parent_id: &str) -> Result<Vec<E>, CrmError> {
        let parent_id = parent_id.to_string();
        self.run(move |c| {
            let records: Vec<E> = c.records()?;
            Ok(records
                .into_iter()
                .filter(|r| r.parent_id() == Some(parent_id.as_str()))
                .collect())
        })
        .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<E>, CrmError> {
        let id = id.to_string();
        self.run(move |c| {
            c.rows(E::COLLECTION)?
                .into_iter()
                .find(|row| row_id(row) == Some(id.as_str()))
                .map(from_row::<E>)
                .transpose()
        })
        .await
    }

    async fn insert(&self, entity: &E) -> Result<(), CrmError> {
        let row = to_row(entity)?;
        let id = entity.id().as_ref().to_string();
        self.run(move |c| c.insert(E::COLLECTION, &id, row)).await
    }

    async fn update(&self, entity: &E) -> Result<(), CrmError> {
        let row = to_row(entity)?;
        let id = entity.id().as_ref().to_string();
        self.run(move |c| c.replace(E::COLLECTION, &id, row)).await
    }

    async fn delete(&self, id: &str) -> Result<bool, CrmError> {
        let id = id.to_string();
        self.run(move |c| c.delete_with_dependents(E::COLLECTION, &id)).await
    }

    fn generate_id(&self) -> String {
        self.collections.kv.generate_id()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::{
        models::{
            Agreement, AgreementDocument, AgreementDraft, BillingInterval, Budget, Client,
            ClientCommunication, ClientDraft, CommunicationDraft, CommunicationType, Deliverable,
            DeliverableDraft, Direction, Goal, GoalDraft, Lead, LeadDraft, Milestone,
            MilestoneDraft, Payment, PaymentDraft, Project, ProjectDraft, Record, Subscription,
            SubscriptionDraft, SupportTicket, Task, TaskDraft, TicketDraft, TicketPatch,
            TicketStatus, UserId,
        },
        services::{LeadConversion, RecordService},
    };

    struct Crm {
        clients: RecordService<Client>,
        projects: RecordService<Project>,
        tasks: RecordService<Task>,
        goals: RecordService<Goal>,
        communications: RecordService<ClientCommunication>,
        tickets: RecordService<SupportTicket>,
        leads: RecordService<Lead>,
        subscriptions: RecordService<Subscription>,
        payments: RecordService<Payment>,
        agreements: RecordService<Agreement>,
    }

    fn crm(store: LocalStore) -> Crm {
        crm_on(&Arc::new(store))
    }

    fn crm_on(store: &Arc<LocalStore>) -> Crm {
        Crm {
            clients: RecordService::new(store.clone()),
            projects: RecordService::new(store.clone()),
            tasks: RecordService::new(store.clone()),
            goals: RecordService::new(store.clone()),
            communications: RecordService::new(store.clone()),
            tickets: RecordService::new(store.clone()),
            leads: RecordService::new(store.clone()),
            subscriptions: RecordService::new(store.clone()),
            payments: RecordService::new(store.clone()),
            agreements: RecordService::new(store.clone()),
        }
    }

    fn note(client: &Client, project: Option<&Project>) -> CommunicationDraft {
        CommunicationDraft {
            client_id: client.id.clone(),
            project_id: project.map(|p| p.id.clone()),
            kind: CommunicationType::Note,
            direction: Direction::Internal,
            subject: Some("kickoff".to_string()),
            body: "Agreed on scope".to_string(),
        }
    }

    fn ticket(client: &Client, project: &Project) -> TicketDraft {
        TicketDraft {
            client_id: client.id.clone(),
            project_id: Some(project.id.clone()),
            subject: "Login broken".to_string(),
            description: "Users get a blank page after signing in".to_string(),
            priority: Default::default(),
        }
    }

    fn subscription(client: &Client) -> SubscriptionDraft {
        SubscriptionDraft {
            client_id: client.id.clone(),
            plan: "Automation care".to_string(),
            amount: 490.0,
            currency: "EUR".to_string(),
            interval: BillingInterval::Monthly,
            start_date: date!(2026 - 01 - 01),
            end_date: None,
        }
    }

    fn payment(subscription_id: &str) -> PaymentDraft {
        PaymentDraft {
            subscription_id: subscription_id.into(),
            amount: 490.0,
            currency: "EUR".to_string(),
            status: Default::default(),
            method: None,
            reference: None,
        }
    }

    fn agreement(client: &Client, subscription_id: Option<&str>) -> AgreementDraft {
        AgreementDraft {
            client_id: client.id.clone(),
            subscription_id: subscription_id.map(Into::into),
            document: AgreementDocument::TermsOfService,
            version: "2026-01".to_string(),
            status: Default::default(),
            signer_name: None,
            signer_email: None,
        }
    }

    /// Creating `draft` must fail because one of its references is dangling.
    async fn assert_dangling<E: Record>(store: &Arc<LocalStore>, draft: E::Draft)
    where
        LocalStore: EntityStore<E>,
    {
        let service: RecordService<E> = RecordService::new(store.clone());
        let result = service.create(draft).await;
        assert!(
            matches!(result, Err(CrmError::Validation(_))),
            "{} accepted a dangling reference",
            E::COLLECTION
        );
        assert!(service.list(&Default::default()).await.unwrap().is_empty());
    }

    fn goal(project: &Project) -> GoalDraft {
        GoalDraft {
            project_id: project.id.clone(),
            title: "Leads per month".to_string(),
            description: None,
            status: Default::default(),
            current_value: 0.0,
            target_value: 50.0,
            unit: None,
            target_date: None,
        }
    }

    #[tokio::test]
    async fn newest_records_come_first() {
        let crm = crm(LocalStore::in_memory("test"));
        let first = crm.clients.create(ClientDraft::new("first")).await.unwrap();
        let second = crm.clients.create(ClientDraft::new("second")).await.unwrap();

        let all = crm.clients.list(&Default::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn get_by_parent_only_returns_children() {
        let crm = crm(LocalStore::in_memory("test"));
        let acme = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let other = crm.clients.create(ClientDraft::new("Other")).await.unwrap();
        crm.projects.create(ProjectDraft::new(acme.id.clone(), "a")).await.unwrap();
        crm.projects.create(ProjectDraft::new(other.id.clone(), "b")).await.unwrap();

        let projects = crm.projects.list_by_parent(acme.id.as_str()).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].client_id, acme.id);
    }

    #[tokio::test]
    async fn deleting_a_project_cascades_and_nulls_references() {
        let crm = crm(LocalStore::in_memory("test"));
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let project = crm.projects.create(ProjectDraft::new(client.id.clone(), "Portal")).await.unwrap();
        let keep = crm.projects.create(ProjectDraft::new(client.id.clone(), "Keep")).await.unwrap();

        let task = crm.tasks.create(TaskDraft::new(project.id.clone(), "gone")).await.unwrap();
        let kept_task = crm.tasks.create(TaskDraft::new(keep.id.clone(), "stays")).await.unwrap();
        crm.goals.create(goal(&project)).await.unwrap();
        let message = crm.communications.create(note(&client, Some(&project))).await.unwrap();
        let issue = crm.tickets.create(ticket(&client, &project)).await.unwrap();

        crm.projects.delete(&project.id).await.unwrap();

        assert!(crm.tasks.get(&task.id).await.unwrap().is_none());
        assert!(crm.tasks.get(&kept_task.id).await.unwrap().is_some());
        assert!(crm.goals.list(&Default::default()).await.unwrap().is_empty());

        let message = crm.communications.require(&message.id).await.unwrap();
        assert_eq!(message.project_id, None);
        let issue = crm.tickets.require(&issue.id).await.unwrap();
        assert_eq!(issue.project_id, None);
    }

    #[tokio::test]
    async fn deleting_a_client_cascades_transitively() {
        let crm = crm(LocalStore::in_memory("test"));
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let project = crm.projects.create(ProjectDraft::new(client.id.clone(), "Portal")).await.unwrap();
        let task = crm.tasks.create(TaskDraft::new(project.id.clone(), "t")).await.unwrap();
        crm.communications.create(note(&client, None)).await.unwrap();
        crm.tickets.create(ticket(&client, &project)).await.unwrap();

        let lead = crm
            .leads
            .create(LeadDraft {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                company: None,
                phone: None,
                source: None,
                message: None,
            })
            .await
            .unwrap();
        let converted = LeadConversion::new(crm.leads.clone(), crm.clients.clone())
            .convert(&lead.id)
            .await
            .unwrap();

        crm.clients.delete(&client.id).await.unwrap();
        crm.clients.delete(&converted.client.id).await.unwrap();

        assert!(crm.projects.get(&project.id).await.unwrap().is_none());
        assert!(crm.tasks.get(&task.id).await.unwrap().is_none());
        assert!(crm.communications.list(&Default::default()).await.unwrap().is_empty());
        assert!(crm.tickets.list(&Default::default()).await.unwrap().is_empty());
        assert_eq!(crm.leads.require(&lead.id).await.unwrap().converted_client_id, None);
    }

    #[tokio::test]
    async fn deleting_a_parent_task_detaches_subtasks() {
        let crm = crm(LocalStore::in_memory("test"));
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let project = crm.projects.create(ProjectDraft::new(client.id.clone(), "Portal")).await.unwrap();
        let parent = crm.tasks.create(TaskDraft::new(project.id.clone(), "epic")).await.unwrap();
        let mut draft = TaskDraft::new(project.id.clone(), "story");
        draft.parent_task_id = Some(parent.id.clone());
        let child = crm.tasks.create(draft).await.unwrap();

        crm.tasks.delete(&parent.id).await.unwrap();

        let child = crm.tasks.require(&child.id).await.unwrap();
        assert_eq!(child.parent_task_id, None);
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::default());
        let a = crm(LocalStore::new(kv.clone(), "a"));
        let b = crm(LocalStore::new(kv, "b"));

        a.clients.create(ClientDraft::new("Acme")).await.unwrap();

        assert!(b.clients.list(&Default::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let open = || {
            let kv = JsonFileKeyValueStore::open(dir.path()).unwrap();
            crm(LocalStore::new(Arc::new(kv), "crm"))
        };

        let created = open().clients.create(ClientDraft::new("Acme")).await.unwrap();

        assert_eq!(open().clients.get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn inserting_a_duplicate_id_is_a_conflict() {
        let store = LocalStore::in_memory("test");
        let client = Client::from_draft(
            "c1".into(),
            ClientDraft::new("Acme"),
            time::OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        EntityStore::<Client>::insert(&store, &client).await.unwrap();
        let again = EntityStore::<Client>::insert(&store, &client).await;

        assert!(matches!(again, Err(CrmError::Conflict(_))));
    }

    #[tokio::test]
    async fn updating_a_missing_record_is_not_found() {
        let store = LocalStore::in_memory("test");
        let client = Client::from_draft(
            "c1".into(),
            ClientDraft::new("Acme"),
            time::OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        let result = EntityStore::<Client>::update(&store, &client).await;
        assert!(matches!(result, Err(CrmError::NotFound { .. })));
    }
    #[tokio::test]
    async fn records_must_point_at_existing_owners() {
        let store = Arc::new(LocalStore::in_memory("test"));
        let crm = crm_on(&store);
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let project = crm.projects.create(ProjectDraft::new(client.id.clone(), "Portal")).await.unwrap();

        assert_dangling::<Project>(&store, ProjectDraft::new("ghost", "Portal")).await;
        assert_dangling::<Task>(&store, TaskDraft::new("ghost", "t")).await;
        assert_dangling::<Milestone>(
            &store,
            MilestoneDraft {
                project_id: "ghost".into(),
                title: "Launch".to_string(),
                description: None,
                status: Default::default(),
                target_date: None,
            },
        )
        .await;
        let mut orphan_goal = goal(&project);
        orphan_goal.project_id = "ghost".into();
        assert_dangling::<Goal>(&store, orphan_goal).await;
        assert_dangling::<Deliverable>(
            &store,
            DeliverableDraft {
                project_id: "ghost".into(),
                title: "Copy deck".to_string(),
                description: None,
                status: Default::default(),
                due_date: None,
            },
        )
        .await;

        let mut orphan_note = note(&client, None);
        orphan_note.client_id = "ghost".into();
        assert_dangling::<ClientCommunication>(&store, orphan_note).await;
        let mut orphan_ticket = ticket(&client, &project);
        orphan_ticket.client_id = "ghost".into();
        assert_dangling::<SupportTicket>(&store, orphan_ticket).await;
        let mut misfiled_ticket = ticket(&client, &project);
        misfiled_ticket.project_id = Some("ghost".into());
        assert_dangling::<SupportTicket>(&store, misfiled_ticket).await;

        let mut orphan_subscription = subscription(&client);
        orphan_subscription.client_id = "ghost".into();
        assert_dangling::<Subscription>(&store, orphan_subscription).await;
        assert_dangling::<Payment>(&store, payment("ghost")).await;
        assert_dangling::<Agreement>(&store, agreement(&client, Some("ghost"))).await;
    }

    #[tokio::test]
    async fn subtask_needs_an_existing_parent_task() {
        let store = Arc::new(LocalStore::in_memory("test"));
        let crm = crm_on(&store);
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let project = crm.projects.create(ProjectDraft::new(client.id.clone(), "Portal")).await.unwrap();

        let mut draft = TaskDraft::new(project.id.clone(), "story");
        draft.parent_task_id = Some("ghost".into());

        assert_dangling::<Task>(&store, draft).await;
    }

    #[tokio::test]
    async fn updates_are_checked_for_dangling_references() {
        let crm = crm(LocalStore::in_memory("test"));
        let lead = crm
            .leads
            .create(LeadDraft {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                company: None,
                phone: None,
                source: None,
                message: None,
            })
            .await
            .unwrap();

        let mut converted = lead.clone();
        converted.converted_client_id = Some("ghost".into());
        let result = crm.leads.replace(&converted).await;

        assert!(matches!(result, Err(CrmError::Validation(_))));
        assert_eq!(crm.leads.require(&lead.id).await.unwrap(), lead);
    }

    #[tokio::test]
    async fn deleting_a_client_removes_its_billing() {
        let crm = crm(LocalStore::in_memory("test"));
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let plan = crm.subscriptions.create(subscription(&client)).await.unwrap();
        crm.payments.create(payment(plan.id.as_str())).await.unwrap();
        crm.agreements
            .create(agreement(&client, Some(plan.id.as_str())))
            .await
            .unwrap();

        crm.clients.delete(&client.id).await.unwrap();

        assert!(crm.subscriptions.list(&Default::default()).await.unwrap().is_empty());
        assert!(crm.payments.list(&Default::default()).await.unwrap().is_empty());
        assert!(crm.agreements.list(&Default::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelling_a_subscription_record_keeps_the_signed_agreements() {
        let crm = crm(LocalStore::in_memory("test"));
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let plan = crm.subscriptions.create(subscription(&client)).await.unwrap();
        let payment = crm.payments.create(payment(plan.id.as_str())).await.unwrap();
        let terms = crm
            .agreements
            .create(agreement(&client, Some(plan.id.as_str())))
            .await
            .unwrap();

        crm.subscriptions.delete(&plan.id).await.unwrap();

        assert!(crm.payments.get(&payment.id).await.unwrap().is_none());
        let terms = crm.agreements.require(&terms.id).await.unwrap();
        assert_eq!(terms.subscription_id, None);
        assert_eq!(terms.client_id, client.id);
    }

    #[tokio::test]
    async fn dated_records_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let open = || {
            let kv = JsonFileKeyValueStore::open(dir.path()).unwrap();
            crm(LocalStore::new(Arc::new(kv), "crm"))
        };

        let crm = open();
        let client = crm.clients.create(ClientDraft::new("Acme")).await.unwrap();
        let mut draft = ProjectDraft::new(client.id.clone(), "Portal");
        draft.budget = Some(Budget::new(1250.5, "SEK"));
        draft.start_date = Some(date!(2026 - 02 - 01));
        draft.end_date = Some(date!(2026 - 06 - 30));
        let project = crm.projects.create(draft).await.unwrap();

        let epic = crm.tasks.create(TaskDraft::new(project.id.clone(), "epic")).await.unwrap();
        let mut draft = TaskDraft::new(project.id.clone(), "story").with_due_date(date!(2026 - 03 - 15));
        draft.parent_task_id = Some(epic.id.clone());
        draft.assignee_id = Some(UserId::new("user-7"));
        let story = crm.tasks.create(draft).await.unwrap();

        let issue = crm.tickets.create(ticket(&client, &project)).await.unwrap();
        let resolve = TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        };
        let issue = crm.tickets.update(&issue.id, resolve).await.unwrap();
        assert!(issue.resolved_at.is_some());

        let reopened = open();
        assert_eq!(reopened.projects.get(&project.id).await.unwrap(), Some(project));
        assert_eq!(reopened.tasks.get(&story.id).await.unwrap(), Some(story));
        assert_eq!(reopened.tickets.get(&issue.id).await.unwrap(), Some(issue));
    }
}
