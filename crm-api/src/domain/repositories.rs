use std::sync::Arc;

use crate::domain::{
    models::{
        Agreement, Client, ClientCommunication, Deliverable, Entity, Goal, Lead, Milestone,
        Payment, Project, Subscription, SupportTicket, Task,
    },
    ports::outbound::EntityStore,
};

/// A storage backend able to persist every entity type.
pub trait Backend:
    EntityStore<Client>
    + EntityStore<Lead>
    + EntityStore<Project>
    + EntityStore<Task>
    + EntityStore<Milestone>
    + EntityStore<Goal>
    + EntityStore<Deliverable>
    + EntityStore<ClientCommunication>
    + EntityStore<SupportTicket>
    + EntityStore<Subscription>
    + EntityStore<Payment>
    + EntityStore<Agreement>
{
}

impl<T> Backend for T where
    T: EntityStore<Client>
        + EntityStore<Lead>
        + EntityStore<Project>
        + EntityStore<Task>
        + EntityStore<Milestone>
        + EntityStore<Goal>
        + EntityStore<Deliverable>
        + EntityStore<ClientCommunication>
        + EntityStore<SupportTicket>
    + EntityStore<Subscription>
    + EntityStore<Payment>
    + EntityStore<Agreement>
{
}

/// Typed store handles, all pointing at the one backend chosen at startup.
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn EntityStore<Client>>,
    pub leads: Arc<dyn EntityStore<Lead>>,
    pub projects: Arc<dyn EntityStore<Project>>,
    pub tasks: Arc<dyn EntityStore<Task>>,
    pub milestones: Arc<dyn EntityStore<Milestone>>,
    pub goals: Arc<dyn EntityStore<Goal>>,
    pub deliverables: Arc<dyn EntityStore<Deliverable>>,
    pub communications: Arc<dyn EntityStore<ClientCommunication>>,
    pub tickets: Arc<dyn EntityStore<SupportTicket>>,
    pub subscriptions: Arc<dyn EntityStore<Subscription>>,
    pub payments: Arc<dyn EntityStore<Payment>>,
    pub agreements: Arc<dyn EntityStore<Agreement>>,
}

impl Repositories {
    pub fn new<B: Backend>(backend: Arc<B>) -> Self {
        Self {
            clients: backend.clone(),
            leads: backend.clone(),
            projects: backend.clone(),
            tasks: backend.clone(),
            milestones: backend.clone(),
            goals: backend.clone(),
            deliverables: backend.clone(),
            communications: backend.clone(),
            tickets: backend.clone(),
            subscriptions: backend.clone(),
            payments: backend.clone(),
            agreements: backend,
        }
    }

    pub fn store<E: Entity>(&self) -> Arc<dyn EntityStore<E>>
    where
        Self: StoreFor<E>,
    {
        StoreFor::<E>::store_for(self)
    }
}

/// Resolves the typed store for `E`, so generic handlers can stay generic.
pub trait StoreFor<E: Entity> {
    fn store_for(&self) -> Arc<dyn EntityStore<E>>;
}

macro_rules! store_for {
    ($($entity:ty => $field:ident),* $(,)?) => {
        $(
            impl StoreFor<$entity> for Repositories {
                fn store_for(&self) -> Arc<dyn EntityStore<$entity>> {
                    self.$field.clone()
                }
            }
        )*
    };
}

store_for!(
    Client => clients,
    Lead => leads,
    Project => projects,
    Task => tasks,
    Milestone => milestones,
    Goal => goals,
    Deliverable => deliverables,
    ClientCommunication => communications,
    SupportTicket => tickets,
    Subscription => subscriptions,
    Payment => payments,
    Agreement => agreements,
);
