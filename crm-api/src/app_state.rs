use std::sync::Arc;

use crate::domain::{
    models::{Agreement, Client, Entity, Lead, Payment, Record, Subscription},
    ports::{
        inbound::{DashboardService, KanbanService},
        outbound::EntityStore,
    },
    repositories::{Repositories, StoreFor},
    services::{
        DashboardServiceImpl, KanbanServiceImpl, LeadConversion, RecordService, SubscriptionSignup,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub kanban: Arc<dyn KanbanService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl AppState {
    pub fn new(repositories: Repositories) -> Self {
        let kanban = KanbanServiceImpl::new(
            repositories.tasks.clone(),
            repositories.projects.clone(),
        );
        let dashboard = DashboardServiceImpl::new(&repositories);

        Self {
            kanban: Arc::new(kanban),
            dashboard: Arc::new(dashboard),
            repositories,
        }
    }

    /// CRUD service for any stored record type.
    pub fn records<E: Record>(&self) -> RecordService<E>
    where
        Repositories: StoreFor<E>,
    {
        RecordService::new(self.store::<E>())
    }

    pub fn lead_conversion(&self) -> LeadConversion {
        LeadConversion::new(self.records::<Lead>(), self.records::<Client>())
    }

    pub fn billing(&self) -> SubscriptionSignup {
        SubscriptionSignup::new(
            self.records::<Subscription>(),
            self.records::<Payment>(),
            self.records::<Agreement>(),
        )
    }

    fn store<E: Entity>(&self) -> Arc<dyn EntityStore<E>>
    where
        Repositories: StoreFor<E>,
    {
        self.repositories.store::<E>()
    }
}
