//! Foreign-key rules for the local store, mirroring the SQL schema.

use crate::domain::models::{
    Agreement, Client, ClientCommunication, Deliverable, Entity, Goal, Lead, Milestone, Payment,
    Project, Subscription, SupportTicket, Task,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OnDelete {
    Cascade,
    SetNull,
}

/// `child.field` references a record in `parent`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Relation {
    pub parent: &'static str,
    pub child: &'static str,
    /// camelCase, as stored.
    pub field: &'static str,
    pub on_delete: OnDelete,
}

const fn relation(
    parent: &'static str,
    child: &'static str,
    field: &'static str,
    on_delete: OnDelete,
) -> Relation {
    Relation {
        parent,
        child,
        field,
        on_delete,
    }
}

pub(super) const RELATIONS: &[Relation] = &[
    relation(Client::COLLECTION, Project::COLLECTION, "clientId", OnDelete::Cascade),
    relation(Client::COLLECTION, ClientCommunication::COLLECTION, "clientId", OnDelete::Cascade),
    relation(Client::COLLECTION, SupportTicket::COLLECTION, "clientId", OnDelete::Cascade),
    relation(Client::COLLECTION, Lead::COLLECTION, "convertedClientId", OnDelete::SetNull),
    relation(Project::COLLECTION, Task::COLLECTION, "projectId", OnDelete::Cascade),
    relation(Project::COLLECTION, Milestone::COLLECTION, "projectId", OnDelete::Cascade),
    relation(Project::COLLECTION, Goal::COLLECTION, "projectId", OnDelete::Cascade),
    relation(Project::COLLECTION, Deliverable::COLLECTION, "projectId", OnDelete::Cascade),
    relation(Project::COLLECTION, ClientCommunication::COLLECTION, "projectId", OnDelete::SetNull),
    relation(Project::COLLECTION, SupportTicket::COLLECTION, "projectId", OnDelete::SetNull),
    relation(Task::COLLECTION, Task::COLLECTION, "parentTaskId", OnDelete::SetNull),
    relation(Client::COLLECTION, Subscription::COLLECTION, "clientId", OnDelete::Cascade),
    relation(Client::COLLECTION, Agreement::COLLECTION, "clientId", OnDelete::Cascade),
    relation(Subscription::COLLECTION, Payment::COLLECTION, "subscriptionId", OnDelete::Cascade),
    relation(Subscription::COLLECTION, Agreement::COLLECTION, "subscriptionId", OnDelete::SetNull),
];

/// Relations `parent` is the referenced side of.
pub(super) fn dependents_of(parent: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.parent == parent)
}

/// Foreign keys held by rows of `child`.
pub(super) fn references_from(child: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.child == child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_foreign_key_is_listed_once() {
        let mut keys: Vec<_> = RELATIONS.iter().map(|r| (r.child, r.field)).collect();
        keys.sort();
        let before = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn tasks_reference_projects_and_parent_tasks() {
        let parents: Vec<_> = references_from(Task::COLLECTION).map(|r| r.parent).collect();
        assert_eq!(parents, vec![Project::COLLECTION, Task::COLLECTION]);
    }
}
