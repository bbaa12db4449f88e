use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{
    entity::{filter_eq, filter_eq_opt, text_matches},
    ClientId, Editable, Entity, Priority, ProjectId, Record, TicketId,
};
use crate::domain::{error::require_text, CrmError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    WaitingOnClient,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// A support request raised by (or on behalf of) a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: TicketId,
    pub client_id: ClientId,
    pub project_id: Option<ProjectId>,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SupportTicket {
    fn set_status(&mut self, status: TicketStatus, now: OffsetDateTime) {
        match (self.status.is_resolved(), status.is_resolved()) {
            (false, true) => self.resolved_at = Some(now),
            (true, false) => self.resolved_at = None,
            _ => {}
        }
        self.status = status;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft {
    pub client_id: ClientId,
    pub project_id: Option<ProjectId>,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub project_id: Option<Option<ProjectId>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub client_id: Option<ClientId>,
    pub project_id: Option<ProjectId>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

impl Entity for SupportTicket {
    const COLLECTION: &'static str = "tickets";
    type Id = TicketId;

    fn id(&self) -> &TicketId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for SupportTicket {
    type Draft = TicketDraft;
    type Filter = TicketFilter;

    fn from_draft(id: TicketId, draft: TicketDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("subject", &draft.subject)?;
        Ok(Self {
            id,
            client_id: draft.client_id,
            project_id: draft.project_id,
            subject: draft.subject,
            description: draft.description,
            status: TicketStatus::Open,
            priority: draft.priority,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &TicketFilter) -> bool {
        filter_eq(&filter.client_id, &self.client_id)
            && filter_eq_opt(&filter.project_id, self.project_id.as_ref())
            && filter_eq(&filter.status, &self.status)
            && filter_eq(&filter.priority, &self.priority)
            && text_matches(
                filter.search.as_deref(),
                [Some(self.subject.as_str()), Some(self.description.as_str())],
            )
    }
}

impl Editable for SupportTicket {
    type Patch = TicketPatch;

    fn apply_patch(&mut self, patch: TicketPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(subject) = patch.subject {
            require_text("subject", &subject)?;
            self.subject = subject;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.set_status(status, now);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ticket() -> SupportTicket {
        let draft = TicketDraft {
            client_id: ClientId::new("c1"),
            project_id: None,
            subject: "Zapier flow stopped".to_string(),
            description: "No invoices synced since Monday".to_string(),
            priority: Priority::High,
        };
        SupportTicket::from_draft(TicketId::new("s1"), draft, OffsetDateTime::UNIX_EPOCH).unwrap()
    }

    fn status(status: TicketStatus) -> TicketPatch {
        TicketPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn resolving_stamps_and_reopening_clears() {
        let mut ticket = ticket();
        let resolved = datetime!(2026-02-01 12:00 UTC);

        ticket.apply_patch(status(TicketStatus::Resolved), resolved).unwrap();
        assert_eq!(ticket.resolved_at, Some(resolved));

        ticket
            .apply_patch(status(TicketStatus::Closed), datetime!(2026-02-02 12:00 UTC))
            .unwrap();
        assert_eq!(ticket.resolved_at, Some(resolved));

        ticket
            .apply_patch(status(TicketStatus::Open), datetime!(2026-02-03 12:00 UTC))
            .unwrap();
        assert_eq!(ticket.resolved_at, None);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let filter = TicketFilter {
            search: Some("INVOICES".to_string()),
            ..Default::default()
        };
        assert!(ticket().matches(&filter));
    }
}
