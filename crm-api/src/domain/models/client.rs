use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{
    entity::{filter_eq, text_matches},
    ClientId, Editable, Entity, Record,
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
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl ClientDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: None,
            email: None,
            phone: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub company: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    pub status: Option<ClientStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub search: Option<String>,
}

impl Entity for Client {
    const COLLECTION: &'static str = "clients";
    type Id = ClientId;

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Client {
    type Draft = ClientDraft;
    type Filter = ClientFilter;

    fn from_draft(id: ClientId, draft: ClientDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("name", &draft.name)?;
        Ok(Self {
            id,
            name: draft.name,
            company: draft.company,
            email: draft.email,
            phone: draft.phone,
            status: ClientStatus::Active,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &ClientFilter) -> bool {
        filter_eq(&filter.status, &self.status)
            && text_matches(
                filter.search.as_deref(),
                [
                    Some(self.name.as_str()),
                    self.company.as_deref(),
                    self.email.as_deref(),
                ],
            )
    }
}

impl Editable for Client {
    type Patch = ClientPatch;

    fn apply_patch(&mut self, patch: ClientPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = now;
        Ok(())
    }
}
