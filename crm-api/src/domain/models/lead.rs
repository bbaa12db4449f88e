use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{
    entity::{filter_eq, text_matches},
    ClientDraft, ClientId, Editable, Entity, LeadId, Record,
};
use crate::domain::{error::require_text, CrmError};

/// Sales pipeline stages. `won` and `lost` close the lead.
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
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

/// A prospect captured by one of the website forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    /// Which form captured the lead, e.g. "contact" or "consultation".
    pub source: Option<String>,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub converted_client_id: Option<ClientId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Lead {
    /// The client record this lead turns into on conversion.
    pub fn client_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            company: self.company.clone(),
            email: Some(self.email.clone()),
            phone: self.phone.clone(),
            notes: self.message.clone(),
        }
    }

    pub fn mark_converted(&mut self, client_id: ClientId, now: OffsetDateTime) {
        self.status = LeadStatus::Won;
        self.converted_client_id = Some(client_id);
        self.updated_at = now;
    }
}

fn check_email(email: &str) -> Result<(), CrmError> {
    require_text("email", email)?;
    if !email.contains('@') {
        return Err(CrmError::validation(format!("'{email}' is not an email address")));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub company: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub search: Option<String>,
}

impl Entity for Lead {
    const COLLECTION: &'static str = "leads";
    type Id = LeadId;

    fn id(&self) -> &LeadId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Lead {
    type Draft = LeadDraft;
    type Filter = LeadFilter;

    fn from_draft(id: LeadId, draft: LeadDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("name", &draft.name)?;
        check_email(&draft.email)?;
        Ok(Self {
            id,
            name: draft.name,
            email: draft.email.trim().to_string(),
            company: draft.company,
            phone: draft.phone,
            source: draft.source,
            message: draft.message,
            status: LeadStatus::New,
            converted_client_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, filter: &LeadFilter) -> bool {
        filter_eq(&filter.status, &self.status)
            && filter
                .source
                .as_ref()
                .map_or(true, |source| self.source.as_ref() == Some(source))
            && text_matches(
                filter.search.as_deref(),
                [
                    Some(self.name.as_str()),
                    Some(self.email.as_str()),
                    self.company.as_deref(),
                ],
            )
    }
}

impl Editable for Lead {
    type Patch = LeadPatch;

    fn apply_patch(&mut self, patch: LeadPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(email) = patch.email {
            check_email(&email)?;
            self.email = email.trim().to_string();
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}
