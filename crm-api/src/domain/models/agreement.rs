use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{
    entity::{filter_eq, filter_eq_opt},
    AgreementId, ClientId, Editable, Entity, Record, SubscriptionId,
};
use crate::domain::{error::require_text, CrmError};

/// The legal documents a client can be asked to accept.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgreementDocument {
    TermsOfService,
    PrivacyPolicy,
    ServiceAgreement,
    DataProcessing,
}

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
pub enum AgreementStatus {
    #[default]
    Pending,
    Accepted,
    Revoked,
}

/// A client's acceptance of one version of a legal document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: AgreementId,
    pub client_id: ClientId,
    pub subscription_id: Option<SubscriptionId>,
    pub document: AgreementDocument,
    pub version: String,
    pub status: AgreementStatus,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub accepted_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Agreement {
    /// Acceptance is stamped once; a revoked agreement keeps its acceptance time.
    fn set_status(&mut self, status: AgreementStatus, now: OffsetDateTime) {
        match status {
            AgreementStatus::Accepted if self.status != AgreementStatus::Accepted => {
                self.accepted_at = Some(now)
            }
            AgreementStatus::Pending => self.accepted_at = None,
            _ => {}
        }
        self.status = status;
    }
}

fn check_signer_email(email: Option<&str>) -> Result<(), CrmError> {
    match email {
        Some(email) if !email.contains('@') => Err(CrmError::validation(format!(
            "'{email}' is not an email address"
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementDraft {
    pub client_id: ClientId,
    pub subscription_id: Option<SubscriptionId>,
    pub document: AgreementDocument,
    pub version: String,
    #[serde(default)]
    pub status: AgreementStatus,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementPatch {
    pub status: Option<AgreementStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub signer_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub signer_email: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementFilter {
    pub client_id: Option<ClientId>,
    pub subscription_id: Option<SubscriptionId>,
    pub document: Option<AgreementDocument>,
    pub status: Option<AgreementStatus>,
}

impl Entity for Agreement {
    const COLLECTION: &'static str = "agreements";
    type Id = AgreementId;

    fn id(&self) -> &AgreementId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Agreement {
    type Draft = AgreementDraft;
    type Filter = AgreementFilter;

    fn from_draft(id: AgreementId, draft: AgreementDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        require_text("version", &draft.version)?;
        check_signer_email(draft.signer_email.as_deref())?;

        let mut agreement = Self {
            id,
            client_id: draft.client_id,
            subscription_id: draft.subscription_id,
            document: draft.document,
            version: draft.version,
            status: AgreementStatus::Pending,
            signer_name: draft.signer_name,
            signer_email: draft.signer_email,
            accepted_at: None,
            created_at: now,
            updated_at: now,
        };
        agreement.set_status(draft.status, now);
        Ok(agreement)
    }

    fn matches(&self, filter: &AgreementFilter) -> bool {
        filter_eq(&filter.client_id, &self.client_id)
            && filter_eq_opt(&filter.subscription_id, self.subscription_id.as_ref())
            && filter_eq(&filter.document, &self.document)
            && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Agreement {
    type Patch = AgreementPatch;

    fn apply_patch(&mut self, patch: AgreementPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(signer_email) = &patch.signer_email {
            check_signer_email(signer_email.as_deref())?;
        }

        if let Some(status) = patch.status {
            self.set_status(status, now);
        }
        if let Some(signer_name) = patch.signer_name {
            self.signer_name = signer_name;
        }
        if let Some(signer_email) = patch.signer_email {
            self.signer_email = signer_email;
        }
        self.updated_at = now;
        Ok(())
    }
}
