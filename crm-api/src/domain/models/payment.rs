use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{entity::filter_eq, money::check_money, Editable, Entity, PaymentId, Record, SubscriptionId};
use crate::domain::CrmError;

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
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Whether money has changed hands, including payments refunded afterwards.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Refunded)
    }
}

/// A charge against a subscription. Amount and currency are fixed once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub method: Option<String>,
    /// Processor reference, e.g. a checkout session id.
    pub reference: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Payment {
    fn set_status(&mut self, status: PaymentStatus, now: OffsetDateTime) {
        match (self.status.is_settled(), status.is_settled()) {
            (false, true) => self.paid_at = Some(now),
            (true, false) => self.paid_at = None,
            _ => {}
        }
        self.status = status;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub subscription_id: SubscriptionId,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    pub method: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub method: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reference: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    pub subscription_id: Option<SubscriptionId>,
    pub status: Option<PaymentStatus>,
}

impl Entity for Payment {
    const COLLECTION: &'static str = "payments";
    type Id = PaymentId;

    fn id(&self) -> &PaymentId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.subscription_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Payment {
    type Draft = PaymentDraft;
    type Filter = PaymentFilter;

    fn from_draft(id: PaymentId, draft: PaymentDraft, now: OffsetDateTime) -> Result<Self, CrmError> {
        check_money("payment", draft.amount, &draft.currency)?;

        let mut payment = Self {
            id,
            subscription_id: draft.subscription_id,
            amount: draft.amount,
            currency: draft.currency,
            status: PaymentStatus::Pending,
            method: draft.method,
            reference: draft.reference,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        payment.set_status(draft.status, now);
        Ok(payment)
    }

    fn matches(&self, filter: &PaymentFilter) -> bool {
        filter_eq(&filter.subscription_id, &self.subscription_id)
            && filter_eq(&filter.status, &self.status)
    }
}

impl Editable for Payment {
    type Patch = PaymentPatch;

    fn apply_patch(&mut self, patch: PaymentPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        if let Some(status) = patch.status {
            self.set_status(status, now);
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(reference) = patch.reference {
            self.reference = reference;
        }
        self.updated_at = now;
        Ok(())
    }
}
