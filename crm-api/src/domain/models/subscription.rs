use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use super::{
    entity::{filter_eq, text_matches},
    money::check_money,
    ClientId, Editable, Entity, Record, SubscriptionId,
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
pub enum SubscriptionStatus {
    #[default]
    Active,
    PastDue,
    Paused,
    Cancelled,
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
pub enum BillingInterval {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// A recurring service plan billed to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    pub client_id: ClientId,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub amount: f64,
    pub currency: String,
    pub interval: BillingInterval,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Subscription {
    fn validate(&self) -> Result<(), CrmError> {
        require_text("plan", &self.plan)?;
        check_money("subscription", self.amount, &self.currency)?;
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err(CrmError::validation("end date must not precede start date"));
        }
        Ok(())
    }

    fn set_status(&mut self, status: SubscriptionStatus, now: OffsetDateTime) {
        let cancelled = SubscriptionStatus::Cancelled;
        match (self.status == cancelled, status == cancelled) {
            (false, true) => self.cancelled_at = Some(now),
            (true, false) => self.cancelled_at = None,
            _ => {}
        }
        self.status = status;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDraft {
    pub client_id: ClientId,
    pub plan: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub interval: BillingInterval,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPatch {
    pub plan: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<BillingInterval>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<SubscriptionStatus>,
    pub interval: Option<BillingInterval>,
    pub search: Option<String>,
}

impl Entity for Subscription {
    const COLLECTION: &'static str = "subscriptions";
    type Id = SubscriptionId;

    fn id(&self) -> &SubscriptionId {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Record for Subscription {
    type Draft = SubscriptionDraft;
    type Filter = SubscriptionFilter;

    fn from_draft(
        id: SubscriptionId,
        draft: SubscriptionDraft,
        now: OffsetDateTime,
    ) -> Result<Self, CrmError> {
        let subscription = Self {
            id,
            client_id: draft.client_id,
            plan: draft.plan,
            status: SubscriptionStatus::Active,
            amount: draft.amount,
            currency: draft.currency,
            interval: draft.interval,
            start_date: draft.start_date,
            end_date: draft.end_date,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };
        subscription.validate()?;
        Ok(subscription)
    }

    fn matches(&self, filter: &SubscriptionFilter) -> bool {
        filter_eq(&filter.client_id, &self.client_id)
            && filter_eq(&filter.status, &self.status)
            && filter_eq(&filter.interval, &self.interval)
            && text_matches(filter.search.as_deref(), [Some(self.plan.as_str())])
    }
}

impl Editable for Subscription {
    type Patch = SubscriptionPatch;

    fn apply_patch(&mut self, patch: SubscriptionPatch, now: OffsetDateTime) -> Result<(), CrmError> {
        let mut next = self.clone();
        if let Some(plan) = patch.plan {
            next.plan = plan;
        }
        if let Some(status) = patch.status {
            next.set_status(status, now);
        }
        if let Some(amount) = patch.amount {
            next.amount = amount;
        }
        if let Some(currency) = patch.currency {
            next.currency = currency;
        }
        if let Some(interval) = patch.interval {
            next.interval = interval;
        }
        if let Some(end_date) = patch.end_date {
            next.end_date = end_date;
        }
        next.validate()?;

        next.updated_at = now;
        *self = next;
        Ok(())
    }
}
