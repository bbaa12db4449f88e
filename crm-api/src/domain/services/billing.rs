use serde::{Deserialize, Serialize};

use crate::domain::{
    models::{
        Agreement, AgreementDocument, AgreementDraft, AgreementStatus, Payment, PaymentDraft,
        PaymentStatus, Subscription, SubscriptionDraft,
    },
    CrmError,
};

use super::RecordService;

/// A new subscription with its first payment and the documents accepted at checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub subscription: SubscriptionDraft,
    pub payment: Option<SignupPayment>,
    #[serde(default)]
    pub agreements: Vec<SignupAgreement>,
}

/// The first charge. Amount and currency are taken from the subscription.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayment {
    #[serde(default)]
    pub status: PaymentStatus,
    pub method: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupAgreement {
    pub document: AgreementDocument,
    pub version: String,
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    pub subscription: Subscription,
    pub payment: Option<Payment>,
    pub agreements: Vec<Agreement>,
}

/// Records a checkout: subscription, then payment, then agreements.
///
/// Each record is its own write. When a later step fails, the records created
/// before it stay in place and the error is returned.
#[derive(Clone)]
pub struct SubscriptionSignup {
    subscriptions: RecordService<Subscription>,
    payments: RecordService<Payment>,
    agreements: RecordService<Agreement>,
}

impl SubscriptionSignup {
    pub fn new(
        subscriptions: RecordService<Subscription>,
        payments: RecordService<Payment>,
        agreements: RecordService<Agreement>,
    ) -> Self {
        Self {
            subscriptions,
            payments,
            agreements,
        }
    }

    #[tracing::instrument(skip_all, fields(client_id = %request.subscription.client_id))]
    pub async fn sign_up(&self, request: SignupRequest) -> Result<Signup, CrmError> {
        let subscription = self.subscriptions.create(request.subscription).await?;

        let rest = self
            .record_checkout(&subscription, request.payment, request.agreements)
            .await;
        let (payment, agreements) = rest.inspect_err(|err| {
            tracing::warn!(
                subscription_id = %subscription.id,
                error = %err,
                "signup stopped after the subscription was created"
            );
        })?;

        Ok(Signup {
            subscription,
            payment,
            agreements,
        })
    }

    async fn record_checkout(
        &self,
        subscription: &Subscription,
        payment: Option<SignupPayment>,
        agreements: Vec<SignupAgreement>,
    ) -> Result<(Option<Payment>, Vec<Agreement>), CrmError> {
        let payment = match payment {
            Some(payment) => {
                let draft = PaymentDraft {
                    subscription_id: subscription.id.clone(),
                    amount: subscription.amount,
                    currency: subscription.currency.clone(),
                    status: payment.status,
                    method: payment.method,
                    reference: payment.reference,
                };
                Some(self.payments.create(draft).await?)
            }
            None => None,
        };

        let mut accepted = Vec::with_capacity(agreements.len());
        for agreement in agreements {
            let draft = AgreementDraft {
                client_id: subscription.client_id.clone(),
                subscription_id: Some(subscription.id.clone()),
                document: agreement.document,
                version: agreement.version,
                status: AgreementStatus::Accepted,
                signer_name: agreement.signer_name,
                signer_email: agreement.signer_email,
            };
            accepted.push(self.agreements.create(draft).await?);
        }

        Ok((payment, accepted))
    }
}
