use serde::Serialize;

use crate::domain::{
    models::{Client, Lead, LeadId},
    CrmError,
};

use super::{timestamp, RecordService};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedLead {
    pub lead: Lead,
    pub client: Client,
}

/// Turns a won lead into a client record.
#[derive(Clone)]
pub struct LeadConversion {
    leads: RecordService<Lead>,
    clients: RecordService<Client>,
}

impl LeadConversion {
    pub fn new(leads: RecordService<Lead>, clients: RecordService<Client>) -> Self {
        Self { leads, clients }
    }

    /// Creates a client from the lead's contact details and marks the lead won.
    ///
    /// A lead converts at most once.
    #[tracing::instrument(skip(self))]
    pub async fn convert(&self, lead_id: &LeadId) -> Result<ConvertedLead, CrmError> {
        let mut lead = self.leads.require(lead_id).await?;
        if let Some(client_id) = &lead.converted_client_id {
            return Err(CrmError::Conflict(format!(
                "lead {lead_id} was already converted to client {client_id}"
            )));
        }

        let client = self.clients.create(lead.client_draft()).await?;
        lead.mark_converted(client.id.clone(), timestamp());
        self.leads.replace(&lead).await?;

        tracing::info!(client_id = %client.id, "converted lead");
        Ok(ConvertedLead { lead, client })
    }
}
