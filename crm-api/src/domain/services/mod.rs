mod billing;
mod dashboard;
mod kanban;
mod leads;
mod records;

use time::OffsetDateTime;

pub use billing::{Signup, SignupAgreement, SignupPayment, SignupRequest, SubscriptionSignup};
pub use dashboard::DashboardServiceImpl;
pub use kanban::KanbanServiceImpl;
pub use leads::{ConvertedLead, LeadConversion};
pub use records::RecordService;

/// Current UTC time at microsecond precision, which is what Postgres stores.
pub(crate) fn timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.microsecond() * 1_000)
        .unwrap_or(now)
}
