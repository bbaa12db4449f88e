//! Dashboard service port (inbound).

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    dashboard::{ProjectOverview, UpcomingItem},
    models::ProjectId,
    CrmError,
};

#[async_trait]
pub trait DashboardService: Send + Sync + 'static {
    /// Tasks, milestones and deliverables that are overdue or due soon, as of `today`.
    async fn upcoming(&self, today: Date) -> Result<Vec<UpcomingItem>, CrmError>;

    async fn project_overview(
        &self,
        project_id: &ProjectId,
        today: Date,
    ) -> Result<ProjectOverview, CrmError>;
}
