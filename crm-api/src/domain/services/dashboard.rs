use std::sync::Arc;

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    dashboard::{build_upcoming_items, project_overview, ProjectOverview, UpcomingItem},
    models::{Deliverable, Goal, Milestone, Project, ProjectFilter, ProjectId, Task},
    ports::{inbound::DashboardService, outbound::EntityStore},
    repositories::Repositories,
    CrmError,
};

use super::RecordService;

/// Implementation of the DashboardService inbound port.
pub struct DashboardServiceImpl {
    projects: RecordService<Project>,
    tasks: Arc<dyn EntityStore<Task>>,
    milestones: Arc<dyn EntityStore<Milestone>>,
    goals: Arc<dyn EntityStore<Goal>>,
    deliverables: Arc<dyn EntityStore<Deliverable>>,
}

impl DashboardServiceImpl {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            projects: RecordService::new(repositories.projects.clone()),
            tasks: repositories.tasks.clone(),
            milestones: repositories.milestones.clone(),
            goals: repositories.goals.clone(),
            deliverables: repositories.deliverables.clone(),
        }
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    #[tracing::instrument(skip(self))]
    async fn upcoming(&self, today: Date) -> Result<Vec<UpcomingItem>, CrmError> {
        let all_projects = ProjectFilter::default();
        let (tasks, milestones, deliverables, projects) = tokio::try_join!(
            self.tasks.get_all(),
            self.milestones.get_all(),
            self.deliverables.get_all(),
            self.projects.list(&all_projects),
        )?;

        let items = build_upcoming_items(&tasks, &milestones, &deliverables, &projects, today);
        tracing::debug!(count = items.len(), "collected upcoming items");
        Ok(items)
    }

    async fn project_overview(
        &self,
        project_id: &ProjectId,
        today: Date,
    ) -> Result<ProjectOverview, CrmError> {
        let project = self.projects.require(project_id).await?;
        let (tasks, goals) = tokio::try_join!(
            self.tasks.get_by_parent(project_id.as_str()),
            self.goals.get_by_parent(project_id.as_str()),
        )?;

        Ok(project_overview(project, &tasks, &goals, today))
    }
}
