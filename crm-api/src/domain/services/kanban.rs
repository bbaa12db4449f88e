use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    kanban::{DropTarget, KanbanBoard},
    models::{Entity, Project, ProjectId, Task, TaskDraft, TaskId, TaskStatus},
    ports::{inbound::KanbanService, outbound::EntityStore},
    CrmError,
};

use super::{timestamp, RecordService};

/// Implementation of the KanbanService inbound port.
///
/// Reorders are targeted: only the moved task is written. There is no version
/// check, so two concurrent moves of the same task are last-write-wins.
pub struct KanbanServiceImpl {
    tasks: RecordService<Task>,
    projects: RecordService<Project>,
}

impl KanbanServiceImpl {
    pub fn new(tasks: Arc<dyn EntityStore<Task>>, projects: Arc<dyn EntityStore<Project>>) -> Self {
        Self {
            tasks: RecordService::new(tasks),
            projects: RecordService::new(projects),
        }
    }

    async fn project_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>, CrmError> {
        self.tasks.list_by_parent(project_id.as_str()).await
    }
}

#[async_trait]
impl KanbanService for KanbanServiceImpl {
    async fn board(&self, project_id: &ProjectId) -> Result<KanbanBoard, CrmError> {
        self.projects.require(project_id).await?;
        let tasks = self.project_tasks(project_id).await?;
        Ok(KanbanBoard::from_tasks(tasks))
    }

    #[tracing::instrument(skip_all, fields(project_id = %draft.project_id))]
    async fn create_task(&self, mut draft: TaskDraft) -> Result<Task, CrmError> {
        if self.projects.get(&draft.project_id).await?.is_none() {
            return Err(CrmError::validation(format!(
                "project {} does not exist",
                draft.project_id
            )));
        }

        if draft.position.is_none() {
            let column_len = self
                .project_tasks(&draft.project_id)
                .await?
                .iter()
                .filter(|t| t.status == draft.status)
                .count();
            draft.position = Some(i32::try_from(column_len).unwrap_or(i32::MAX));
        }

        self.tasks.create(draft).await
    }

    #[tracing::instrument(skip(self))]
    async fn reorder(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        position: i32,
    ) -> Result<Task, CrmError> {
        if position < 0 {
            return Err(CrmError::validation("position must not be negative"));
        }

        let mut task = self.tasks.require(task_id).await?;
        let from = task.status;
        task.status = status;
        task.position = position;
        task.updated_at = timestamp();
        self.tasks.replace(&task).await?;

        tracing::info!(%from, to = %status, position, "reordered task");
        Ok(task)
    }

    async fn move_task(&self, task_id: &TaskId, target: &DropTarget) -> Result<Task, CrmError> {
        let task = self.tasks.require(task_id).await?;
        let board = KanbanBoard::from_tasks(self.project_tasks(&task.project_id).await?);

        let (status, position) = board.resolve_drop(target).ok_or_else(|| match target {
            DropTarget::Task(other) => CrmError::not_found(Task::COLLECTION, other.as_str()),
            DropTarget::Column(_) => CrmError::not_found(Task::COLLECTION, task_id.as_str()),
        })?;

        self.reorder(task_id, status, position).await
    }
}
