//! Kanban service port (inbound).

use async_trait::async_trait;

use crate::domain::{
    kanban::{DropTarget, KanbanBoard},
    models::{ProjectId, Task, TaskDraft, TaskId, TaskStatus},
    CrmError,
};

#[async_trait]
pub trait KanbanService: Send + Sync + 'static {
    /// The project's tasks, one column per status.
    async fn board(&self, project_id: &ProjectId) -> Result<KanbanBoard, CrmError>;

    /// Creates a task, appending it to its column when no position is given.
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, CrmError>;

    /// Sets the task's status and position. Other tasks are not renumbered.
    async fn reorder(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        position: i32,
    ) -> Result<Task, CrmError>;

    /// Applies a drag-and-drop gesture by resolving the drop target first.
    async fn move_task(&self, task_id: &TaskId, target: &DropTarget) -> Result<Task, CrmError>;
}
