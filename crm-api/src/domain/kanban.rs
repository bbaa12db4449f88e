//! Kanban board ordering.
//!
//! A board is a project's tasks partitioned by status, each column ranked by
//! `position`. Placement is append-only: moving a task gives it the length of
//! the destination column and never renumbers the siblings.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::domain::models::{Task, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
}

/// Where a dragged task was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropTarget {
    /// Dropped onto an empty area of a column.
    Column(TaskStatus),
    /// Dropped onto another task card; the task lands in that card's column.
    Task(TaskId),
}

impl KanbanBoard {
    /// Builds a board with one column per status, in stage order.
    ///
    /// Ties on `position` are broken by creation time, so the earliest
    /// inserted task wins.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: Vec<KanbanColumn> = TaskStatus::iter()
            .map(|status| KanbanColumn {
                status,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }

        for column in &mut columns {
            column
                .tasks
                .sort_by(|a, b| (a.position, a.created_at).cmp(&(b.position, b.created_at)));
        }

        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.tasks.as_slice())
            .unwrap_or_default()
    }

    pub fn find(&self, task_id: &TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| &t.id == task_id)
    }

    /// Maps a drop target to the `(status, position)` the dragged task should get.
    ///
    /// Returns `None` when the target task is not on this board.
    pub fn resolve_drop(&self, target: &DropTarget) -> Option<(TaskStatus, i32)> {
        let status = match target {
            DropTarget::Column(status) => *status,
            DropTarget::Task(task_id) => self.find(task_id)?.status,
        };
        let position = i32::try_from(self.column(status).len()).unwrap_or(i32::MAX);
        Some((status, position))
    }
}
