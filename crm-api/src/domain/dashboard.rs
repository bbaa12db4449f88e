//! Upcoming / overdue aggregation and per-project overviews.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::Serialize;
use strum::IntoEnumIterator;
use time::{Date, Duration};

use crate::domain::models::{
    Deliverable, DeliverableStatus, Goal, GoalProgress, Milestone, Project, ProjectId, Task,
    TaskStatus,
};

/// How far ahead tasks and deliverables show up.
pub const TASK_WINDOW_DAYS: i64 = 7;
/// How far ahead milestones show up.
pub const MILESTONE_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingKind {
    Task,
    Milestone,
    Deliverable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingItem {
    pub kind: UpcomingKind,
    pub id: String,
    pub title: String,
    pub project_id: ProjectId,
    pub project_name: Option<String>,
    pub due_date: Date,
    pub status: String,
    pub overdue: bool,
    /// Negative when overdue.
    pub days_until: i64,
}

/// Collects everything due soon or already late.
///
/// An item qualifies when its date is before `today` or within the forward
/// window (`today` itself included). Overdue items come first; within each
/// group items are ordered by date, with ties kept in input order.
pub fn build_upcoming_items(
    tasks: &[Task],
    milestones: &[Milestone],
    deliverables: &[Deliverable],
    projects: &[Project],
    today: Date,
) -> Vec<UpcomingItem> {
    let project_names: HashMap<&ProjectId, &str> =
        projects.iter().map(|p| (&p.id, p.name.as_str())).collect();
    let window = |days: i64| today + Duration::days(days);

    let item = |kind, id: &str, title: &str, project_id: &ProjectId, due_date: Date, status: String| {
        let days_until = (due_date - today).whole_days();
        UpcomingItem {
            kind,
            id: id.to_string(),
            title: title.to_string(),
            project_id: project_id.clone(),
            project_name: project_names.get(project_id).map(|name| name.to_string()),
            due_date,
            status,
            overdue: due_date < today,
            days_until,
        }
    };

    let task_items = tasks.iter().filter(|t| !t.status.is_terminal()).filter_map(|t| {
        let due = t.due_date.filter(|due| *due <= window(TASK_WINDOW_DAYS))?;
        Some(item(
            UpcomingKind::Task,
            t.id.as_str(),
            &t.title,
            &t.project_id,
            due,
            t.status.to_string(),
        ))
    });

    let milestone_items = milestones
        .iter()
        .filter(|m| !m.status.is_terminal())
        .filter_map(|m| {
            let due = m
                .target_date
                .filter(|due| *due <= window(MILESTONE_WINDOW_DAYS))?;
            Some(item(
                UpcomingKind::Milestone,
                m.id.as_str(),
                &m.title,
                &m.project_id,
                due,
                m.status.to_string(),
            ))
        });

    let deliverable_items = deliverables
        .iter()
        .filter(|d| d.status != DeliverableStatus::Approved)
        .filter_map(|d| {
            let due = d.due_date.filter(|due| *due <= window(TASK_WINDOW_DAYS))?;
            Some(item(
                UpcomingKind::Deliverable,
                d.id.as_str(),
                &d.title,
                &d.project_id,
                due,
                d.status.to_string(),
            ))
        });

    let mut items: Vec<UpcomingItem> = task_items
        .chain(milestone_items)
        .chain(deliverable_items)
        .collect();

    // Stable: equal keys keep filter order.
    items.sort_by_key(|item| (!item.overdue, item.due_date));
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub project: Project,
    pub task_counts: BTreeMap<TaskStatus, usize>,
    pub completion_percentage: u8,
    pub overdue_tasks: usize,
    pub goals: Vec<GoalProgress>,
}

/// Summarises a project's tasks and goals as of `today`.
pub fn project_overview(project: Project, tasks: &[Task], goals: &[Goal], today: Date) -> ProjectOverview {
    let counts = tasks.iter().map(|t| t.status).counts();
    let task_counts: BTreeMap<TaskStatus, usize> = TaskStatus::iter()
        .map(|status| (status, counts.get(&status).copied().unwrap_or(0)))
        .collect();

    let done = task_counts.get(&TaskStatus::Done).copied().unwrap_or(0);
    let completion_percentage = if tasks.is_empty() {
        0
    } else {
        ((done as f64 / tasks.len() as f64) * 100.0).round() as u8
    };

    ProjectOverview {
        project,
        task_counts,
        completion_percentage,
        overdue_tasks: tasks.iter().filter(|t| t.is_overdue(today)).count(),
        goals: goals.iter().map(Goal::progress).collect(),
    }
}
