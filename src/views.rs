//! Derivation of the visible task lists.
//!
//! Everything here is a pure function of the task collection, the selected
//! view and its scope id. Nothing is cached; callers re-derive after each
//! mutation.

use chrono::{Local, NaiveDate};

use crate::models::{AppState, Project, Task, TaskStatus, ViewType};

/// The local calendar date used as "today" for date predicates.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether `task` belongs to `view`.
///
/// Scoped views (project, area, tag) without a scope id match nothing.
pub fn belongs_to(task: &Task, view: ViewType, scope: Option<&str>, today: NaiveDate) -> bool {
    match view {
        ViewType::Inbox => task.status == TaskStatus::Inbox && task.project_id.is_none(),
        ViewType::Today => {
            task.status == TaskStatus::Today
                || (!task.status.is_closed() && task.scheduled_date.is_some_and(|d| d <= today))
        }
        ViewType::Upcoming => task.scheduled_date.is_some() && !task.status.is_closed(),
        ViewType::Anytime => task.status == TaskStatus::Anytime,
        ViewType::Someday => task.status == TaskStatus::Someday,
        ViewType::Logbook => task.status == TaskStatus::Completed,
        ViewType::Trash => task.status == TaskStatus::Trash,
        ViewType::Project => {
            scope.is_some() && task.project_id.as_deref() == scope && task.status != TaskStatus::Trash
        }
        ViewType::Area => {
            scope.is_some() && task.area_id.as_deref() == scope && task.status != TaskStatus::Trash
        }
        ViewType::Tag => scope.is_some_and(|id| task.has_tag(id)) && task.status != TaskStatus::Trash,
    }
}

/// Resolves the tasks of `view`.
///
/// Upcoming is sorted by scheduled date ascending, logbook by completion
/// time descending; every other view keeps collection order. A scoped view
/// (project, area, tag) with `scope == None` resolves to an empty list.
pub fn resolve<'a>(
    tasks: &'a [Task],
    view: ViewType,
    scope: Option<&str>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| belongs_to(t, view, scope, today)).collect();
    match view {
        ViewType::Upcoming => out.sort_by_key(|t| t.scheduled_date),
        ViewType::Logbook => out.sort_by(|a, b| b.completed_at.cmp(&a.completed_at)),
        _ => {}
    }
    out
}

/// Whether the view carries its own sort instead of manual order.
pub fn has_intrinsic_order(view: ViewType) -> bool {
    matches!(view, ViewType::Upcoming | ViewType::Logbook)
}

/// The list as displayed: resolved, filtered by `query` when non-empty,
/// then sorted by manual order unless the view sorts itself.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    view: ViewType,
    scope: Option<&str>,
    query: &str,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let mut out = resolve(tasks, view, scope, today);
    if !query.is_empty() {
        out.retain(|t| t.matches_query(query));
    }
    if !has_intrinsic_order(view) {
        out.sort_by(|a, b| a.order.total_cmp(&b.order));
    }
    out
}

/// Sidebar badge for a view, or `None` when the view shows no badge.
///
/// Project and tag badges count only open tasks.
pub fn badge_count(tasks: &[Task], view: ViewType, scope: Option<&str>, today: NaiveDate) -> Option<usize> {
    match view {
        ViewType::Inbox | ViewType::Today | ViewType::Upcoming => {
            Some(tasks.iter().filter(|t| belongs_to(t, view, scope, today)).count())
        }
        ViewType::Project | ViewType::Tag => Some(
            tasks
                .iter()
                .filter(|t| !t.status.is_closed() && belongs_to(t, view, scope, today))
                .count(),
        ),
        _ => None,
    }
}

/// Heading for a view. A dangling scope falls back to the view's label.
pub fn view_title(state: &AppState, view: ViewType, scope: Option<&str>) -> String {
    let scoped = scope.and_then(|id| match view {
        ViewType::Project => state.projects.iter().find(|p| p.id == id).map(|p| p.title.clone()),
        ViewType::Area => state.areas.iter().find(|a| a.id == id).map(|a| a.title.clone()),
        ViewType::Tag => state.tags.iter().find(|t| t.id == id).map(|t| t.name.clone()),
        _ => None,
    });
    scoped.unwrap_or_else(|| view.label().to_string())
}

/// Projects not yet completed, in manual order.
pub fn active_projects(projects: &[Project]) -> Vec<&Project> {
    let mut out: Vec<&Project> = projects.iter().filter(|p| p.completed_at.is_none()).collect();
    out.sort_by(|a, b| a.order.total_cmp(&b.order));
    out
}
