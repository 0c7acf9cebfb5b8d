use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;

pub type TaskId = String;
pub type ProjectId = String;
pub type AreaId = String;
pub type TagId = String;
pub type ChecklistItemId = String;

/// Generates a fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Where a task currently lives in the GTD flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Inbox,
    Today,
    /// Reserved for schema compatibility. Nothing assigns it and no view
    /// predicate selects on it.
    Scheduled,
    Anytime,
    Someday,
    Completed,
    Trash,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 7] = [
        TaskStatus::Inbox,
        TaskStatus::Today,
        TaskStatus::Scheduled,
        TaskStatus::Anytime,
        TaskStatus::Someday,
        TaskStatus::Completed,
        TaskStatus::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Inbox => "inbox",
            TaskStatus::Today => "today",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Anytime => "anytime",
            TaskStatus::Someday => "someday",
            TaskStatus::Completed => "completed",
            TaskStatus::Trash => "trash",
        }
    }

    /// Completed and trashed tasks are out of the active flow.
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Trash)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| ParseNameError::new("status", s))
    }
}

/// The selectable lists of the application.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Inbox,
    Today,
    Upcoming,
    Anytime,
    Someday,
    Logbook,
    Trash,
    Project,
    Area,
    Tag,
}

impl ViewType {
    /// Views that need no scope id, in sidebar order.
    pub const FIXED: [ViewType; 7] = [
        ViewType::Inbox,
        ViewType::Today,
        ViewType::Upcoming,
        ViewType::Anytime,
        ViewType::Someday,
        ViewType::Logbook,
        ViewType::Trash,
    ];

    pub const ALL: [ViewType; 10] = [
        ViewType::Inbox,
        ViewType::Today,
        ViewType::Upcoming,
        ViewType::Anytime,
        ViewType::Someday,
        ViewType::Logbook,
        ViewType::Trash,
        ViewType::Project,
        ViewType::Area,
        ViewType::Tag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Inbox => "inbox",
            ViewType::Today => "today",
            ViewType::Upcoming => "upcoming",
            ViewType::Anytime => "anytime",
            ViewType::Someday => "someday",
            ViewType::Logbook => "logbook",
            ViewType::Trash => "trash",
            ViewType::Project => "project",
            ViewType::Area => "area",
            ViewType::Tag => "tag",
        }
    }

    /// Human readable name used as a heading.
    pub fn label(&self) -> &'static str {
        match self {
            ViewType::Inbox => "Inbox",
            ViewType::Today => "Today",
            ViewType::Upcoming => "Upcoming",
            ViewType::Anytime => "Anytime",
            ViewType::Someday => "Someday",
            ViewType::Logbook => "Logbook",
            ViewType::Trash => "Trash",
            ViewType::Project => "Project",
            ViewType::Area => "Area",
            ViewType::Tag => "Tag",
        }
    }

    /// Project, area and tag views select on a scope id.
    pub fn is_scoped(&self) -> bool {
        matches!(self, ViewType::Project | ViewType::Area | ViewType::Tag)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ViewType::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| ParseNameError::new("view", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for RepeatKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RepeatKind::Daily),
            "weekly" => Ok(RepeatKind::Weekly),
            "monthly" => Ok(RepeatKind::Monthly),
            "yearly" => Ok(RepeatKind::Yearly),
            _ => Err(ParseNameError::new("repeat rule", s)),
        }
    }
}

/// Repetition descriptor. Stored and round-tripped as-is; never expanded
/// into occurrences.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    #[serde(rename = "type")]
    pub kind: RepeatKind,
    /// Number of periods between occurrences.
    pub interval: u32,
    /// 0-6, weekly rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    /// 1-31, monthly rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Represents a single task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Weak reference; may point at a project that no longer exists.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Weak reference; may point at an area that no longer exists.
    #[serde(default)]
    pub area_id: Option<AreaId>,
    /// Tag ids in insertion order.
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub repeat_rule: Option<RepeatRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly while `status` is `Completed`.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Relative position inside manually ordered views.
    #[serde(default)]
    pub order: f64,
}

impl Task {
    /// Builds an inbox task with default fields and a fresh id.
    pub fn new(title: impl Into<String>) -> Task {
        let now = Utc::now();
        Task {
            id: new_id(),
            title: title.into(),
            notes: String::new(),
            status: TaskStatus::Inbox,
            project_id: None,
            area_id: None,
            tags: Vec::new(),
            checklist: Vec::new(),
            scheduled_date: None,
            deadline: None,
            repeat_rule: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            order: 0.0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t == tag_id)
    }

    /// Returns `(done, total)` for the checklist.
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|i| i.completed).count();
        (done, self.checklist.len())
    }

    /// A deadline strictly before `today` on a task still in the flow.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.deadline.is_some_and(|d| d < today)
    }

    /// Case-insensitive substring match on title or notes.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q) || self.notes.to_lowercase().contains(&q)
    }
}

/// A multi-step outcome that tasks reference by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Area {
    pub id: AreaId,
    pub title: String,
    #[serde(default)]
    pub order: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
}

/// The whole persisted state: entity collections plus UI selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub areas: Vec<Area>,
    pub tags: Vec<Tag>,
    pub current_view: ViewType,
    /// Scope id (project, area or tag) of the current view.
    pub selected_item_id: Option<String>,
    pub selected_task_id: Option<TaskId>,
    pub sidebar_collapsed: bool,
    pub search_query: String,
    pub is_quick_entry_open: bool,
}

/// Field values for a new task. Unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub notes: String,
    pub status: TaskStatus,
    pub project_id: Option<ProjectId>,
    pub area_id: Option<AreaId>,
    pub tags: Vec<TagId>,
    pub checklist: Vec<ChecklistItem>,
    pub scheduled_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub repeat_rule: Option<RepeatRule>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> NewTask {
        NewTask { title: title.into(), ..Default::default() }
    }
}

/// Partial update for a task. `None` leaves a field untouched; for nullable
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: Option<TaskStatus>,
    pub project_id: Option<Option<ProjectId>>,
    pub area_id: Option<Option<AreaId>>,
    pub tags: Option<Vec<TagId>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub scheduled_date: Option<Option<NaiveDate>>,
    pub deadline: Option<Option<NaiveDate>>,
    pub repeat_rule: Option<Option<RepeatRule>>,
    pub order: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ChecklistItemPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub notes: String,
    pub area_id: Option<AreaId>,
    pub tags: Vec<TagId>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub area_id: Option<Option<AreaId>>,
    pub tags: Option<Vec<TagId>>,
    pub deadline: Option<Option<NaiveDate>>,
    pub order: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct AreaPatch {
    pub title: Option<String>,
    pub order: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}
