//! The single owner of application state and its only writer.
//!
//! Every mutation runs to completion against the in-memory collections and
//! then mirrors the whole state into the attached [`Storage`] slot. Lookups
//! by id never fail: an unknown id turns the operation into a no-op, so
//! callers holding a stale id (for example after a delete) can keep issuing
//! calls safely.
//!
//! All mutating methods take `&mut self`; sharing a store between threads
//! requires a single lock around it.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::models::{
    new_id, AppState, Area, AreaId, AreaPatch, ChecklistItem, ChecklistItemId,
    ChecklistItemPatch, NewProject, NewTask, Project, ProjectId, ProjectPatch, Tag, TagId,
    TagPatch, Task, TaskId, TaskPatch, TaskStatus, ViewType,
};
use crate::palette::pick_tag_color;
use crate::storage::Storage;
use crate::views;

const DEFAULT_PROJECT_TITLE: &str = "New Project";

pub struct Store {
    state: AppState,
    storage: Option<Box<dyn Storage>>,
}

impl Default for Store {
    fn default() -> Self {
        Store::in_memory()
    }
}

/// `max(orders) + 1`, or `1` for an empty collection.
fn next_order(orders: impl Iterator<Item = f64>) -> f64 {
    orders.fold(None, |acc: Option<f64>, o| Some(acc.map_or(o, |a| a.max(o)))).unwrap_or(0.0) + 1.0
}

/// Moves a task to `status`, keeping `completed_at` set exactly while completed.
fn transition(task: &mut Task, status: TaskStatus, now: DateTime<Utc>) {
    if status == TaskStatus::Completed {
        if task.status != TaskStatus::Completed || task.completed_at.is_none() {
            task.completed_at = Some(now);
        }
    } else {
        task.completed_at = None;
    }
    task.status = status;
}

fn apply_task_patch(task: &mut Task, patch: TaskPatch, now: DateTime<Utc>) {
    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(notes) = patch.notes {
        task.notes = notes;
    }
    if let Some(status) = patch.status {
        transition(task, status, now);
    }
    if let Some(project_id) = patch.project_id {
        task.project_id = project_id;
    }
    if let Some(area_id) = patch.area_id {
        task.area_id = area_id;
    }
    if let Some(tags) = patch.tags {
        task.tags = dedup_ids(tags);
    }
    if let Some(checklist) = patch.checklist {
        task.checklist = checklist;
    }
    if let Some(date) = patch.scheduled_date {
        task.scheduled_date = date;
    }
    if let Some(deadline) = patch.deadline {
        task.deadline = deadline;
    }
    if let Some(rule) = patch.repeat_rule {
        task.repeat_rule = rule;
    }
    if let Some(order) = patch.order {
        task.order = order;
    }
    task.updated_at = now;
}

/// Tag sets keep first-insertion order and hold each id once.
fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl Store {
    /// A store with empty state and no persistence.
    pub fn in_memory() -> Store {
        Store { state: AppState::default(), storage: None }
    }

    /// A store seeded with `state` and no persistence.
    pub fn from_state(state: AppState) -> Store {
        Store { state, storage: None }
    }

    /// Loads the state from `storage` once and keeps it attached for saves.
    ///
    /// A missing or unreadable slot yields the empty default state.
    pub fn open<S: Storage + 'static>(storage: S) -> Store {
        let state = match storage.load() {
            Ok(Some(state)) => {
                info!(
                    tasks = state.tasks.len(),
                    projects = state.projects.len(),
                    areas = state.areas.len(),
                    tags = state.tags.len(),
                    "state loaded"
                );
                state
            }
            Ok(None) => {
                info!("no saved state, starting empty");
                AppState::default()
            }
            Err(e) => {
                warn!(error = %e, "saved state unreadable, starting empty");
                AppState::default()
            }
        };
        Store { state, storage: Some(Box::new(storage)) }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Best-effort write of the whole state to the attached slot.
    fn commit(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&self.state) {
                warn!(error = %e, "failed to persist state");
            }
        }
    }

    fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.state.tasks.iter_mut().find(|t| t.id == id)
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.state.projects.iter_mut().find(|p| p.id == id)
    }

    // ----- reads -----

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn areas(&self) -> &[Area] {
        &self.state.areas
    }

    pub fn tags(&self) -> &[Tag] {
        &self.state.tags
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.id == id)
    }

    pub fn area(&self, id: &str) -> Option<&Area> {
        self.state.areas.iter().find(|a| a.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.state.tags.iter().find(|t| t.id == id)
    }

    /// The task's project, or `None` when unset or dangling.
    pub fn project_of(&self, task: &Task) -> Option<&Project> {
        task.project_id.as_deref().and_then(|id| self.project(id))
    }

    /// The task's area, or `None` when unset or dangling.
    pub fn area_of(&self, task: &Task) -> Option<&Area> {
        task.area_id.as_deref().and_then(|id| self.area(id))
    }

    /// Resolved tags of a task in display order; dangling ids are skipped.
    pub fn tags_of(&self, task: &Task) -> Vec<&Tag> {
        task.tags.iter().filter_map(|id| self.tag(id)).collect()
    }

    /// Tasks of `view` as the list shows them, using the active search query.
    pub fn view_tasks(&self, view: ViewType, scope: Option<&str>) -> Vec<&Task> {
        views::visible_tasks(
            &self.state.tasks,
            view,
            scope,
            &self.state.search_query,
            views::today(),
        )
    }

    /// Tasks of the currently selected view.
    pub fn current_view_tasks(&self) -> Vec<&Task> {
        self.view_tasks(self.state.current_view, self.state.selected_item_id.as_deref())
    }

    // ----- tasks -----

    /// Adds a task and returns its id.
    pub fn add_task(&mut self, new: NewTask) -> TaskId {
        let now = Utc::now();
        let id = new_id();
        let order = next_order(self.state.tasks.iter().map(|t| t.order));
        let task = Task {
            id: id.clone(),
            title: new.title,
            notes: new.notes,
            status: new.status,
            project_id: new.project_id,
            area_id: new.area_id,
            tags: dedup_ids(new.tags),
            checklist: new.checklist,
            scheduled_date: new.scheduled_date,
            deadline: new.deadline,
            repeat_rule: new.repeat_rule,
            created_at: now,
            updated_at: now,
            completed_at: (new.status == TaskStatus::Completed).then_some(now),
            order,
        };
        debug!(task_id = %id, status = %task.status, order, "task added");
        self.state.tasks.push(task);
        self.commit();
        id
    }

    /// Merges `patch` into the task with `id`.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let now = Utc::now();
        match self.task_mut(id) {
            Some(task) => apply_task_patch(task, patch, now),
            None => debug!(task_id = id, "update_task: no such task"),
        }
        self.commit();
    }

    /// Removes the task outright.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            debug!(task_id = id, "delete_task: no such task");
        }
        if self.state.selected_task_id.as_deref() == Some(id) {
            self.state.selected_task_id = None;
        }
        self.commit();
    }

    fn set_status(&mut self, id: &str, status: TaskStatus) {
        let now = Utc::now();
        match self.task_mut(id) {
            Some(task) => {
                transition(task, status, now);
                task.updated_at = now;
            }
            None => debug!(task_id = id, %status, "status change: no such task"),
        }
        self.commit();
    }

    /// Soft delete: the task stays recoverable until the trash is emptied.
    pub fn move_task_to_trash(&mut self, id: &str) {
        self.set_status(id, TaskStatus::Trash);
    }

    /// Brings a task back into the inbox, whatever its status was.
    pub fn restore_task(&mut self, id: &str) {
        self.set_status(id, TaskStatus::Inbox);
    }

    /// Marks the task completed now, overwriting any prior status.
    pub fn complete_task(&mut self, id: &str) {
        let now = Utc::now();
        match self.task_mut(id) {
            Some(task) => {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(now);
                task.updated_at = now;
            }
            None => debug!(task_id = id, "complete_task: no such task"),
        }
        self.commit();
    }

    /// Sends the task back to the inbox and clears its completion time.
    ///
    /// Applies to tasks that are not completed as well; their `updated_at`
    /// is refreshed all the same.
    pub fn uncomplete_task(&mut self, id: &str) {
        self.set_status(id, TaskStatus::Inbox);
    }

    /// Assigns `order = index` to every listed task. Unknown ids are skipped.
    pub fn reorder_tasks<I, S>(&mut self, ordered_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let now = Utc::now();
        for (index, id) in ordered_ids.into_iter().enumerate() {
            let id = id.as_ref();
            match self.task_mut(id) {
                Some(task) => {
                    task.order = index as f64;
                    task.updated_at = now;
                }
                None => debug!(task_id = id, "reorder_tasks: skipping unknown id"),
            }
        }
        self.commit();
    }

    /// Hard-removes every completed task.
    pub fn clear_completed(&mut self) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.status != TaskStatus::Completed);
        info!(removed = before - self.state.tasks.len(), "completed tasks cleared");
        self.commit();
    }

    /// Hard-removes every trashed task.
    pub fn empty_trash(&mut self) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.status != TaskStatus::Trash);
        info!(removed = before - self.state.tasks.len(), "trash emptied");
        self.commit();
    }

    // ----- checklist -----

    /// Appends an unchecked item. Returns its id, or `None` if the task is unknown.
    pub fn add_checklist_item(&mut self, task_id: &str, title: &str) -> Option<ChecklistItemId> {
        let now = Utc::now();
        let added = self.task_mut(task_id).map(|task| {
            let id = new_id();
            task.checklist.push(ChecklistItem {
                id: id.clone(),
                title: title.to_string(),
                completed: false,
            });
            task.updated_at = now;
            id
        });
        if added.is_none() {
            debug!(task_id, "add_checklist_item: no such task");
        }
        self.commit();
        added
    }

    /// Runs `f` on the item, re-stamping the parent task. No-op on a miss.
    fn with_checklist_item<F>(&mut self, task_id: &str, item_id: &str, f: F)
    where
        F: FnOnce(&mut ChecklistItem),
    {
        let now = Utc::now();
        let hit = self.task_mut(task_id).is_some_and(|task| {
            match task.checklist.iter_mut().find(|i| i.id == item_id) {
                Some(item) => {
                    f(item);
                    task.updated_at = now;
                    true
                }
                None => false,
            }
        });
        if !hit {
            debug!(task_id, item_id, "checklist item not found");
        }
        self.commit();
    }

    pub fn update_checklist_item(&mut self, task_id: &str, item_id: &str, patch: ChecklistItemPatch) {
        self.with_checklist_item(task_id, item_id, |item| {
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(completed) = patch.completed {
                item.completed = completed;
            }
        });
    }

    pub fn toggle_checklist_item(&mut self, task_id: &str, item_id: &str) {
        self.with_checklist_item(task_id, item_id, |item| item.completed = !item.completed);
    }

    pub fn delete_checklist_item(&mut self, task_id: &str, item_id: &str) {
        let now = Utc::now();
        let hit = self.task_mut(task_id).is_some_and(|task| {
            let before = task.checklist.len();
            task.checklist.retain(|i| i.id != item_id);
            let removed = task.checklist.len() != before;
            if removed {
                task.updated_at = now;
            }
            removed
        });
        if !hit {
            debug!(task_id, item_id, "delete_checklist_item: not found");
        }
        self.commit();
    }

    // ----- projects -----

    /// Adds a project and returns its id. An empty title gets a placeholder.
    pub fn add_project(&mut self, new: NewProject) -> ProjectId {
        let now = Utc::now();
        let id = new_id();
        let order = next_order(self.state.projects.iter().map(|p| p.order));
        let title = if new.title.is_empty() { DEFAULT_PROJECT_TITLE.to_string() } else { new.title };
        self.state.projects.push(Project {
            id: id.clone(),
            title,
            notes: new.notes,
            area_id: new.area_id,
            tags: dedup_ids(new.tags),
            deadline: new.deadline,
            created_at: now,
            updated_at: now,
            completed_at: None,
            order,
        });
        debug!(project_id = %id, order, "project added");
        self.commit();
        id
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) {
        let now = Utc::now();
        match self.project_mut(id) {
            Some(project) => {
                if let Some(title) = patch.title {
                    project.title = title;
                }
                if let Some(notes) = patch.notes {
                    project.notes = notes;
                }
                if let Some(area_id) = patch.area_id {
                    project.area_id = area_id;
                }
                if let Some(tags) = patch.tags {
                    project.tags = dedup_ids(tags);
                }
                if let Some(deadline) = patch.deadline {
                    project.deadline = deadline;
                }
                if let Some(order) = patch.order {
                    project.order = order;
                }
                project.updated_at = now;
            }
            None => debug!(project_id = id, "update_project: no such project"),
        }
        self.commit();
    }

    /// Stamps the project as completed. Its tasks are left alone.
    pub fn complete_project(&mut self, id: &str) {
        let now = Utc::now();
        match self.project_mut(id) {
            Some(project) => {
                project.completed_at = Some(now);
                project.updated_at = now;
            }
            None => debug!(project_id = id, "complete_project: no such project"),
        }
        self.commit();
    }

    /// Removes the project and detaches its tasks. Task status is untouched.
    pub fn delete_project(&mut self, id: &str) {
        let now = Utc::now();
        self.state.projects.retain(|p| p.id != id);
        let mut detached = 0;
        for task in self.state.tasks.iter_mut().filter(|t| t.project_id.as_deref() == Some(id)) {
            task.project_id = None;
            task.updated_at = now;
            detached += 1;
        }
        self.clear_selection_of(ViewType::Project, id);
        debug!(project_id = id, detached, "project deleted");
        self.commit();
    }

    // ----- areas -----

    pub fn add_area(&mut self, title: &str) -> AreaId {
        let id = new_id();
        let order = next_order(self.state.areas.iter().map(|a| a.order));
        self.state.areas.push(Area { id: id.clone(), title: title.to_string(), order });
        debug!(area_id = %id, order, "area added");
        self.commit();
        id
    }

    pub fn update_area(&mut self, id: &str, patch: AreaPatch) {
        match self.state.areas.iter_mut().find(|a| a.id == id) {
            Some(area) => {
                if let Some(title) = patch.title {
                    area.title = title;
                }
                if let Some(order) = patch.order {
                    area.order = order;
                }
            }
            None => debug!(area_id = id, "update_area: no such area"),
        }
        self.commit();
    }

    /// Removes the area and detaches every task and project in it.
    pub fn delete_area(&mut self, id: &str) {
        let now = Utc::now();
        self.state.areas.retain(|a| a.id != id);
        for task in self.state.tasks.iter_mut().filter(|t| t.area_id.as_deref() == Some(id)) {
            task.area_id = None;
            task.updated_at = now;
        }
        for project in self.state.projects.iter_mut().filter(|p| p.area_id.as_deref() == Some(id)) {
            project.area_id = None;
            project.updated_at = now;
        }
        self.clear_selection_of(ViewType::Area, id);
        debug!(area_id = id, "area deleted");
        self.commit();
    }

    // ----- tags -----

    /// Adds a tag. Without an explicit color the first unused palette color
    /// is taken, or a random one once the palette is exhausted.
    pub fn add_tag(&mut self, name: &str, color: Option<String>) -> TagId {
        let id = new_id();
        let color = color.unwrap_or_else(|| {
            pick_tag_color(self.state.tags.iter().map(|t| t.color.as_str()))
        });
        debug!(tag_id = %id, %color, "tag added");
        self.state.tags.push(Tag { id: id.clone(), name: name.to_string(), color });
        self.commit();
        id
    }

    pub fn update_tag(&mut self, id: &str, patch: TagPatch) {
        match self.state.tags.iter_mut().find(|t| t.id == id) {
            Some(tag) => {
                if let Some(name) = patch.name {
                    tag.name = name;
                }
                if let Some(color) = patch.color {
                    tag.color = color;
                }
            }
            None => debug!(tag_id = id, "update_tag: no such tag"),
        }
        self.commit();
    }

    /// Removes the tag and strips it from every task and project.
    pub fn delete_tag(&mut self, id: &str) {
        let now = Utc::now();
        self.state.tags.retain(|t| t.id != id);
        for task in self.state.tasks.iter_mut().filter(|t| t.has_tag(id)) {
            task.tags.retain(|t| t != id);
            task.updated_at = now;
        }
        for project in self.state.projects.iter_mut().filter(|p| p.tags.iter().any(|t| t == id)) {
            project.tags.retain(|t| t != id);
            project.updated_at = now;
        }
        self.clear_selection_of(ViewType::Tag, id);
        debug!(tag_id = id, "tag deleted");
        self.commit();
    }

    // ----- UI selection -----

    /// Switches the current view. Also clears the selected task.
    pub fn set_current_view(&mut self, view: ViewType, item_id: Option<String>) {
        self.state.current_view = view;
        self.state.selected_item_id = item_id;
        self.state.selected_task_id = None;
        self.commit();
    }

    pub fn set_selected_task_id(&mut self, id: Option<TaskId>) {
        self.state.selected_task_id = id;
        self.commit();
    }

    pub fn toggle_sidebar(&mut self) {
        self.state.sidebar_collapsed = !self.state.sidebar_collapsed;
        self.commit();
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.state.search_query = query.to_string();
        self.commit();
    }

    pub fn toggle_quick_entry(&mut self) {
        self.state.is_quick_entry_open = !self.state.is_quick_entry_open;
        self.commit();
    }

    /// Drops a selection that pointed at a deleted container.
    fn clear_selection_of(&mut self, view: ViewType, id: &str) {
        if self.state.current_view == view && self.state.selected_item_id.as_deref() == Some(id) {
            self.state.current_view = ViewType::Inbox;
            self.state.selected_item_id = None;
        }
    }
}
