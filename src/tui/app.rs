use chrono::NaiveDate;
use ratatui::widgets::{ListState, TableState};

use crate::commands::parse_date;
use crate::models::{NewTask, TaskPatch, TaskStatus, ViewType};
use crate::store::Store;
use crate::views;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Searching,
}

#[derive(Clone, Copy, PartialEq)]
pub enum InputField {
    None,
    Title,
    Notes,
    When,
    Deadline,
}

/// One selectable row of the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    View(ViewType),
    Project(String),
    Area(String),
    Tag(String),
}

impl SidebarItem {
    fn view_and_scope(&self) -> (ViewType, Option<String>) {
        match self {
            SidebarItem::View(v) => (*v, None),
            SidebarItem::Project(id) => (ViewType::Project, Some(id.clone())),
            SidebarItem::Area(id) => (ViewType::Area, Some(id.clone())),
            SidebarItem::Tag(id) => (ViewType::Tag, Some(id.clone())),
        }
    }
}

pub struct App {
    pub store: Store,
    pub sidebar: Vec<SidebarItem>,
    pub sidebar_state: ListState,
    /// Ids of the visible tasks, in display order.
    pub task_ids: Vec<String>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<String>,
    /// One-line feedback shown in the help bar.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance around a loaded store.
    pub fn new(store: Store) -> App {
        let mut app = App {
            store,
            sidebar: Vec::new(),
            sidebar_state: ListState::default(),
            task_ids: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            message: None,
        };
        app.reload();
        app
    }

    pub fn today(&self) -> NaiveDate {
        views::today()
    }

    /// Rebuilds the sidebar and the visible task list from the store.
    pub fn reload(&mut self) {
        let state = self.store.state();
        let mut sidebar: Vec<SidebarItem> = ViewType::FIXED.into_iter().map(SidebarItem::View).collect();
        sidebar.extend(views::active_projects(&state.projects).into_iter().map(|p| SidebarItem::Project(p.id.clone())));
        let mut areas: Vec<_> = state.areas.iter().collect();
        areas.sort_by(|a, b| a.order.total_cmp(&b.order));
        sidebar.extend(areas.into_iter().map(|a| SidebarItem::Area(a.id.clone())));
        sidebar.extend(state.tags.iter().map(|t| SidebarItem::Tag(t.id.clone())));

        let current = match state.current_view {
            ViewType::Project => state.selected_item_id.clone().map(SidebarItem::Project),
            ViewType::Area => state.selected_item_id.clone().map(SidebarItem::Area),
            ViewType::Tag => state.selected_item_id.clone().map(SidebarItem::Tag),
            v => Some(SidebarItem::View(v)),
        };
        let index = current.and_then(|c| sidebar.iter().position(|s| *s == c)).unwrap_or(0);
        self.sidebar = sidebar;
        self.sidebar_state.select(Some(index));

        self.task_ids = self.store.current_view_tasks().into_iter().map(|t| t.id.clone()).collect();
        if self.task_ids.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.task_ids.len() {
                self.state.select(Some(self.task_ids.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.state.selected().and_then(|i| self.task_ids.get(i).cloned())
    }

    fn remember_selection(&mut self) {
        let id = self.selected_id();
        if self.store.state().selected_task_id != id {
            self.store.set_selected_task_id(id);
        }
    }

    /// Selects the next task.
    pub fn next(&mut self) {
        if self.task_ids.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.task_ids.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
        self.remember_selection();
    }

    /// Selects the previous task.
    pub fn previous(&mut self) {
        if self.task_ids.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.task_ids.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
        self.remember_selection();
    }

    fn switch_view(&mut self, index: usize) {
        if let Some(item) = self.sidebar.get(index) {
            let (view, scope) = item.view_and_scope();
            self.store.set_current_view(view, scope);
            self.state.select(None);
            self.reload();
        }
    }

    /// Moves to the next sidebar entry.
    pub fn next_view(&mut self) {
        if self.sidebar.is_empty() { return; }
        let i = self.sidebar_state.selected().map_or(0, |i| (i + 1) % self.sidebar.len());
        self.switch_view(i);
    }

    /// Moves to the previous sidebar entry.
    pub fn previous_view(&mut self) {
        if self.sidebar.is_empty() { return; }
        let len = self.sidebar.len();
        let i = self.sidebar_state.selected().map_or(0, |i| (i + len - 1) % len);
        self.switch_view(i);
    }

    /// Jumps to one of the fixed views by its 1-based sidebar position.
    pub fn jump_to_view(&mut self, n: usize) {
        if n >= 1 && n <= ViewType::FIXED.len() {
            self.switch_view(n - 1);
        }
    }

    /// Completes the selected task, or reopens it if already completed.
    pub fn toggle_complete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let completed = self.store.task(&id).is_some_and(|t| t.is_completed());
        if completed {
            self.store.uncomplete_task(&id);
        } else {
            self.store.complete_task(&id);
        }
        self.reload();
    }

    /// Moves the selected task to the trash; in the trash view deletes it.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if self.store.state().current_view == ViewType::Trash {
            self.store.delete_task(&id);
            self.message = Some("Task deleted".into());
        } else {
            self.store.move_task_to_trash(&id);
            self.message = Some("Task moved to trash".into());
        }
        self.reload();
    }

    pub fn restore_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        self.store.restore_task(&id);
        self.reload();
    }

    /// Cycles the selected task through inbox, today, anytime and someday.
    pub fn cycle_status(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let Some(status) = self.store.task(&id).map(|t| t.status) else { return };
        let next = match status {
            TaskStatus::Inbox => TaskStatus::Today,
            TaskStatus::Today => TaskStatus::Anytime,
            TaskStatus::Anytime => TaskStatus::Someday,
            _ => TaskStatus::Inbox,
        };
        self.store.update_task(&id, TaskPatch { status: Some(next), ..Default::default() });
        self.message = Some(format!("Status: {}", next));
        self.reload();
    }

    /// Swaps the selected task with its neighbour and renumbers the list.
    pub fn move_selected(&mut self, down: bool) {
        if views::has_intrinsic_order(self.store.state().current_view) {
            self.message = Some("This list is sorted by date".into());
            return;
        }
        let Some(i) = self.state.selected() else { return };
        let j = if down { i + 1 } else { i.wrapping_sub(1) };
        if j >= self.task_ids.len() { return; }
        let mut ids = self.task_ids.clone();
        ids.swap(i, j);
        self.store.reorder_tasks(&ids);
        self.state.select(Some(j));
        self.reload();
    }

    pub fn empty_trash(&mut self) {
        self.store.empty_trash();
        self.message = Some("Trash emptied".into());
        self.reload();
    }

    pub fn toggle_sidebar(&mut self) {
        self.store.toggle_sidebar();
    }

    /// Opens quick entry for a new task in the current view.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
        if !self.store.state().is_quick_entry_open {
            self.store.toggle_quick_entry();
        }
    }

    /// Opens the search prompt, pre-filled with the active query.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.store.state().search_query.clone();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(id) = self.selected_id() else { return };
        let Some(t) = self.store.task(&id) else { return };
        self.input_buffer = match field {
            InputField::Title => t.title.clone(),
            InputField::Notes => t.notes.clone(),
            InputField::When => t.scheduled_date.map(|d| d.to_string()).unwrap_or_default(),
            InputField::Deadline => t.deadline.map(|d| d.to_string()).unwrap_or_default(),
            InputField::None => String::new(),
        };
        self.target_id = Some(id);
        self.input_field = field;
        self.input_mode = InputMode::Editing;
    }

    /// Leaves any input mode without applying it.
    pub fn cancel_input(&mut self) {
        if self.input_mode == InputMode::Adding && self.store.state().is_quick_entry_open {
            self.store.toggle_quick_entry();
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Searching => {
                let query = self.input_buffer.trim().to_string();
                self.store.set_search_query(&query);
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.reload();
            }
            InputMode::Normal => {}
        }
    }

    /// A new task inherits the current view: its status, or its project,
    /// area or tag.
    fn handle_adding_input(&mut self) {
        let title = self.input_buffer.trim().to_string();
        if title.is_empty() { return; }
        let state = self.store.state();
        let scope = state.selected_item_id.clone();
        let mut new = NewTask::titled(title);
        match state.current_view {
            ViewType::Today => new.status = TaskStatus::Today,
            ViewType::Anytime => new.status = TaskStatus::Anytime,
            ViewType::Someday => new.status = TaskStatus::Someday,
            ViewType::Upcoming => new.scheduled_date = Some(self.today()),
            ViewType::Project => new.project_id = scope,
            ViewType::Area => new.area_id = scope,
            ViewType::Tag => new.tags = scope.into_iter().collect(),
            _ => {}
        }
        self.store.add_task(new);
        self.cancel_input();
        self.reload();
    }

    /// Handles input for the edit prompt.
    fn handle_editing_input(&mut self) {
        if let Some(id) = self.target_id.take() {
            let value = self.input_buffer.trim().to_string();
            let field = self.input_field;
            let patch = match field {
                InputField::Title => Some(TaskPatch { title: Some(value), ..Default::default() }),
                InputField::Notes => Some(TaskPatch { notes: Some(value), ..Default::default() }),
                InputField::When => self.date_patch(&value).map(|d| TaskPatch { scheduled_date: Some(d), ..Default::default() }),
                InputField::Deadline => self.date_patch(&value).map(|d| TaskPatch { deadline: Some(d), ..Default::default() }),
                InputField::None => None,
            };
            if let Some(patch) = patch {
                self.store.update_task(&id, patch);
            }
        }
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
        self.reload();
    }

    /// Empty input clears the date; unparseable input is reported and ignored.
    fn date_patch(&mut self, value: &str) -> Option<Option<NaiveDate>> {
        if value.is_empty() {
            return Some(None);
        }
        match parse_date(value) {
            Ok(d) => Some(Some(d)),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }
}
