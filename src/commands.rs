use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{
    AreaPatch, ChecklistItemPatch, NewProject, NewTask, ProjectPatch, RepeatKind, RepeatRule,
    TagPatch, Task, TaskPatch, TaskStatus, ViewType,
};
use crate::palette::is_valid_hex;
use crate::storage::JsonFileStorage;
use crate::store::Store;
use crate::views::{self, today};

/// Number of id characters shown in tables.
const SHORT_ID_LEN: usize = 8;

/// Field flags shared by `add`.
#[derive(Args, Debug, Default, Clone)]
pub struct TaskInput {
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// inbox, today, anytime or someday
    #[arg(short, long)]
    pub status: Option<String>,
    /// Project id prefix or title
    #[arg(short, long)]
    pub project: Option<String>,
    /// Area id prefix or title
    #[arg(short, long)]
    pub area: Option<String>,
    /// Tag id prefix or name (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Scheduled date: YYYY-MM-DD, today or tomorrow
    #[arg(short, long)]
    pub when: Option<String>,
    /// Deadline: YYYY-MM-DD, today or tomorrow
    #[arg(short, long)]
    pub deadline: Option<String>,
    /// Repeat rule (daily, weekly, monthly, yearly)
    #[arg(short, long)]
    pub repeat: Option<String>,
    /// Repeat interval in periods
    #[arg(long, requires = "repeat")]
    pub every: Option<u32>,
}

/// Field flags for `edit`. Absent flags leave the field untouched.
#[derive(Args, Debug, Default, Clone)]
pub struct TaskEdit {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub fields: TaskInput,
    /// Remove a tag (repeatable)
    #[arg(long)]
    pub untag: Vec<String>,
    /// Detach from its project
    #[arg(long, conflicts_with = "project")]
    pub no_project: bool,
    /// Detach from its area
    #[arg(long, conflicts_with = "area")]
    pub no_area: bool,
    /// Clear the scheduled date
    #[arg(long, conflicts_with = "when")]
    pub no_when: bool,
    /// Clear the deadline
    #[arg(long, conflicts_with = "deadline")]
    pub no_deadline: bool,
    /// Clear the repeat rule
    #[arg(long, conflicts_with = "repeat")]
    pub no_repeat: bool,
}

fn short_id(id: &str) -> &str {
    id.char_indices().nth(SHORT_ID_LEN).map_or(id, |(i, _)| &id[..i])
}

/// Parses `YYYY-MM-DD`, `today` or `tomorrow`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today()),
        "tomorrow" => Ok(today() + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD.", s)),
    }
}

/// Parses a status a user may assign. `scheduled` is reserved.
fn parse_status(s: &str) -> Result<TaskStatus> {
    let status: TaskStatus = s.parse()?;
    if status == TaskStatus::Scheduled {
        bail!("Status 'scheduled' is reserved; use --when to schedule a task.");
    }
    Ok(status)
}

fn parse_repeat(kind: &str, every: Option<u32>) -> Result<RepeatRule> {
    let kind: RepeatKind = kind.parse()?;
    let interval = every.unwrap_or(1);
    if interval == 0 {
        bail!("Repeat interval must be at least 1.");
    }
    Ok(RepeatRule { kind, interval, days_of_week: None, day_of_month: None })
}

/// Finds the single id equal to `key` or starting with it.
fn match_id<'a, I>(kind: &str, ids: I, key: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.into_iter().collect();
    if let Some(exact) = ids.iter().find(|id| **id == key) {
        return Ok(exact.to_string());
    }
    let hits: Vec<&&str> = ids.iter().filter(|id| !key.is_empty() && id.starts_with(key)).collect();
    match hits.as_slice() {
        [one] => Ok(one.to_string()),
        [] => bail!("{} '{}' not found.", kind, key),
        _ => bail!("{} id '{}' is ambiguous ({} matches).", kind, key, hits.len()),
    }
}

/// Resolves a named entity by id, id prefix or exact (case-insensitive) name.
fn match_named<'a, I>(kind: &str, entries: I, key: &str) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    if let Some((id, _)) = entries.clone().into_iter().find(|(_, name)| name.eq_ignore_ascii_case(key)) {
        return Ok(id.to_string());
    }
    match_id(kind, entries.into_iter().map(|(id, _)| id), key)
}

pub fn find_task_id(store: &Store, key: &str) -> Result<String> {
    match_id("Task", store.tasks().iter().map(|t| t.id.as_str()), key)
}

pub fn find_project_id(store: &Store, key: &str) -> Result<String> {
    match_named("Project", store.projects().iter().map(|p| (p.id.as_str(), p.title.as_str())), key)
}

pub fn find_area_id(store: &Store, key: &str) -> Result<String> {
    match_named("Area", store.areas().iter().map(|a| (a.id.as_str(), a.title.as_str())), key)
}

pub fn find_tag_id(store: &Store, key: &str) -> Result<String> {
    match_named("Tag", store.tags().iter().map(|t| (t.id.as_str(), t.name.as_str())), key)
}

fn find_checklist_item_id(task: &Task, key: &str) -> Result<String> {
    match_id("Checklist item", task.checklist.iter().map(|i| i.id.as_str()), key)
}

/// Resolves the scope id a scoped view needs.
fn find_scope_id(store: &Store, view: ViewType, key: &str) -> Result<String> {
    match view {
        ViewType::Project => find_project_id(store, key),
        ViewType::Area => find_area_id(store, key),
        ViewType::Tag => find_tag_id(store, key),
        _ => bail!("View '{}' takes no scope.", view),
    }
}

/// Adds a new task and returns its id.
pub fn cmd_add(store: &mut Store, title: String, input: TaskInput, silent: bool) -> Result<String> {
    let status = input.status.as_deref().map(parse_status).transpose()?.unwrap_or_default();
    let project_id = input.project.as_deref().map(|p| find_project_id(store, p)).transpose()?;
    let area_id = input.area.as_deref().map(|a| find_area_id(store, a)).transpose()?;
    let tags = input.tags.iter().map(|t| find_tag_id(store, t)).collect::<Result<Vec<_>>>()?;
    let scheduled_date = input.when.as_deref().map(parse_date).transpose()?;
    let deadline = input.deadline.as_deref().map(parse_date).transpose()?;
    let repeat_rule = input.repeat.as_deref().map(|r| parse_repeat(r, input.every)).transpose()?;

    let id = store.add_task(NewTask {
        title,
        notes: input.notes.unwrap_or_default(),
        status,
        project_id,
        area_id,
        tags,
        checklist: Vec::new(),
        scheduled_date,
        deadline,
        repeat_rule,
    });
    if !silent { println!("Task added (id = {})", short_id(&id)); }
    Ok(id)
}

/// Edits an existing task's details.
pub fn cmd_edit(store: &mut Store, key: &str, edit: TaskEdit, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    let input = edit.fields;
    let mut patch = TaskPatch {
        title: edit.title,
        notes: input.notes,
        status: input.status.as_deref().map(parse_status).transpose()?,
        ..Default::default()
    };

    if edit.no_project {
        patch.project_id = Some(None);
    } else if let Some(p) = input.project.as_deref() {
        patch.project_id = Some(Some(find_project_id(store, p)?));
    }
    if edit.no_area {
        patch.area_id = Some(None);
    } else if let Some(a) = input.area.as_deref() {
        patch.area_id = Some(Some(find_area_id(store, a)?));
    }
    if edit.no_when {
        patch.scheduled_date = Some(None);
    } else if let Some(w) = input.when.as_deref() {
        patch.scheduled_date = Some(Some(parse_date(w)?));
    }
    if edit.no_deadline {
        patch.deadline = Some(None);
    } else if let Some(d) = input.deadline.as_deref() {
        patch.deadline = Some(Some(parse_date(d)?));
    }
    if edit.no_repeat {
        patch.repeat_rule = Some(None);
    } else if let Some(r) = input.repeat.as_deref() {
        patch.repeat_rule = Some(Some(parse_repeat(r, input.every)?));
    }

    if !input.tags.is_empty() || !edit.untag.is_empty() {
        let mut tags = store.task(&id).map(|t| t.tags.clone()).unwrap_or_default();
        for key in &input.tags {
            let tag_id = find_tag_id(store, key)?;
            if !tags.contains(&tag_id) {
                tags.push(tag_id);
            }
        }
        for key in &edit.untag {
            let tag_id = find_tag_id(store, key)?;
            tags.retain(|t| *t != tag_id);
        }
        patch.tags = Some(tags);
    }

    store.update_task(&id, patch);
    if !silent { println!("Task {} updated.", short_id(&id)); }
    Ok(())
}

/// Marks a task as complete.
pub fn cmd_complete(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    store.complete_task(&id);
    if !silent { println!("Task {} marked as complete.", short_id(&id)); }
    Ok(())
}

/// Sends a task back to the inbox as not completed.
pub fn cmd_uncomplete(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    store.uncomplete_task(&id);
    if !silent { println!("Task {} reopened in the inbox.", short_id(&id)); }
    Ok(())
}

pub fn cmd_trash(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    store.move_task_to_trash(&id);
    if !silent { println!("Task {} moved to trash.", short_id(&id)); }
    Ok(())
}

pub fn cmd_restore(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    store.restore_task(&id);
    if !silent { println!("Task {} restored to the inbox.", short_id(&id)); }
    Ok(())
}

/// Removes a task permanently.
pub fn cmd_delete(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_task_id(store, key)?;
    store.delete_task(&id);
    if !silent { println!("Task {} deleted.", short_id(&id)); }
    Ok(())
}

/// Gives the listed tasks orders 0, 1, 2, ... in the order given.
pub fn cmd_reorder(store: &mut Store, keys: &[String], silent: bool) -> Result<()> {
    let ids = keys.iter().map(|k| find_task_id(store, k)).collect::<Result<Vec<_>>>()?;
    store.reorder_tasks(&ids);
    if !silent { println!("Reordered {} tasks.", ids.len()); }
    Ok(())
}

pub fn cmd_checklist_add(store: &mut Store, task: &str, title: &str, silent: bool) -> Result<String> {
    let task_id = find_task_id(store, task)?;
    let item_id = store
        .add_checklist_item(&task_id, title)
        .with_context(|| format!("Task '{}' not found.", task))?;
    if !silent { println!("Checklist item added (id = {})", short_id(&item_id)); }
    Ok(item_id)
}

fn checklist_target(store: &Store, task: &str, item: &str) -> Result<(String, String)> {
    let task_id = find_task_id(store, task)?;
    let item_id = match store.task(&task_id) {
        Some(t) => find_checklist_item_id(t, item)?,
        None => bail!("Task '{}' not found.", task),
    };
    Ok((task_id, item_id))
}

pub fn cmd_checklist_toggle(store: &mut Store, task: &str, item: &str, silent: bool) -> Result<()> {
    let (task_id, item_id) = checklist_target(store, task, item)?;
    store.toggle_checklist_item(&task_id, &item_id);
    if !silent { println!("Checklist item {} toggled.", short_id(&item_id)); }
    Ok(())
}

pub fn cmd_checklist_edit(store: &mut Store, task: &str, item: &str, title: String, silent: bool) -> Result<()> {
    let (task_id, item_id) = checklist_target(store, task, item)?;
    store.update_checklist_item(&task_id, &item_id, ChecklistItemPatch { title: Some(title), completed: None });
    if !silent { println!("Checklist item {} updated.", short_id(&item_id)); }
    Ok(())
}

pub fn cmd_checklist_remove(store: &mut Store, task: &str, item: &str, silent: bool) -> Result<()> {
    let (task_id, item_id) = checklist_target(store, task, item)?;
    store.delete_checklist_item(&task_id, &item_id);
    if !silent { println!("Checklist item {} removed.", short_id(&item_id)); }
    Ok(())
}

/// Lists a view in a formatted table.
///
/// Without a view, the persisted current view and search query are used.
pub fn cmd_list(store: &Store, view: Option<&str>, scope: Option<&str>, search: Option<&str>) -> Result<()> {
    let state = store.state();
    let (view, scope_id) = match view {
        Some(v) => {
            let view: ViewType = v.parse()?;
            let scope_id = match scope {
                Some(key) => Some(find_scope_id(store, view, key)?),
                None if view.is_scoped() => bail!("View '{}' needs --scope.", view),
                None => None,
            };
            (view, scope_id)
        }
        None => (state.current_view, state.selected_item_id.clone()),
    };
    let query = search.unwrap_or(state.search_query.as_str());
    let today = today();
    let tasks = views::visible_tasks(&state.tasks, view, scope_id.as_deref(), query, today);

    println!("{}", views::view_title(state, view, scope_id.as_deref()));
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("Tags").add_attribute(Attribute::Bold),
            Cell::new("When").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Checklist").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status_color = match t.status {
            TaskStatus::Completed | TaskStatus::Trash => Color::Grey,
            TaskStatus::Today => Color::Yellow,
            _ => Color::Reset,
        };
        let (done, total) = t.checklist_progress();
        let tags = store.tags_of(t).iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(", ");

        table.add_row(vec![
            Cell::new(short_id(&t.id)),
            Cell::new(&t.title),
            Cell::new(t.status).fg(status_color),
            Cell::new(store.project_of(t).map(|p| p.title.as_str()).unwrap_or("-")),
            Cell::new(tags),
            Cell::new(t.scheduled_date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(t.deadline.map(|d| d.to_string()).unwrap_or_default())
                .fg(if t.is_overdue(today) { Color::Red } else { Color::Reset }),
            Cell::new(if total > 0 { format!("{}/{}", done, total) } else { String::new() }),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Prints every field of one task.
pub fn cmd_show(store: &Store, key: &str) -> Result<()> {
    let id = find_task_id(store, key)?;
    let Some(t) = store.task(&id) else { bail!("Task '{}' not found.", key) };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let tags = store.tags_of(t).iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(", ");
    let repeat = t
        .repeat_rule
        .as_ref()
        .map(|r| format!("{:?} every {}", r.kind, r.interval).to_lowercase())
        .unwrap_or_default();
    let rows: Vec<(&str, String)> = vec![
        ("ID", t.id.clone()),
        ("Title", t.title.clone()),
        ("Notes", t.notes.clone()),
        ("Status", t.status.to_string()),
        ("Project", store.project_of(t).map(|p| p.title.clone()).unwrap_or_default()),
        ("Area", store.area_of(t).map(|a| a.title.clone()).unwrap_or_default()),
        ("Tags", tags),
        ("When", t.scheduled_date.map(|d| d.to_string()).unwrap_or_default()),
        ("Deadline", t.deadline.map(|d| d.to_string()).unwrap_or_default()),
        ("Repeat", repeat),
        ("Created", t.created_at.to_rfc3339()),
        ("Updated", t.updated_at.to_rfc3339()),
        ("Completed", t.completed_at.map(|c| c.to_rfc3339()).unwrap_or_default()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    for item in &t.checklist {
        let mark = if item.completed { "[x]" } else { "[ ]" };
        table.add_row(vec![
            Cell::new(format!("  {}", short_id(&item.id))),
            Cell::new(format!("{} {}", mark, item.title)),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Switches the persisted current view.
pub fn cmd_view(store: &mut Store, view: &str, scope: Option<&str>, silent: bool) -> Result<()> {
    let view: ViewType = view.parse()?;
    let scope_id = match scope {
        Some(key) => Some(find_scope_id(store, view, key)?),
        None if view.is_scoped() => bail!("View '{}' needs a scope.", view),
        None => None,
    };
    let title = views::view_title(store.state(), view, scope_id.as_deref());
    store.set_current_view(view, scope_id);
    if !silent { println!("Current view: {}", title); }
    Ok(())
}

pub fn cmd_search(store: &mut Store, query: &str, silent: bool) {
    store.set_search_query(query);
    if !silent {
        if query.is_empty() { println!("Search cleared."); } else { println!("Searching for '{}'.", query); }
    }
}

pub fn cmd_clear_completed(store: &mut Store, silent: bool) {
    let count = store.tasks().iter().filter(|t| t.is_completed()).count();
    store.clear_completed();
    if !silent { println!("Removed {} completed tasks.", count); }
}

pub fn cmd_empty_trash(store: &mut Store, silent: bool) {
    let count = store.tasks().iter().filter(|t| t.status == TaskStatus::Trash).count();
    store.empty_trash();
    if !silent { println!("Removed {} trashed tasks.", count); }
}

pub fn cmd_project_add(
    store: &mut Store,
    title: String,
    notes: Option<String>,
    area: Option<&str>,
    deadline: Option<&str>,
    silent: bool,
) -> Result<String> {
    let area_id = area.map(|a| find_area_id(store, a)).transpose()?;
    let deadline = deadline.map(parse_date).transpose()?;
    let id = store.add_project(NewProject {
        title,
        notes: notes.unwrap_or_default(),
        area_id,
        tags: Vec::new(),
        deadline,
    });
    if !silent { println!("Project added (id = {})", short_id(&id)); }
    Ok(id)
}

/// Lists projects; completed ones only with `all`.
pub fn cmd_project_list(store: &Store, all: bool) {
    let projects: Vec<_> = if all {
        let mut p: Vec<_> = store.projects().iter().collect();
        p.sort_by(|a, b| a.order.total_cmp(&b.order));
        p
    } else {
        views::active_projects(store.projects())
    };
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    let today = today();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Title", "Area", "Deadline", "Open", "Status"]);
    for p in projects {
        let open = views::badge_count(store.tasks(), ViewType::Project, Some(p.id.as_str()), today).unwrap_or(0);
        let area = p.area_id.as_deref().and_then(|a| store.area(a)).map(|a| a.title.clone());
        table.add_row(vec![
            short_id(&p.id).to_string(),
            p.title.clone(),
            area.unwrap_or_else(|| "-".into()),
            p.deadline.map(|d| d.to_string()).unwrap_or_default(),
            open.to_string(),
            if p.completed_at.is_some() { "Done".into() } else { "Active".into() },
        ]);
    }
    println!("{table}");
}

pub fn cmd_project_edit(
    store: &mut Store,
    key: &str,
    title: Option<String>,
    notes: Option<String>,
    area: Option<&str>,
    deadline: Option<&str>,
    silent: bool,
) -> Result<()> {
    let id = find_project_id(store, key)?;
    let patch = ProjectPatch {
        title,
        notes,
        area_id: area.map(|a| find_area_id(store, a).map(Some)).transpose()?,
        deadline: deadline.map(|d| parse_date(d).map(Some)).transpose()?,
        ..Default::default()
    };
    store.update_project(&id, patch);
    if !silent { println!("Project {} updated.", short_id(&id)); }
    Ok(())
}

pub fn cmd_project_complete(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_project_id(store, key)?;
    store.complete_project(&id);
    if !silent { println!("Project {} marked as complete.", short_id(&id)); }
    Ok(())
}

/// Removes a project; its tasks stay, detached.
pub fn cmd_project_remove(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_project_id(store, key)?;
    store.delete_project(&id);
    if !silent { println!("Project {} removed.", short_id(&id)); }
    Ok(())
}

pub fn cmd_area_add(store: &mut Store, title: &str, silent: bool) -> String {
    let id = store.add_area(title);
    if !silent { println!("Area added (id = {})", short_id(&id)); }
    id
}

pub fn cmd_area_list(store: &Store) {
    if store.areas().is_empty() {
        println!("No areas found.");
        return;
    }
    let mut areas: Vec<_> = store.areas().iter().collect();
    areas.sort_by(|a, b| a.order.total_cmp(&b.order));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Title", "Tasks"]);
    for a in areas {
        let count = store
            .tasks()
            .iter()
            .filter(|t| views::belongs_to(t, ViewType::Area, Some(a.id.as_str()), today()))
            .count();
        table.add_row(vec![short_id(&a.id).to_string(), a.title.clone(), count.to_string()]);
    }
    println!("{table}");
}

pub fn cmd_area_rename(store: &mut Store, key: &str, title: String, silent: bool) -> Result<()> {
    let id = find_area_id(store, key)?;
    store.update_area(&id, AreaPatch { title: Some(title), order: None });
    if !silent { println!("Area {} renamed.", short_id(&id)); }
    Ok(())
}

pub fn cmd_area_remove(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_area_id(store, key)?;
    store.delete_area(&id);
    if !silent { println!("Area {} removed.", short_id(&id)); }
    Ok(())
}

pub fn cmd_tag_add(store: &mut Store, name: &str, color: Option<String>, silent: bool) -> Result<String> {
    if let Some(c) = &color {
        if !is_valid_hex(c) {
            bail!("Invalid color '{}'. Use #RRGGBB.", c);
        }
    }
    let id = store.add_tag(name, color);
    if !silent { println!("Tag added (id = {})", short_id(&id)); }
    Ok(id)
}

pub fn cmd_tag_list(store: &Store) {
    if store.tags().is_empty() {
        println!("No tags found.");
        return;
    }
    let today = today();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name", "Color", "Open"]);
    for t in store.tags() {
        let open = views::badge_count(store.tasks(), ViewType::Tag, Some(t.id.as_str()), today).unwrap_or(0);
        table.add_row(vec![short_id(&t.id).to_string(), t.name.clone(), t.color.clone(), open.to_string()]);
    }
    println!("{table}");
}

pub fn cmd_tag_edit(store: &mut Store, key: &str, name: Option<String>, color: Option<String>, silent: bool) -> Result<()> {
    let id = find_tag_id(store, key)?;
    if let Some(c) = &color {
        if !is_valid_hex(c) {
            bail!("Invalid color '{}'. Use #RRGGBB.", c);
        }
    }
    store.update_tag(&id, TagPatch { name, color });
    if !silent { println!("Tag {} updated.", short_id(&id)); }
    Ok(())
}

/// Removes a tag and strips it from tasks and projects.
pub fn cmd_tag_remove(store: &mut Store, key: &str, silent: bool) -> Result<()> {
    let id = find_tag_id(store, key)?;
    store.delete_tag(&id);
    if !silent { println!("Tag {} removed.", short_id(&id)); }
    Ok(())
}

/// Resets the database by deleting the storage slot.
pub fn cmd_reset(storage: &JsonFileStorage, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks, projects, areas and tags? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }

    storage.delete().context("Failed to reset database")?;
    println!("Database reset successfully.");
    Ok(())
}
