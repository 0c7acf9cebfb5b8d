use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputField, InputMode, SidebarItem};
use crate::models::{TaskStatus, ViewType};
use crate::palette::is_valid_hex;
use crate::views;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let collapsed = app.store.state().sidebar_collapsed;
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(if collapsed { 0 } else { 28 }),
            Constraint::Min(0),
        ].as_ref())
        .split(chunks[0]);

    if !collapsed {
        draw_sidebar(f, app, body[0]);
    }
    draw_tasks(f, app, body[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => match &app.message {
            Some(m) => m.as_str(),
            None => "q: Quit | Tab/h/l: View | 1-7: Jump | a: Add | Space: Done | s: Status | e: Title | n: Notes | w: When | D: Deadline | J/K: Move | d: Trash | r: Restore | X: Empty Trash | /: Search | b: Sidebar",
        },
        InputMode::Editing | InputMode::Searching => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Add | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_mode {
            InputMode::Adding => "New Task: Enter Title",
            InputMode::Searching => "Search (empty clears)",
            InputMode::Editing => match app.input_field {
                InputField::Title => "Edit Title",
                InputField::Notes => "Edit Notes",
                InputField::When => "Edit When (YYYY-MM-DD, empty clears)",
                InputField::Deadline => "Edit Deadline (YYYY-MM-DD, empty clears)",
                InputField::None => "Edit",
            },
            InputMode::Normal => "",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn tag_color(hex: &str) -> Color {
    if !is_valid_hex(hex) {
        return Color::Reset;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Color::Rgb(channel(1), channel(3), channel(5))
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let state = app.store.state();
    let today = app.today();
    let items: Vec<ListItem> = app
        .sidebar
        .iter()
        .map(|item| {
            let (view, scope) = match item {
                SidebarItem::View(v) => (*v, None),
                SidebarItem::Project(id) => (ViewType::Project, Some(id.as_str())),
                SidebarItem::Area(id) => (ViewType::Area, Some(id.as_str())),
                SidebarItem::Tag(id) => (ViewType::Tag, Some(id.as_str())),
            };
            let title = views::view_title(state, view, scope);
            let prefix = match item {
                SidebarItem::View(_) => "",
                SidebarItem::Project(_) => "◦ ",
                SidebarItem::Area(_) => "▸ ",
                SidebarItem::Tag(_) => "# ",
            };
            let badge = views::badge_count(&state.tasks, view, scope, today)
                .filter(|n| *n > 0)
                .map(|n| format!(" ({})", n))
                .unwrap_or_default();
            let style = match item {
                SidebarItem::Tag(id) => state
                    .tags
                    .iter()
                    .find(|t| t.id == *id)
                    .map(|t| Style::default().fg(tag_color(&t.color)))
                    .unwrap_or_default(),
                _ => Style::default(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", prefix, title), style),
                Span::styled(badge, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("gtdust"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.sidebar_state);
}

fn draw_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let state = app.store.state();
    let today = app.today();

    let rows: Vec<Row> = app
        .task_ids
        .iter()
        .filter_map(|id| app.store.task(id))
        .map(|t| {
            let style = match t.status {
                TaskStatus::Completed | TaskStatus::Trash => Style::default().fg(Color::DarkGray),
                TaskStatus::Today => Style::default().fg(Color::Yellow),
                _ if t.is_overdue(today) => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            let (done, total) = t.checklist_progress();
            let mark = if t.is_completed() { "[x]" } else { "[ ]" };

            Row::new(vec![
                Cell::from(mark),
                Cell::from(t.title.clone()),
                Cell::from(t.status.to_string()),
                Cell::from(app.store.project_of(t).map(|p| p.title.clone()).unwrap_or_default()),
                Cell::from(t.scheduled_date.map(|d| d.to_string()).unwrap_or_default()),
                Cell::from(t.deadline.map(|d| d.to_string()).unwrap_or_default()),
                Cell::from(if total > 0 { format!("{}/{}", done, total) } else { String::new() }),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(6),
    ];

    let mut title = views::view_title(state, state.current_view, state.selected_item_id.as_deref());
    if !state.search_query.is_empty() {
        title = format!("{} - search: {}", title, state.search_query);
    }

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Title", "Status", "Project", "When", "Deadline", "List"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
