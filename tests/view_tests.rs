use chrono::{Duration, NaiveDate, TimeZone, Utc};
use gtdust::models::{AppState, Area, Project, Tag, Task, TaskStatus, ViewType};
use gtdust::views::{badge_count, resolve, view_title, visible_tasks};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn task(title: &str, status: TaskStatus, order: f64) -> Task {
    let mut t = Task::new(title);
    t.status = status;
    t.order = order;
    if status == TaskStatus::Completed {
        t.completed_at = Some(t.updated_at);
    }
    t
}

fn titles(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.title.clone()).collect()
}

#[test]
fn test_today_includes_status_and_overdue_schedule() {
    let today = date("2024-01-02");
    let first = task("first", TaskStatus::Today, 1.0);
    let mut second = task("second", TaskStatus::Inbox, 2.0);
    second.scheduled_date = Some(date("2024-01-01"));
    let tasks = vec![first, second];

    assert_eq!(titles(&resolve(&tasks, ViewType::Today, None, today)), vec!["first", "second"]);
    assert_eq!(titles(&resolve(&tasks, ViewType::Upcoming, None, today)), vec!["second"]);
}

#[test]
fn test_upcoming_sorted_by_date_and_excludes_closed() {
    let today = date("2024-01-02");
    let mut late = task("late", TaskStatus::Anytime, 1.0);
    late.scheduled_date = Some(date("2024-03-01"));
    let mut soon = task("soon", TaskStatus::Inbox, 2.0);
    soon.scheduled_date = Some(date("2024-01-05"));
    let mut done = task("done", TaskStatus::Completed, 3.0);
    done.scheduled_date = Some(date("2024-01-03"));
    let mut binned = task("binned", TaskStatus::Trash, 4.0);
    binned.scheduled_date = Some(date("2024-01-03"));
    let tasks = vec![late, soon, done, binned];

    let upcoming = visible_tasks(&tasks, ViewType::Upcoming, None, "", today);
    assert_eq!(titles(&upcoming), vec!["soon", "late"]);
    assert!(resolve(&tasks, ViewType::Today, None, today).is_empty());
}

#[test]
fn test_logbook_newest_first() {
    let today = date("2024-01-02");
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let mut older = task("older", TaskStatus::Completed, 0.0);
    older.completed_at = Some(base);
    let mut newer = task("newer", TaskStatus::Completed, 9.0);
    newer.completed_at = Some(base + Duration::hours(3));
    let open = task("open", TaskStatus::Inbox, 5.0);
    let tasks = vec![older, open, newer];

    let logbook = visible_tasks(&tasks, ViewType::Logbook, None, "", today);
    assert_eq!(titles(&logbook), vec!["newer", "older"]);
}

#[test]
fn test_inbox_excludes_project_tasks() {
    let today = date("2024-01-02");
    let loose = task("loose", TaskStatus::Inbox, 1.0);
    let mut filed = task("filed", TaskStatus::Inbox, 2.0);
    filed.project_id = Some("p".into());
    let tasks = vec![loose, filed];

    assert_eq!(titles(&resolve(&tasks, ViewType::Inbox, None, today)), vec!["loose"]);
    assert_eq!(titles(&resolve(&tasks, ViewType::Project, Some("p"), today)), vec!["filed"]);
}

#[test]
fn test_status_views() {
    let today = date("2024-01-02");
    let tasks = vec![
        task("a", TaskStatus::Anytime, 1.0),
        task("s", TaskStatus::Someday, 2.0),
        task("t", TaskStatus::Trash, 3.0),
        task("c", TaskStatus::Completed, 4.0),
    ];
    assert_eq!(titles(&resolve(&tasks, ViewType::Anytime, None, today)), vec!["a"]);
    assert_eq!(titles(&resolve(&tasks, ViewType::Someday, None, today)), vec!["s"]);
    assert_eq!(titles(&resolve(&tasks, ViewType::Trash, None, today)), vec!["t"]);
    assert_eq!(titles(&resolve(&tasks, ViewType::Logbook, None, today)), vec!["c"]);
}

#[test]
fn test_scoped_views_exclude_trash_only() {
    let today = date("2024-01-02");
    let mut open = task("open", TaskStatus::Anytime, 1.0);
    let mut done = task("done", TaskStatus::Completed, 2.0);
    let mut binned = task("binned", TaskStatus::Trash, 3.0);
    for t in [&mut open, &mut done, &mut binned] {
        t.project_id = Some("p".into());
        t.area_id = Some("a".into());
        t.tags = vec!["x".into()];
    }
    let tasks = vec![open, done, binned];

    for (view, scope) in [(ViewType::Project, "p"), (ViewType::Area, "a"), (ViewType::Tag, "x")] {
        assert_eq!(titles(&resolve(&tasks, view, Some(scope), today)), vec!["open", "done"]);
        assert!(resolve(&tasks, view, Some("other"), today).is_empty());
    }
    assert_eq!(badge_count(&tasks, ViewType::Project, Some("p"), today), Some(1));
    assert_eq!(badge_count(&tasks, ViewType::Tag, Some("x"), today), Some(1));
    assert_eq!(badge_count(&tasks, ViewType::Area, Some("a"), today), None);
}

#[test]
fn test_search_and_manual_order() {
    let today = date("2024-01-02");
    let mut milk = task("Buy MILK", TaskStatus::Anytime, 5.0);
    milk.notes = String::new();
    let mut bread = task("Bakery", TaskStatus::Anytime, 1.0);
    bread.notes = "and milk too".into();
    let other = task("Walk", TaskStatus::Anytime, 0.0);
    let tasks = vec![milk, bread, other];

    assert_eq!(titles(&visible_tasks(&tasks, ViewType::Anytime, None, "", today)), vec!["Walk", "Bakery", "Buy MILK"]);
    assert_eq!(titles(&visible_tasks(&tasks, ViewType::Anytime, None, "milk", today)), vec!["Bakery", "Buy MILK"]);
    assert!(visible_tasks(&tasks, ViewType::Anytime, None, "cheese", today).is_empty());
}

#[test]
fn test_view_titles_fall_back_on_dangling_scope() {
    let now = Utc::now();
    let state = AppState {
        projects: vec![Project {
            id: "p".into(),
            title: "Renovate".into(),
            notes: String::new(),
            area_id: None,
            tags: vec![],
            deadline: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            order: 1.0,
        }],
        areas: vec![Area { id: "a".into(), title: "Home".into(), order: 1.0 }],
        tags: vec![Tag { id: "t".into(), name: "errand".into(), color: "#EF4444".into() }],
        ..Default::default()
    };
    assert_eq!(view_title(&state, ViewType::Project, Some("p")), "Renovate");
    assert_eq!(view_title(&state, ViewType::Area, Some("a")), "Home");
    assert_eq!(view_title(&state, ViewType::Tag, Some("t")), "errand");
    assert_eq!(view_title(&state, ViewType::Project, Some("gone")), "Project");
    assert_eq!(view_title(&state, ViewType::Today, None), "Today");
}

#[test]
fn test_overdue_deadline() {
    let today = date("2024-01-02");
    let mut t = task("t", TaskStatus::Anytime, 0.0);
    t.deadline = Some(date("2024-01-01"));
    assert!(t.is_overdue(today));
    t.deadline = Some(today);
    assert!(!t.is_overdue(today));
    t.deadline = Some(date("2024-01-01"));
    t.status = TaskStatus::Completed;
    assert!(!t.is_overdue(today));
}

#[test]
fn test_whitespace_query_still_filters() {
    let today = date("2024-01-02");
    let tasks = vec![task("a b", TaskStatus::Anytime, 1.0), task("ab", TaskStatus::Anytime, 2.0)];
    assert_eq!(titles(&visible_tasks(&tasks, ViewType::Anytime, None, " ", today)), vec!["a b"]);
}

#[test]
fn test_scoped_view_without_scope_resolves_empty() {
    let today = date("2024-01-02");
    let tasks = vec![task("loose", TaskStatus::Anytime, 1.0)];
    for view in [ViewType::Project, ViewType::Area, ViewType::Tag] {
        assert!(resolve(&tasks, view, None, today).is_empty());
        assert!(visible_tasks(&tasks, view, None, "", today).is_empty());
    }
}
