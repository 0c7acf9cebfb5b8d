use gtdust::commands::*;
use gtdust::models::{TaskStatus, ViewType};
use gtdust::storage::JsonFileStorage;
use gtdust::store::Store;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut db_path = env::temp_dir();
    db_path.push(format!("gtdust_test_{}.json", test_name));

    env::set_var("GTD_STORE", db_path.to_str().unwrap());

    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }

    f(db_path.clone());

    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
    env::remove_var("GTD_STORE");
}

fn open() -> Store {
    Store::open(JsonFileStorage::at_default_location())
}

#[test]
fn test_add_and_reload() {
    with_test_db("add_reload", |path| {
        let mut store = open();
        let id = cmd_add(&mut store, "Test Task".into(), TaskInput::default(), true).unwrap();
        assert!(path.exists());

        let store = open();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.task(&id).unwrap().title, "Test Task");
        assert_eq!(store.task(&id).unwrap().status, TaskStatus::Inbox);
    });
}

#[test]
fn test_add_resolves_names() {
    with_test_db("add_names", |_path| {
        let mut store = open();
        let p = cmd_project_add(&mut store, "Garden".into(), None, None, None, true).unwrap();
        let a = cmd_area_add(&mut store, "Home", true);
        let t = cmd_tag_add(&mut store, "outside", None, true).unwrap();

        let input = TaskInput {
            status: Some("anytime".into()),
            project: Some("garden".into()),
            area: Some(a[..4].to_string()),
            tags: vec!["Outside".into()],
            when: Some("2030-06-01".into()),
            repeat: Some("weekly".into()),
            every: Some(2),
            ..Default::default()
        };
        let id = cmd_add(&mut store, "Plant".into(), input, true).unwrap();

        let store = open();
        let task = store.task(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Anytime);
        assert_eq!(task.project_id.as_deref(), Some(p.as_str()));
        assert_eq!(task.area_id.as_deref(), Some(a.as_str()));
        assert_eq!(task.tags, vec![t]);
        assert_eq!(task.scheduled_date.unwrap().to_string(), "2030-06-01");
        assert_eq!(task.repeat_rule.as_ref().unwrap().interval, 2);
    });
}

#[test]
fn test_add_rejects_bad_input() {
    let mut store = Store::in_memory();
    let scheduled = TaskInput { status: Some("scheduled".into()), ..Default::default() };
    assert!(cmd_add(&mut store, "x".into(), scheduled, true).is_err());

    let bad_date = TaskInput { deadline: Some("next week".into()), ..Default::default() };
    assert!(cmd_add(&mut store, "x".into(), bad_date, true).is_err());

    let unknown_project = TaskInput { project: Some("nowhere".into()), ..Default::default() };
    assert!(cmd_add(&mut store, "x".into(), unknown_project, true).is_err());

    let zero_interval = TaskInput { repeat: Some("daily".into()), every: Some(0), ..Default::default() };
    assert!(cmd_add(&mut store, "x".into(), zero_interval, true).is_err());

    assert!(store.tasks().is_empty());
}

#[test]
fn test_id_prefix_resolution() {
    let mut store = Store::in_memory();
    let id = cmd_add(&mut store, "Prefix".into(), TaskInput::default(), true).unwrap();

    assert_eq!(find_task_id(&store, &id).unwrap(), id);
    assert_eq!(find_task_id(&store, &id[..8]).unwrap(), id);
    assert!(find_task_id(&store, "zzzz").is_err());
    assert!(find_task_id(&store, "").is_err());
}

#[test]
fn test_edit_sets_and_clears_fields() {
    let mut store = Store::in_memory();
    let p = cmd_project_add(&mut store, "Work".into(), None, None, None, true).unwrap();
    let urgent = cmd_tag_add(&mut store, "urgent", None, true).unwrap();
    let later = cmd_tag_add(&mut store, "later", None, true).unwrap();
    let input = TaskInput {
        project: Some(p.clone()),
        tags: vec!["urgent".into(), "later".into()],
        when: Some("2030-01-01".into()),
        deadline: Some("2030-02-01".into()),
        ..Default::default()
    };
    let id = cmd_add(&mut store, "Report".into(), input, true).unwrap();

    let edit = TaskEdit {
        title: Some("Quarterly report".into()),
        untag: vec!["later".into()],
        no_project: true,
        no_when: true,
        ..Default::default()
    };
    cmd_edit(&mut store, &id[..6], edit, true).unwrap();

    let t = store.task(&id).unwrap();
    assert_eq!(t.title, "Quarterly report");
    assert!(t.project_id.is_none());
    assert!(t.scheduled_date.is_none());
    assert_eq!(t.deadline.unwrap().to_string(), "2030-02-01");
    assert_eq!(t.tags, vec![urgent]);
    assert!(!t.tags.contains(&later));
}

#[test]
fn test_edit_status_keeps_completion_time_consistent() {
    let mut store = Store::in_memory();
    let id = cmd_add(&mut store, "x".into(), TaskInput::default(), true).unwrap();
    let complete = TaskEdit {
        fields: TaskInput { status: Some("completed".into()), ..Default::default() },
        ..Default::default()
    };
    cmd_edit(&mut store, &id, complete, true).unwrap();
    assert!(store.task(&id).unwrap().completed_at.is_some());

    let reopen = TaskEdit {
        fields: TaskInput { status: Some("today".into()), ..Default::default() },
        ..Default::default()
    };
    cmd_edit(&mut store, &id, reopen, true).unwrap();
    let t = store.task(&id).unwrap();
    assert_eq!(t.status, TaskStatus::Today);
    assert!(t.completed_at.is_none());
}

#[test]
fn test_lifecycle_commands() {
    with_test_db("lifecycle", |_path| {
        let mut store = open();
        let id = cmd_add(&mut store, "Cycle".into(), TaskInput::default(), true).unwrap();

        cmd_complete(&mut store, &id, true).unwrap();
        cmd_uncomplete(&mut store, &id, true).unwrap();
        cmd_trash(&mut store, &id, true).unwrap();
        assert_eq!(open().task(&id).unwrap().status, TaskStatus::Trash);

        cmd_restore(&mut store, &id, true).unwrap();
        assert_eq!(open().task(&id).unwrap().status, TaskStatus::Inbox);

        cmd_delete(&mut store, &id, true).unwrap();
        assert!(open().tasks().is_empty());
        assert!(cmd_complete(&mut store, &id, true).is_err());
    });
}

#[test]
fn test_checklist_commands() {
    let mut store = Store::in_memory();
    let id = cmd_add(&mut store, "Pack".into(), TaskInput::default(), true).unwrap();
    let item = cmd_checklist_add(&mut store, &id, "socks", true).unwrap();

    cmd_checklist_toggle(&mut store, &id, &item[..8], true).unwrap();
    cmd_checklist_edit(&mut store, &id, &item, "wool socks".into(), true).unwrap();
    let t = store.task(&id).unwrap();
    assert!(t.checklist[0].completed);
    assert_eq!(t.checklist[0].title, "wool socks");

    assert!(cmd_checklist_toggle(&mut store, &id, "missing", true).is_err());
    cmd_checklist_remove(&mut store, &id, &item, true).unwrap();
    assert!(store.task(&id).unwrap().checklist.is_empty());
}

#[test]
fn test_reorder_command() {
    let mut store = Store::in_memory();
    let a = cmd_add(&mut store, "a".into(), TaskInput::default(), true).unwrap();
    let b = cmd_add(&mut store, "b".into(), TaskInput::default(), true).unwrap();

    cmd_reorder(&mut store, &[b.clone(), a.clone()], true).unwrap();
    let inbox: Vec<&str> = store.view_tasks(ViewType::Inbox, None).iter().map(|t| t.title.as_str()).collect();
    assert_eq!(inbox, vec!["b", "a"]);

    assert!(cmd_reorder(&mut store, &[a, "ghost".into()], true).is_err());
}

#[test]
fn test_view_command() {
    let mut store = Store::in_memory();
    let p = cmd_project_add(&mut store, "Launch".into(), None, None, None, true).unwrap();

    cmd_view(&mut store, "today", None, true).unwrap();
    assert_eq!(store.state().current_view, ViewType::Today);

    cmd_view(&mut store, "project", Some("launch"), true).unwrap();
    assert_eq!(store.state().current_view, ViewType::Project);
    assert_eq!(store.state().selected_item_id.as_deref(), Some(p.as_str()));

    assert!(cmd_view(&mut store, "project", None, true).is_err());
    assert!(cmd_view(&mut store, "today", Some("launch"), true).is_err());
    assert!(cmd_view(&mut store, "sometime", None, true).is_err());
}

#[test]
fn test_tag_color_validation() {
    let mut store = Store::in_memory();
    assert!(cmd_tag_add(&mut store, "bad", Some("red".into()), true).is_err());
    let id = cmd_tag_add(&mut store, "good", Some("#112233".into()), true).unwrap();
    assert_eq!(store.tag(&id).unwrap().color, "#112233");
    assert!(cmd_tag_edit(&mut store, "good", None, Some("#12".into()), true).is_err());
    cmd_tag_edit(&mut store, "good", Some("fine".into()), None, true).unwrap();
    assert_eq!(store.tag(&id).unwrap().name, "fine");
}

#[test]
fn test_remove_containers_detaches_tasks() {
    with_test_db("remove_containers", |_path| {
        let mut store = open();
        cmd_project_add(&mut store, "P".into(), None, None, None, true).unwrap();
        cmd_area_add(&mut store, "A", true);
        cmd_tag_add(&mut store, "T", None, true).unwrap();
        let input = TaskInput {
            project: Some("P".into()),
            area: Some("A".into()),
            tags: vec!["T".into()],
            ..Default::default()
        };
        let id = cmd_add(&mut store, "held".into(), input, true).unwrap();

        cmd_project_remove(&mut store, "P", true).unwrap();
        cmd_area_remove(&mut store, "A", true).unwrap();
        cmd_tag_remove(&mut store, "T", true).unwrap();

        let store = open();
        let t = store.task(&id).unwrap();
        assert!(t.project_id.is_none());
        assert!(t.area_id.is_none());
        assert!(t.tags.is_empty());
        assert!(store.projects().is_empty());
        assert!(store.areas().is_empty());
        assert!(store.tags().is_empty());
    });
}

#[test]
fn test_clear_commands() {
    let mut store = Store::in_memory();
    let done = cmd_add(&mut store, "done".into(), TaskInput::default(), true).unwrap();
    let binned = cmd_add(&mut store, "binned".into(), TaskInput::default(), true).unwrap();
    cmd_add(&mut store, "open".into(), TaskInput::default(), true).unwrap();
    cmd_complete(&mut store, &done, true).unwrap();
    cmd_trash(&mut store, &binned, true).unwrap();

    cmd_clear_completed(&mut store, true);
    cmd_empty_trash(&mut store, true);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "open");
}

#[test]
fn test_parse_date_keywords() {
    let today = gtdust::views::today();
    assert_eq!(parse_date("today").unwrap(), today);
    assert_eq!(parse_date("Tomorrow").unwrap(), today.succ_opt().unwrap());
    assert!(parse_date("2024-13-01").is_err());
}

#[test]
fn test_listing_multibyte_ids() {
    use gtdust::models::{AppState, Area, Tag, Task};

    let mut short = Task::new("short");
    short.id = "任务任务".into();
    let mut long = Task::new("long");
    long.id = "任务任务任务任务任务".into();
    let state = AppState {
        tasks: vec![short, long],
        areas: vec![Area { id: "区域区域区域区域区域".into(), title: "Home".into(), order: 1.0 }],
        tags: vec![Tag { id: "标签标签标签标签标签".into(), name: "errand".into(), color: "#EF4444".into() }],
        ..Default::default()
    };
    let mut store = Store::from_state(state);

    cmd_list(&store, Some("inbox"), None, None).unwrap();
    cmd_show(&store, "任务任务").unwrap();
    cmd_show(&store, "任务任务任务").unwrap();
    cmd_area_list(&store);
    cmd_tag_list(&store);
    cmd_complete(&mut store, "任务任务任务任务任务", false).unwrap();
    assert_eq!(store.task("任务任务任务任务任务").unwrap().status, TaskStatus::Completed);
}
