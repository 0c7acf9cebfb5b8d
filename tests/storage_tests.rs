use std::fs;

use gtdust::models::{NewProject, NewTask, TaskStatus, ViewType};
use gtdust::storage::{decode_state, encode_state, JsonFileStorage, MemoryStorage, Storage};
use gtdust::store::Store;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn test_missing_slot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("gtd-storage.json"));
    assert!(storage.load().unwrap().is_none());

    let store = Store::open(storage);
    assert!(store.tasks().is_empty());
    assert_eq!(store.state().current_view, ViewType::Inbox);
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gtd-storage.json");

    let mut store = Store::open(JsonFileStorage::new(&path));
    let p = store.add_project(NewProject { title: "Trip".into(), ..Default::default() });
    let t = store.add_task(NewTask { project_id: Some(p.clone()), ..NewTask::titled("book flights") });
    store.add_checklist_item(&t, "compare prices");
    store.complete_task(&t);
    store.set_current_view(ViewType::Project, Some(p.clone()));
    let saved = store.into_state();

    let reopened = Store::open(JsonFileStorage::new(&path));
    assert_eq!(reopened.state(), &saved);
    assert_eq!(reopened.task(&t).unwrap().status, TaskStatus::Completed);
    assert_eq!(reopened.state().selected_item_id.as_deref(), Some(p.as_str()));
}

#[test]
fn test_corrupt_slot_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gtd-storage.json");
    fs::write(&path, "{ not json").unwrap();

    let storage = JsonFileStorage::new(&path);
    assert!(storage.load().is_err());

    let mut store = Store::open(storage);
    assert!(store.tasks().is_empty());

    store.add_task(NewTask::titled("fresh"));
    let reloaded = JsonFileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(reloaded.tasks.len(), 1);
}

#[test]
fn test_empty_file_is_a_missing_slot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gtd-storage.json");
    fs::write(&path, "  \n").unwrap();
    assert!(JsonFileStorage::new(&path).load().unwrap().is_none());
}

#[test]
fn test_every_mutation_is_mirrored() {
    let storage = MemoryStorage::new();
    let mut store = Store::open(storage.clone());
    assert!(storage.raw().is_none());

    let id = store.add_task(NewTask::titled("a"));
    assert_eq!(decode_state(&storage.raw().unwrap()).unwrap().tasks.len(), 1);

    store.move_task_to_trash(&id);
    let mirrored = decode_state(&storage.raw().unwrap()).unwrap();
    assert_eq!(mirrored.tasks[0].status, TaskStatus::Trash);

    store.toggle_sidebar();
    assert!(decode_state(&storage.raw().unwrap()).unwrap().sidebar_collapsed);

    store.empty_trash();
    assert_eq!(&decode_state(&storage.raw().unwrap()).unwrap(), store.state());
}

#[test]
fn test_slot_layout_uses_camel_case_envelope() {
    let mut store = Store::in_memory();
    let id = store.add_task(NewTask { scheduled_date: Some("2024-05-01".parse().unwrap()), ..NewTask::titled("x") });
    store.complete_task(&id);

    let raw = encode_state(store.state()).unwrap();
    let v: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["version"], 0);
    let state = &v["state"];
    assert_eq!(state["currentView"], "inbox");
    assert!(state.get("sidebarCollapsed").is_some());
    assert!(state.get("isQuickEntryOpen").is_some());
    let task = &state["tasks"][0];
    assert_eq!(task["status"], "completed");
    assert_eq!(task["scheduledDate"], "2024-05-01");
    assert!(task["completedAt"].is_string());
    assert!(task["projectId"].is_null());
    assert!(task.get("createdAt").is_some());
}

#[test]
fn test_bare_state_is_accepted() {
    let raw = r##"{
        "tasks": [{
            "id": "t1",
            "title": "legacy",
            "status": "today",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "order": 3
        }],
        "tags": [{"id": "g", "name": "home", "color": "#3B82F6"}],
        "currentView": "today"
    }"##;
    let storage = MemoryStorage::with_raw(raw);
    let store = Store::open(storage);

    let t = store.task("t1").unwrap();
    assert_eq!(t.title, "legacy");
    assert_eq!(t.status, TaskStatus::Today);
    assert_eq!(t.order, 3.0);
    assert!(t.tags.is_empty());
    assert_eq!(store.tags().len(), 1);
    assert_eq!(store.state().current_view, ViewType::Today);
}

#[test]
fn test_delete_removes_slot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gtd-storage.json");
    let mut store = Store::open(JsonFileStorage::new(&path));
    store.add_task(NewTask::titled("gone soon"));
    assert!(path.exists());

    JsonFileStorage::new(&path).delete().unwrap();
    assert!(!path.exists());
    assert!(Store::open(JsonFileStorage::new(&path)).tasks().is_empty());
}

#[test]
fn test_broken_envelope_is_corrupt() {
    let raw = r#"{ "state": { "tasks": "not a list" }, "version": 0 }"#;
    assert!(decode_state(raw).is_err());

    let storage = MemoryStorage::with_raw(raw);
    assert!(storage.load().is_err());
    let store = Store::open(storage.clone());
    assert!(store.tasks().is_empty());
    assert_eq!(storage.raw().as_deref(), Some(raw));
}

#[test]
fn test_envelope_without_version_loads() {
    let raw = r#"{ "state": { "currentView": "someday" } }"#;
    assert_eq!(decode_state(raw).unwrap().current_view, ViewType::Someday);
}
