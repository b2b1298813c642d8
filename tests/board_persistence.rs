//! Integration tests for boards persisted in a profile's file store

use chrono::NaiveDate;
use serial_test::serial;
use taskflow::board::{StorageKey, TaskStatus, TaskStore};
use taskflow::cli::{open_board, resolve_task};
use taskflow::identity::{adopt_identity, cached_identity, IDENTITY_KEY};
use taskflow::storage::{FileStore, KeyValueStore};

fn setup_temp_home() -> tempfile::TempDir {
    let temp = tempfile::TempDir::new().unwrap();
    std::env::set_var("HOME", temp.path());
    temp
}

#[test]
#[serial]
fn test_buy_milk_cycle_survives_reopen() {
    let _temp = setup_temp_home();

    let mut board = open_board("test", None).unwrap();
    let task = board.add("Buy milk").unwrap();
    board.advance(&task.id);
    board.advance(&task.id);
    drop(board);

    let board = open_board("test", None).unwrap();
    assert!(board.key().is_anonymous());
    assert_eq!(board.tasks().len(), 1);
    assert_eq!(board.tasks()[0].status, TaskStatus::Done);
    assert_eq!(board.stats().completion_rate, 100);
}

#[test]
#[serial]
fn test_profiles_are_isolated() {
    let _temp = setup_temp_home();

    open_board("work", None).unwrap().add("ship it");
    let personal = open_board("personal", None).unwrap();
    assert!(personal.tasks().is_empty());
}

#[test]
#[serial]
fn test_identity_override_uses_its_own_key() {
    let _temp = setup_temp_home();

    open_board("test", Some("laptop")).unwrap().add("laptop task");
    open_board("test", None).unwrap().add("anonymous task");

    let laptop = open_board("test", Some("laptop")).unwrap();
    assert_eq!(laptop.key().as_str(), "taskflow-data-laptop");
    assert_eq!(laptop.tasks().len(), 1);
    assert_eq!(laptop.tasks()[0].text, "laptop task");
}

#[test]
#[serial]
fn test_identify_migrates_anonymous_board_on_disk() {
    let _temp = setup_temp_home();

    let mut board = open_board("test", None).unwrap();
    board.add("first");
    board.add("second");
    drop(board);

    let mut board = TaskStore::open(FileStore::new("test").unwrap(), StorageKey::anonymous());
    assert_eq!(adopt_identity(&mut board, "192.0.2.44").unwrap(), 2);
    drop(board);

    let store = FileStore::new("test").unwrap();
    assert_eq!(cached_identity(&store).as_deref(), Some("192.0.2.44"));
    assert_eq!(store.get("taskflow-data").unwrap(), None);

    // Later invocations pick the cached identity up on their own
    let board = open_board("test", None).unwrap();
    assert_eq!(board.key().as_str(), "taskflow-data-192.0.2.44");
    let texts: Vec<&str> = board.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
#[serial]
fn test_blank_cached_identity_stays_anonymous() {
    let _temp = setup_temp_home();

    let mut store = FileStore::new("test").unwrap();
    store.set(IDENTITY_KEY, "").unwrap();

    let board = open_board("test", None).unwrap();
    assert!(board.key().is_anonymous());
}

#[test]
#[serial]
fn test_resolve_task_against_saved_board() {
    let _temp = setup_temp_home();

    let mut board = open_board("test", None).unwrap();
    let milk = board.add("Buy milk").unwrap();
    board.add("Call mom");
    board.add("Call mom");

    let found = resolve_task("Buy milk", board.tasks()).unwrap();
    assert_eq!(found.id, milk.id);

    let found = resolve_task(milk.id.short(), board.tasks()).unwrap();
    assert_eq!(found.id, milk.id);

    let err = resolve_task("Call mom", board.tasks()).unwrap_err();
    assert!(err.to_string().contains("matches 2 tasks"));
}

#[test]
#[serial]
fn test_legacy_board_ids_stay_stable_across_runs() {
    let _temp = setup_temp_home();

    let mut backend = FileStore::new("test").unwrap();
    backend
        .set(
            StorageKey::anonymous().as_str(),
            r#"[{"text":"old task","status":"todo"}]"#,
        )
        .unwrap();

    let first = open_board("test", None).unwrap();
    let short = first.tasks()[0].id.short().to_string();

    let second = open_board("test", None).unwrap();
    let found = resolve_task(&short, second.tasks()).unwrap();
    assert_eq!(found.text, "old task");
    assert_eq!(found.id, first.tasks()[0].id);
}

#[test]
#[serial]
fn test_export_writes_dated_backup() {
    let temp = setup_temp_home();

    let mut board = open_board("test", None).unwrap();
    board.add("keep me");

    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let path = board.export(temp.path(), day).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str(),
        Some("taskflow-backup-2024-03-09.json")
    );

    let content = std::fs::read_to_string(path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed[0]["text"], "keep me");
    assert_eq!(parsed[0]["status"], "todo");
}
