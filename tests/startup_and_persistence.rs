use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use tasklist::app::{App, Outcome};
use tasklist::persistence::TASKS_KEY;
use tasklist::store::{FileStore, KeyValueStore, MemoryStore};
use tasklist::task::{decode_tasks, encode_tasks, Task};
use tasklist::task_list::TaskList;
use tokio::runtime::Handle;

async fn settle(app: &mut App) {
    for _ in 0..200 {
        app.poll_restore();
        if !app.is_restoring() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("startup load never landed");
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_and_submit(app: &mut App, text: &str) -> Outcome {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter))
}

fn texts(app: &App) -> Vec<&str> {
    app.list.tasks.iter().map(|t| t.text.as_str()).collect()
}

#[tokio::test]
async fn stored_tasks_are_shown_in_stored_order() {
    let stored = vec![
        Task::new("1".into(), "first".into()),
        Task::new("2".into(), "second".into()),
        Task::new("3".into(), "third".into()),
    ];
    let store = Arc::new(MemoryStore::with_entry(
        TASKS_KEY,
        encode_tasks(&stored).unwrap(),
    ));

    let mut app = App::start(&Handle::current(), store.clone(), TaskList::new());
    settle(&mut app).await;

    assert_eq!(app.list.tasks, stored);
    app.shutdown().await;

    // the landed collection is written back once
    let writes = store.write_log();
    assert_eq!(writes.len(), 1);
    assert_eq!(decode_tasks(&writes[0]).unwrap(), stored);
}

#[tokio::test]
async fn failed_read_leaves_an_empty_list() {
    let store = Arc::new(MemoryStore::new());
    store.fail_reads(true);

    let mut app = App::start(&Handle::current(), store.clone(), TaskList::new());
    settle(&mut app).await;
    assert!(app.list.tasks.is_empty());

    // the app keeps working and saving after a failed load
    assert_eq!(type_and_submit(&mut app, "still works"), Outcome::Changed);
    app.shutdown().await;
    let saved = decode_tasks(&store.peek(TASKS_KEY).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn corrupt_stored_value_leaves_an_empty_list() {
    let store = Arc::new(MemoryStore::with_entry(TASKS_KEY, "[{\"id\":"));
    let mut app = App::start(&Handle::current(), store.clone(), TaskList::new());
    settle(&mut app).await;

    assert!(app.list.tasks.is_empty());
    app.shutdown().await;
    // nothing changed, so the corrupt value is not overwritten
    assert_eq!(store.peek(TASKS_KEY).as_deref(), Some("[{\"id\":"));
}

#[tokio::test]
async fn failed_writes_keep_the_change_on_screen() {
    let store = Arc::new(MemoryStore::new());
    store.fail_writes(true);

    let mut app = App::start(&Handle::current(), store.clone(), TaskList::new());
    settle(&mut app).await;
    type_and_submit(&mut app, "unsaved");

    assert_eq!(texts(&app), vec!["unsaved"]);
    app.shutdown().await;
    assert!(store.peek(TASKS_KEY).is_none());
}

#[tokio::test]
async fn add_and_delete_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks_store.json");

    {
        let mut app = App::start(
            &Handle::current(),
            Arc::new(FileStore::new(&path)),
            TaskList::new(),
        );
        settle(&mut app).await;
        for text in ["A", "B", "C"] {
            assert_eq!(type_and_submit(&mut app, text), Outcome::Changed);
        }
        assert_eq!(type_and_submit(&mut app, "   "), Outcome::Unchanged);

        // select "B", ask to delete it, pick Delete, confirm
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Delete));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Outcome::Changed);
        assert_eq!(texts(&app), vec!["A", "C"]);
        assert_eq!(app.list.count_label(), "2 tasks");
        app.shutdown().await;
    }

    let store = Arc::new(FileStore::new(&path));
    let raw = store.get(TASKS_KEY).await.unwrap().unwrap();
    let saved = decode_tasks(&raw).unwrap();
    assert_eq!(
        saved.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
        vec!["A", "C"]
    );
    assert!(saved.iter().all(|t| !t.completed && !t.id.is_empty()));

    let mut app = App::start(&Handle::current(), store, TaskList::new());
    settle(&mut app).await;
    assert_eq!(app.list.tasks, saved);
    app.shutdown().await;
}

#[tokio::test]
async fn cancelled_delete_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut app = App::start(&Handle::current(), store.clone(), TaskList::new());
    settle(&mut app).await;
    type_and_submit(&mut app, "keep me");

    app.handle_key(key(KeyCode::Delete));
    assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Outcome::Unchanged);
    assert_eq!(texts(&app), vec!["keep me"]);

    app.shutdown().await;
    assert_eq!(store.write_log().len(), 1);
}
