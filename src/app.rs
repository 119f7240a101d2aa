//! Glue between the task list, keyboard input and persistence.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::persistence::{spawn_restore, Persister};
use crate::store::KeyValueStore;
use crate::task::Task;
use crate::task_list::TaskList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    /// The collection changed and must be saved.
    Changed,
    Quit,
}

pub struct App {
    pub list: TaskList,
    persister: Persister,
    restoring: Option<oneshot::Receiver<Option<Vec<Task>>>>,
}

impl App {
    /// Starts the startup load and the background writer on `handle`.
    pub fn start(handle: &Handle, store: Arc<dyn KeyValueStore>, list: TaskList) -> Self {
        let restoring = Some(spawn_restore(handle, store.clone()));
        let persister = Persister::spawn(handle, store);
        Self {
            list,
            persister,
            restoring,
        }
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring.is_some()
    }

    /// Applies the startup load once it has landed. A landed collection
    /// replaces the current one and is written back like any other change.
    pub fn poll_restore(&mut self) -> bool {
        let Some(rx) = self.restoring.as_mut() else {
            return false;
        };
        match rx.try_recv() {
            Ok(Some(tasks)) => {
                self.restoring = None;
                self.list.apply_loaded(tasks);
                self.persister.save(&self.list.tasks);
                true
            }
            Ok(None) | Err(TryRecvError::Closed) => {
                self.restoring = None;
                false
            }
            Err(TryRecvError::Empty) => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        let outcome = handle_key(&mut self.list, key);
        if outcome == Outcome::Changed {
            self.persister.save(&self.list.tasks);
        }
        outcome
    }

    /// Waits for the last queued save to reach the store.
    pub async fn shutdown(self) {
        let version = self.persister.flush().await;
        info!(version, "task writer drained");
    }
}

/// Maps one key press onto the task list.
pub fn handle_key(list: &mut TaskList, key: KeyEvent) -> Outcome {
    if key.kind != KeyEventKind::Press {
        return Outcome::Unchanged;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Outcome::Quit;
    }

    if list.pending_delete.is_some() {
        return match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                list.toggle_choice();
                Outcome::Unchanged
            }
            KeyCode::Enter => changed_if(list.resolve_delete().is_some()),
            KeyCode::Char('y') => changed_if(list.confirm_delete().is_some()),
            KeyCode::Char('n') | KeyCode::Esc => {
                list.cancel_delete();
                Outcome::Unchanged
            }
            _ => Outcome::Unchanged,
        };
    }

    match key.code {
        KeyCode::Esc => Outcome::Quit,
        KeyCode::Enter => changed_if(list.add_task()),
        KeyCode::Backspace => {
            list.pop_char();
            Outcome::Unchanged
        }
        KeyCode::Up => {
            list.select_previous();
            Outcome::Unchanged
        }
        KeyCode::Down => {
            list.select_next();
            Outcome::Unchanged
        }
        KeyCode::Delete => {
            if list.request_delete(list.selected) {
                debug!(index = list.selected, "delete requested");
            }
            Outcome::Unchanged
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            list.push_char(c);
            Outcome::Unchanged
        }
        _ => Outcome::Unchanged,
    }
}

fn changed_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}
