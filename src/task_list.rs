use crate::clock::{Clock, IdGenerator};
use crate::task::Task;

/// The two answers the delete prompt offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    Cancel,
    Delete,
}

impl Choice {
    pub fn toggled(self) -> Self {
        match self {
            Choice::Cancel => Choice::Delete,
            Choice::Delete => Choice::Cancel,
        }
    }
}

/// An open delete prompt. It remembers the task by id, not by row, so the
/// answer applies to the task that was asked about even if rows shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub task_id: String,
    pub text: String,
    pub choice: Choice,
}

/// State behind the single task screen.
pub struct TaskList {
    pub draft: Task,
    pub tasks: Vec<Task>,
    pub selected: usize,
    pub pending_delete: Option<PendingDelete>,
    ids: IdGenerator,
}

impl TaskList {
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::default())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_ids(IdGenerator::new(clock))
    }

    fn with_ids(ids: IdGenerator) -> Self {
        Self {
            draft: Task::default(),
            tasks: Vec::new(),
            selected: 0,
            pending_delete: None,
            ids,
        }
    }

    /// Replaces the collection with what the store held at startup.
    pub fn apply_loaded(&mut self, tasks: Vec<Task>) {
        for task in &tasks {
            self.ids.observe(&task.id);
        }
        self.tasks = tasks;
        self.clamp_selection();
    }

    pub fn can_add(&self) -> bool {
        self.draft.has_text()
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.text.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.text.pop();
    }

    /// Appends the draft as a new task. Whitespace-only drafts are ignored.
    /// Returns whether the collection changed.
    pub fn add_task(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        let draft = std::mem::take(&mut self.draft);
        let id = self.ids.next_id();
        self.tasks.push(Task::new(id, draft.text));
        self.selected = self.tasks.len() - 1;
        true
    }

    /// Opens the delete prompt for the task currently at `index`.
    pub fn request_delete(&mut self, index: usize) -> bool {
        let Some(task) = self.tasks.get(index) else {
            return false;
        };
        self.pending_delete = Some(PendingDelete {
            task_id: task.id.clone(),
            text: task.text.clone(),
            choice: Choice::Cancel,
        });
        true
    }

    pub fn toggle_choice(&mut self) {
        if let Some(pending) = self.pending_delete.as_mut() {
            pending.choice = pending.choice.toggled();
        }
    }

    /// Answers the open prompt with its highlighted choice.
    pub fn resolve_delete(&mut self) -> Option<Task> {
        match self.pending_delete.as_ref().map(|p| p.choice) {
            Some(Choice::Delete) => self.confirm_delete(),
            Some(Choice::Cancel) => {
                self.cancel_delete();
                None
            }
            None => None,
        }
    }

    /// Removes the prompted task, looked up by id. A task that has since
    /// disappeared is left alone.
    pub fn confirm_delete(&mut self) -> Option<Task> {
        let pending = self.pending_delete.take()?;
        let index = self.tasks.iter().position(|t| t.id == pending.task_id)?;
        let removed = self.tasks.remove(index);
        self.clamp_selection();
        Some(removed)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Header count, e.g. "1 task" or "3 tasks".
    pub fn count_label(&self) -> String {
        let n = self.tasks.len();
        format!("{} task{}", n, if n == 1 { "" } else { "s" })
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}
