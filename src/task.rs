use serde::{Deserialize, Serialize};

/// A single to-do item as it is stored and rendered.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    // never toggled, kept so stored records keep their shape
    pub completed: bool,
}

impl Task {
    pub fn new(id: String, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// True when the text holds something other than whitespace.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Encodes the whole collection as a JSON array of task records.
pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

pub fn decode_tasks(raw: &str) -> serde_json::Result<Vec<Task>> {
    serde_json::from_str(raw)
}
