#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single task on the shift-handover checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandoverItem {
    /// Locally assigned id, unique within the current list. Not persisted
    /// across process restarts.
    pub id: u32,
    /// Task description
    pub task: String,
    /// Completion flag, toggled only by explicit user action
    pub is_completed: bool,
}

/// Ordered in-memory checklist of handover tasks, most recent first.
///
/// The checklist performs no input validation; blank tasks are guarded at
/// the boundary that accepts user input. All mutations are synchronous and
/// single-writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandoverChecklist {
    items: Vec<HandoverItem>,
    /// Highest id ever assigned or seen. Keeps ids strictly increasing
    /// even after deletions.
    next_id: u32,
}

impl HandoverChecklist {
    /// Creates an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a checklist from existing items, normalized to the same
    /// most-recent-first order `add` maintains.
    pub fn from_items(mut items: Vec<HandoverItem>) -> Self {
        items.sort_by_key(|item| std::cmp::Reverse(item.id));
        let next_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        Self { items, next_id }
    }

    /// Current items, most recent first.
    pub fn items(&self) -> &[HandoverItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a new pending task at the head of the list and returns its id.
    pub fn add(&mut self, task: impl Into<String>) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.insert(
            0,
            HandoverItem {
                id,
                task: task.into(),
                is_completed: false,
            },
        );
        id
    }

    /// Flips the completion flag of the matching item. Unknown ids are a
    /// no-op, not an error.
    pub fn toggle(&mut self, id: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.is_completed = !item.is_completed;
        }
    }

    /// Removes the matching item. Unknown ids are a no-op, not an error.
    pub fn delete(&mut self, id: u32) {
        self.items.retain(|item| item.id != id);
    }
}
