//! View-state holder for the shift-handover checklist.

use std::sync::{Mutex, MutexGuard};

use log::{info, warn};
use shiftlog_core::handover::{HandoverChecklist, HandoverItem};

use crate::state::StateCell;

/// Observable state of the handover checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandoverListState {
    /// Checklist items, most recent first
    pub handover_items: Vec<HandoverItem>,
}

/// Wraps the checklist state machine behind copy-on-write published
/// snapshots.
///
/// The entire list is ephemeral; nothing survives a process restart. All
/// mutations are synchronous reactions to explicit user actions.
pub struct HandoverBoard {
    checklist: Mutex<HandoverChecklist>,
    state: StateCell<HandoverListState>,
}

impl Default for HandoverBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoverBoard {
    /// Creates a board with an empty checklist.
    pub fn new() -> Self {
        Self::with_checklist(HandoverChecklist::new())
    }

    /// Creates a board seeded with existing items, e.g. tasks carried over
    /// from the previous shift.
    pub fn seed(items: Vec<HandoverItem>) -> Self {
        Self::with_checklist(HandoverChecklist::from_items(items))
    }

    fn with_checklist(checklist: HandoverChecklist) -> Self {
        let state = StateCell::new(HandoverListState {
            handover_items: checklist.items().to_vec(),
        });
        Self {
            checklist: Mutex::new(checklist),
            state,
        }
    }

    /// Observable checklist state.
    pub fn state(&self) -> &StateCell<HandoverListState> {
        &self.state
    }

    /// Adds a task to the checklist. Blank tasks are ignored here, at the
    /// input boundary; the checklist itself performs no validation.
    pub fn add_item(&self, task: &str) {
        if task.trim().is_empty() {
            warn!("Ignored blank handover task");
            return;
        }
        self.apply(|checklist| {
            checklist.add(task);
        });
    }

    /// Toggles completion of the matching item; unknown ids are a no-op.
    pub fn toggle_item(&self, id: u32) {
        self.apply(|checklist| checklist.toggle(id));
    }

    /// Deletes the matching item; unknown ids are a no-op.
    pub fn delete_item(&self, id: u32) {
        self.apply(|checklist| checklist.delete(id));
    }

    /// Terminal inspection action: writes the current list to the audit
    /// log and leaves the checklist untouched.
    // TODO: persist the completed handover once a storage backend exists.
    pub fn complete_handover(&self) {
        let items = self.state.get().handover_items;
        if items.is_empty() {
            info!("No handover items to complete");
            return;
        }

        info!("Completing handover with {} items", items.len());
        for item in &items {
            info!(
                "  item {}: \"{}\" completed={}",
                item.id, item.task, item.is_completed
            );
        }
    }

    // Mutations run on the checklist under its lock, then the whole list is
    // published as a replacement snapshot.
    fn apply(&self, op: impl FnOnce(&mut HandoverChecklist)) {
        let snapshot = {
            let mut checklist = lock_or_recover(&self.checklist);
            op(&mut checklist);
            checklist.items().to_vec()
        };
        self.state.set(HandoverListState {
            handover_items: snapshot,
        });
    }
}

fn lock_or_recover<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn item(id: u32, task: &str, is_completed: bool) -> HandoverItem {
        HandoverItem {
            id,
            task: task.to_string(),
            is_completed,
        }
    }

    fn tasks(board: &HandoverBoard) -> Vec<String> {
        board
            .state()
            .get()
            .handover_items
            .iter()
            .map(|item| item.task.clone())
            .collect()
    }

    #[test]
    fn added_items_are_prepended() {
        let board = HandoverBoard::new();

        board.add_item("clean floor");
        assert_eq!(
            board.state().get().handover_items,
            vec![item(1, "clean floor", false)]
        );

        board.add_item("restock");
        assert_eq!(
            board.state().get().handover_items,
            vec![item(2, "restock", false), item(1, "clean floor", false)]
        );
    }

    #[test]
    fn blank_tasks_are_ignored_at_the_boundary() {
        let board = HandoverBoard::new();

        board.add_item("   ");
        board.add_item("\t");
        board.add_item("");

        assert!(board.state().get().handover_items.is_empty());
    }

    #[test]
    fn toggling_twice_restores_the_original_flag() {
        let board = HandoverBoard::new();
        board.add_item("count till");

        board.toggle_item(1);
        assert!(board.state().get().handover_items[0].is_completed);

        board.toggle_item(1);
        assert!(!board.state().get().handover_items[0].is_completed);
    }

    #[test]
    fn deleting_keeps_the_order_of_remaining_items() {
        let board = HandoverBoard::new();
        board.add_item("first");
        board.add_item("second");
        board.add_item("third");

        board.delete_item(2);

        assert_eq!(tasks(&board), ["third", "first"]);
    }

    #[test]
    fn ids_keep_increasing_across_the_board_lifetime() {
        let board = HandoverBoard::new();

        board.add_item("close register");
        board.delete_item(1);
        board.add_item("close register");

        assert_eq!(board.state().get().handover_items[0].id, 2);
    }

    #[test]
    fn seeded_items_are_normalized_to_most_recent_first() {
        let board = HandoverBoard::seed(vec![
            item(1, "mop the floor", false),
            item(3, "tidy drinks aisle", true),
            item(2, "check fridge dates", false),
        ]);

        let ids: Vec<u32> = board
            .state()
            .get()
            .handover_items
            .iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn complete_handover_leaves_the_list_unchanged() {
        let board = HandoverBoard::new();
        board.add_item("leave notes for next shift");
        board.toggle_item(1);
        let before = board.state().get();

        board.complete_handover();

        assert_eq!(board.state().get(), before);
    }

    #[test]
    fn complete_handover_on_an_empty_board_is_a_no_op() {
        let board = HandoverBoard::new();

        board.complete_handover();

        assert!(board.state().get().handover_items.is_empty());
    }

    #[test]
    fn subscribers_see_every_published_change() {
        let board = HandoverBoard::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = board
            .state()
            .subscribe(move |state: &HandoverListState| {
                sink.lock().unwrap().push(state.handover_items.len());
            });

        board.add_item("clean floor");
        board.add_item("restock");
        board.delete_item(1);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);
    }
}
