//! Managing undo state

use std::collections::VecDeque;

/// A bounded stack of states that can be undone and redone.
#[derive(Debug, Clone)]
pub struct UndoState<T: Clone> {
    /// Maximum number of states to store, the live one included.
    max_undo_count: usize,
    stack: VecDeque<T>,
    /// The index in `stack` of the current state.
    live_index: usize,
}

impl<T: Clone> UndoState<T> {
    /// Create a new undo state holding at most `max_undo_count` states.
    pub fn new_sized(max_undo_count: usize, init_state: T) -> Self {
        let mut stack = VecDeque::new();
        stack.push_back(init_state);
        UndoState {
            max_undo_count: max_undo_count.max(1),
            stack,
            live_index: 0,
        }
    }

    /// Undo the last action, returning the previous state.
    pub fn undo(&mut self) -> Option<&T> {
        if self.live_index == 0 {
            return None;
        }
        self.live_index -= 1;
        self.stack.get(self.live_index)
    }

    /// Redo a previously undone action, returning the state to revert to.
    pub fn redo(&mut self) -> Option<&T> {
        if self.live_index + 1 >= self.stack.len() {
            return None;
        }
        self.live_index += 1;
        self.stack.get(self.live_index)
    }

    /// Add a new state to the undo stack.
    pub fn push(&mut self, item: T) {
        // Editing after an undo discards the redo branch
        self.stack.truncate(self.live_index + 1);

        self.stack.push_back(item);
        self.live_index = self.stack.len() - 1;

        // If we exceed the max number of undo states, remove the oldest one
        if self.stack.len() > self.max_undo_count {
            self.stack.pop_front();
            self.live_index -= 1;
        }
    }

    /// The state the document currently corresponds to.
    pub fn current(&self) -> Option<&T> {
        self.stack.get(self.live_index)
    }

    pub fn can_undo(&self) -> bool {
        self.live_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.live_index + 1 < self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
