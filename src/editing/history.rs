//! Document history: one snapshot per committed tool or action.

use chrono::{DateTime, Local};
use std::sync::Arc;

use super::undo::UndoState;
use crate::document::Document;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: Arc<Document>,
    /// Display name of the tool or action that produced this state.
    pub comment: String,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    fn new(document: &Document, comment: &str) -> Self {
        Self {
            document: Arc::new(document.clone()),
            comment: comment.to_string(),
            timestamp: Local::now(),
        }
    }
}

/// Snapshots of the whole document. The live entry is always the state the
/// document had after the last commit, undo or redo.
#[derive(Debug, Clone)]
pub struct DocumentHistory {
    undo: UndoState<HistoryEntry>,
}

impl DocumentHistory {
    pub fn new(document: &Document, max_depth: usize) -> Self {
        Self {
            undo: UndoState::new_sized(max_depth, HistoryEntry::new(document, "init")),
        }
    }

    pub fn push(&mut self, document: &Document, comment: &str) {
        self.undo.push(HistoryEntry::new(document, comment));
    }

    /// The document as of the last snapshot.
    pub fn last_snapshot(&self) -> Option<&Document> {
        self.undo.current().map(|entry| entry.document.as_ref())
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.undo.current()
    }

    /// Steps back, returning the comment of the undone entry and the
    /// document to restore.
    pub fn undo(&mut self) -> Option<(String, Document)> {
        let comment = self.undo.current()?.comment.clone();
        let entry = self.undo.undo()?;
        Some((comment, entry.document.as_ref().clone()))
    }

    pub fn redo(&mut self) -> Option<(String, Document)> {
        let entry = self.undo.redo()?;
        Some((entry.comment.clone(), entry.document.as_ref().clone()))
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}
