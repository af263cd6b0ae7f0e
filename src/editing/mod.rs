//! Editing state shared by all tools: selection and undo history.

pub mod history;
pub mod selection;
pub mod undo;

pub use history::{DocumentHistory, HistoryEntry};
pub use selection::{SelectableKind, SelectableRef, Selection};
pub use undo::UndoState;
