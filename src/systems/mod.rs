//! Bevy Systems and Plugins
//!
//! This module contains the Bevy side of the editor:
//! - Dispatch of editor requests to the editing session
//! - Events announcing tool changes and document rebuilds

pub mod commands;

// Re-export commonly used items
pub use commands::{
    DispatchSet, DocumentRebuilt, EditorCore, EditorKeymap, ToolChanged, ToolDispatchPlugin,
};
