//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and configuration
//! - The editing session that runs tools against a document
//! - Settings, key bindings and CLI handling
//! - Scripted editing

pub mod app;
pub mod cli;
pub mod errors;
pub mod keys;
pub mod script;
pub mod session;
pub mod settings;

// Re-export commonly used items
pub use app::create_app;
pub use cli::CliArgs;
pub use keys::{KeyLookup, KeySequence, Keymap};
pub use script::{ScriptCommand, ScriptReport, ScriptRunner};
pub use session::{CanBeginInfo, Core, CoreEvent, EditorRequest};
pub use settings::Settings;
