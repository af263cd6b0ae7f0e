// A parametric sketch editor core made with the Bevy game engine.
//
// Tools are identified by a closed `ToolId` table, described by the action
// catalog, built by the tool factory and run one at a time by the editing
// session in `core::session`.

pub mod core;
pub mod document;
pub mod editing;
pub mod systems;
pub mod tools;
pub mod utils;

pub use crate::core::{create_app, CliArgs, Core, EditorRequest, Settings};
pub use crate::document::Document;
pub use crate::tools::{verify_registry, Tool, ToolId};
