//! Tools
//!
//! A tool is one interactive editing operation: drawing a line, adding a
//! constraint, extruding a face. This module holds everything needed to find,
//! describe and run them:
//!
//! 1. **Identity** (`tool_id`): the closed set of `ToolId`s with stable codes
//! 2. **Catalog** (`catalog`): display metadata and the name lookup tables
//! 3. **Factory** (`factory`): builds a tool from its id and verifies the
//!    registry at start-up
//! 4. **Lifecycle** (`tool`, `instance`): the `Tool` trait and the state
//!    machine every running tool goes through
//!
//! ## Adding New Tools
//!
//! 1. Add a variant with a new code to `ToolId`
//! 2. Add its catalog entry in `catalog.rs`
//! 3. Implement `Tool` in its own file and add the factory arm
//!
//! Missing the factory arm is a compile error; a missing catalog entry fails
//! `verify_registry` when the application starts.

pub mod catalog;
pub mod common;
pub mod constrain;
pub mod construction;
pub mod context;
pub mod delete;
pub mod draw_circle;
pub mod draw_line;
pub mod draw_point;
pub mod draw_rectangle;
pub mod draw_workplane;
pub mod enter_datum;
pub mod extrude;
pub mod factory;
pub mod instance;
pub mod move_items;
pub mod tool;
pub mod tool_id;
pub mod workplane;

pub use catalog::{
    action_catalog, action_lut, catalog_item, tool_lut, ActionCatalogItem, ActionFlags,
    ActionGroup, ActionId, ActionToolId, InToolActionId,
};
pub use context::{EditorInterface, LoggingInterface, NullInterface, ToolContext, ToolView};
pub use factory::{create_tool, verify_registry};
pub use instance::{LifecycleState, ToolInstance};
pub use tool::{CanBegin, Tool, ToolArgs, ToolData, ToolEvent, ToolFlags, ToolResponse};
pub use tool_id::ToolId;
