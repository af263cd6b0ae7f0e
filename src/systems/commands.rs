//! commands.rs - Event-based dispatch of editor requests to the session
//!
//! This file connects the editing session to Bevy's event system:
//! 1. `EditorRequest` events (begin a tool, feed it input, run an action)
//!    are handed to the session held in the `EditorCore` resource
//! 2. What the session reports back is re-emitted as `ToolChanged` and
//!    `DocumentRebuilt` events for whoever presents the editor
//! 3. ToolDispatchPlugin checks the tool registry and registers it all
//!
//! To react to a finished tool, read `ToolChanged` or `DocumentRebuilt` in
//! a system that runs after `DispatchSet`.

use bevy::prelude::*;

use crate::core::errors::ToolError;
use crate::core::keys::Keymap;
use crate::core::session::{Core, CoreEvent, EditorRequest};
use crate::document::ItemId;
use crate::tools::factory::verify_registry;
use crate::tools::tool_id::ToolId;

/// The editing session as a Bevy resource.
#[derive(Resource, Debug)]
pub struct EditorCore(pub Core);

#[derive(Resource, Debug, Default)]
pub struct EditorKeymap(pub Keymap);

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ToolChanged {
    /// `None` once no tool is active.
    pub tool: Option<ToolId>,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DocumentRebuilt {
    pub comment: String,
    pub groups: Vec<ItemId>,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchSet;

pub struct ToolDispatchPlugin;

impl Plugin for ToolDispatchPlugin {
    fn build(&self, app: &mut App) {
        // Checked once at start-up; nothing later can fix a broken registry.
        if let Err(err) = verify_registry() {
            error!("Tool registry is inconsistent: {}", err);
            panic!("tool registry is inconsistent: {err}");
        }
        register_event_handlers(app);
    }
}

fn register_event_handlers(app: &mut App) {
    debug!("Registering editor request events");
    app.add_event::<EditorRequest>()
        .add_event::<ToolChanged>()
        .add_event::<DocumentRebuilt>()
        .init_resource::<EditorKeymap>()
        .add_systems(
            Update,
            (handle_editor_requests, publish_core_events)
                .chain()
                .in_set(DispatchSet),
        );
}

fn handle_editor_requests(
    mut requests: EventReader<EditorRequest>,
    core: Option<ResMut<EditorCore>>,
) {
    let Some(mut core) = core else {
        if !requests.is_empty() {
            warn!("No editing session, dropping {} requests", requests.len());
            requests.clear();
        }
        return;
    };
    for request in requests.read() {
        match core.0.handle_request(request) {
            Ok(Some(response)) => debug!("Tool responded {:?}", response),
            Ok(None) => {}
            Err(ToolError::CannotBegin(id)) => debug!("{} is not available", id),
            Err(err) => error!("Request {:?} failed: {:#}", request, anyhow::Error::from(err)),
        }
    }
}

/// Drains the session's own notifications into Bevy events.
fn publish_core_events(
    core: Option<ResMut<EditorCore>>,
    mut tool_changed: EventWriter<ToolChanged>,
    mut rebuilt: EventWriter<DocumentRebuilt>,
) {
    let Some(mut core) = core else {
        return;
    };
    for event in core.0.take_events() {
        match event {
            CoreEvent::ToolChanged(tool) => {
                tool_changed.write(ToolChanged { tool });
            }
            CoreEvent::Rebuilt { comment, groups } => {
                debug!("Document rebuilt after {}", comment);
                rebuilt.write(DocumentRebuilt { comment, groups });
            }
        }
    }
}
