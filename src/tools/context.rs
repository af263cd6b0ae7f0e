//! What a tool gets to see and touch.

use bevy::log::{debug, info};

use super::catalog::{in_tool_action_item, InToolActionId};
use crate::core::errors::SketchResult;
use crate::document::{Constraint, ConstraintKind, Document, Entity, EntityKind, ItemId};
use crate::editing::selection::Selection;

/// A hint shown in the tool-bar while a tool is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLabel {
    pub action: InToolActionId,
    pub label: String,
}

impl ActionLabel {
    pub fn new(action: InToolActionId, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
        }
    }

    /// Label taken from the in-tool action catalog.
    pub fn from_catalog(action: InToolActionId) -> Self {
        let label = in_tool_action_item(action).map_or(action.name(), |item| item.name);
        Self::new(action, label)
    }
}

/// Feedback channel from tools to whatever presents the editor.
pub trait EditorInterface: Send + Sync {
    fn tool_bar_set_tool_tip(&mut self, _tip: &str) {}

    /// Short-lived message, e.g. why a click was ignored.
    fn tool_bar_flash(&mut self, _message: &str) {}

    fn tool_bar_set_actions(&mut self, _actions: &[ActionLabel]) {}

    /// The tool changed something that has to be redrawn.
    fn canvas_update_from_tool(&mut self) {}
}

/// Ignores all feedback.
#[derive(Debug, Default)]
pub struct NullInterface;

impl EditorInterface for NullInterface {}

/// Sends feedback to the log; used when running headless.
#[derive(Debug, Default)]
pub struct LoggingInterface;

impl EditorInterface for LoggingInterface {
    fn tool_bar_set_tool_tip(&mut self, tip: &str) {
        if !tip.is_empty() {
            debug!("Tool tip: {}", tip);
        }
    }

    fn tool_bar_flash(&mut self, message: &str) {
        info!("{}", message);
    }

    fn tool_bar_set_actions(&mut self, actions: &[ActionLabel]) {
        let labels: Vec<String> = actions
            .iter()
            .map(|a| format!("{}: {}", a.action, a.label))
            .collect();
        debug!("Tool actions: {}", labels.join(", "));
    }
}

/// Read-only view for capability checks.
#[derive(Debug, Clone, Copy)]
pub struct ToolView<'a> {
    pub doc: &'a Document,
    pub selection: &'a Selection,
    pub group: ItemId,
    pub workplane: Option<ItemId>,
}

impl ToolView<'_> {
    pub fn group_is_sketch(&self) -> bool {
        self.doc.group(self.group).is_some_and(|g| g.is_sketch())
    }
}

/// Mutable context for `begin` and `update`.
pub struct ToolContext<'a> {
    pub doc: &'a mut Document,
    pub group: ItemId,
    pub workplane: Option<ItemId>,
    pub intf: &'a mut dyn EditorInterface,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        group: ItemId,
        workplane: Option<ItemId>,
        intf: &'a mut dyn EditorInterface,
    ) -> Self {
        Self {
            doc,
            group,
            workplane,
            intf,
        }
    }

    pub fn view<'s>(&'s self, selection: &'s Selection) -> ToolView<'s> {
        ToolView {
            doc: &*self.doc,
            selection,
            group: self.group,
            workplane: self.workplane,
        }
    }

    /// The workplane 2D tools draw in.
    pub fn workplane_id(&self) -> SketchResult<ItemId> {
        self.workplane
            .ok_or_else(|| anyhow::anyhow!("no workplane is active in group {}", self.group))
    }

    /// Adds an entity to the current group.
    pub fn add_entity(&mut self, kind: EntityKind) -> ItemId {
        self.doc.add_entity(Entity::new(self.group, kind))
    }

    /// Adds a constraint to the current group, in the current workplane.
    pub fn add_constraint(&mut self, kind: ConstraintKind) -> ItemId {
        self.doc
            .add_constraint(Constraint::new(self.group, self.workplane, kind))
    }

    pub fn set_solve_pending(&mut self) {
        self.doc.set_group_solve_pending(self.group);
    }

    pub fn set_actions(&mut self, actions: &[InToolActionId]) {
        let labels: Vec<ActionLabel> = actions.iter().map(|a| ActionLabel::from_catalog(*a)).collect();
        self.intf.tool_bar_set_actions(&labels);
    }
}

/// Keeps everything it is told, for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingInterface {
    pub tips: Vec<String>,
    pub flashes: Vec<String>,
    pub actions: Vec<Vec<ActionLabel>>,
    pub canvas_updates: usize,
}

#[cfg(test)]
impl EditorInterface for RecordingInterface {
    fn tool_bar_set_tool_tip(&mut self, tip: &str) {
        self.tips.push(tip.to_string());
    }

    fn tool_bar_flash(&mut self, message: &str) {
        self.flashes.push(message.to_string());
    }

    fn tool_bar_set_actions(&mut self, actions: &[ActionLabel]) {
        self.actions.push(actions.to_vec());
    }

    fn canvas_update_from_tool(&mut self) {
        self.canvas_updates += 1;
    }
}
