//! The contract every tool implements.

use bitflags::bitflags;
use kurbo::Point;

use super::catalog::InToolActionId;
use super::context::{ToolContext, ToolView};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::editing::selection::Selection;

/// Typed payload a tool can receive besides pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolData {
    /// A value typed by the user, e.g. a distance.
    Datum(f64),
}

/// What happened since the last call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolEvent {
    /// Nothing. Used for the initial `begin` call.
    #[default]
    None,
    /// The cursor moved to `ToolArgs::cursor`.
    Move,
    Action(InToolActionId),
    Data(ToolData),
}

/// Input of a `begin` or `update` call.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    pub event: ToolEvent,
    /// Cursor in workplane coordinates.
    pub cursor: Point,
    pub selection: Selection,
}

impl ToolArgs {
    pub fn with_event(event: ToolEvent, cursor: Point) -> Self {
        Self {
            event,
            cursor,
            selection: Selection::new(),
        }
    }

    pub fn is_action(&self, action: InToolActionId) -> bool {
        self.event == ToolEvent::Action(action)
    }
}

/// Outcome of `begin`/`update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResponse {
    /// Keep the tool active.
    Nop,
    /// Done, without an undo step.
    End,
    /// Done; record an undo step.
    Commit,
    /// Abandon all changes since the tool began.
    Revert,
}

impl ToolResponse {
    pub fn is_final(self) -> bool {
        self != ToolResponse::Nop
    }
}

/// Answer of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanBegin {
    No,
    Yes,
    /// Can begin, but is not worth offering in the context menu.
    YesNoMenu,
}

impl CanBegin {
    pub fn is_yes(self) -> bool {
        self != CanBegin::No
    }
}

impl From<bool> for CanBegin {
    fn from(yes: bool) -> Self {
        if yes {
            CanBegin::Yes
        } else {
            CanBegin::No
        }
    }
}

bitflags! {
    /// How the tool was started.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToolFlags: u32 {
        /// Started by a held key or drag; ends when the input is released.
        const TRANSIENT = 1 << 0;
    }
}

/// An interactive editing operation.
///
/// The document and editor interface are not owned by the tool; they are
/// lent for the duration of each call. `can_begin` only gets shared
/// borrows, so checking never changes anything.
pub trait Tool: Send + Sync {
    fn id(&self) -> ToolId;

    fn can_begin(&self, view: &ToolView) -> CanBegin;

    /// Tools that act on a concrete selection rather than drawing.
    fn is_specific(&self) -> bool {
        false
    }

    /// Defer `begin` until the first input event arrives.
    fn needs_delayed_begin(&self) -> bool {
        false
    }

    /// In-tool actions the tool currently reacts to.
    fn actions(&self) -> Vec<InToolActionId> {
        Vec::new()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse>;

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse>;
}
