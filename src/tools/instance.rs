//! Lifecycle of a running tool.
//!
//! ```text
//! Uninitialized -> CapabilityChecked -> Active -> Completed
//!                                             \-> Cancelled
//!                                             \-> Failed
//! ```
//!
//! `ToolInstance` enforces the order: a tool whose capability check said no,
//! or was never run, cannot begin.

use bevy::log::{debug, error};
use std::fmt;

use super::context::{ToolContext, ToolView};
use super::factory::create_tool;
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolFlags, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{SketchResult, ToolError};
use crate::editing::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    CapabilityChecked(CanBegin),
    Active,
    Completed,
    Cancelled,
    Failed,
}

impl LifecycleState {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            LifecycleState::Completed | LifecycleState::Cancelled | LifecycleState::Failed
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::CapabilityChecked(_) => "capability checked",
            LifecycleState::Active => "active",
            LifecycleState::Completed => "completed",
            LifecycleState::Cancelled => "cancelled",
            LifecycleState::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub struct ToolInstance {
    tool: Box<dyn Tool>,
    flags: ToolFlags,
    state: LifecycleState,
    /// Selection of a begin deferred to the first input event.
    pending_begin: Option<Selection>,
}

impl fmt::Debug for ToolInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolInstance")
            .field("tool", &self.tool.id())
            .field("flags", &self.flags)
            .field("state", &self.state)
            .finish()
    }
}

impl ToolInstance {
    pub fn new(id: ToolId, flags: ToolFlags) -> Self {
        Self::from_tool(create_tool(id, flags), flags)
    }

    pub fn from_tool(tool: Box<dyn Tool>, flags: ToolFlags) -> Self {
        Self {
            tool,
            flags,
            state: LifecycleState::Uninitialized,
            pending_begin: None,
        }
    }

    pub fn id(&self) -> ToolId {
        self.tool.id()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn flags(&self) -> ToolFlags {
        self.flags
    }

    pub fn is_specific(&self) -> bool {
        self.tool.is_specific()
    }

    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    fn lifecycle_error(&self, operation: &'static str) -> ToolError {
        ToolError::Lifecycle {
            tool: self.id(),
            operation,
            state: self.state,
        }
    }

    /// Runs the capability check. May be repeated until the tool begins.
    pub fn check(&mut self, view: &ToolView) -> Result<CanBegin, ToolError> {
        match self.state {
            LifecycleState::Uninitialized | LifecycleState::CapabilityChecked(_) => {
                let result = self.tool.can_begin(view);
                self.state = LifecycleState::CapabilityChecked(result);
                Ok(result)
            }
            _ => Err(self.lifecycle_error("check")),
        }
    }

    pub fn begin(
        &mut self,
        ctx: &mut ToolContext,
        args: &ToolArgs,
    ) -> Result<ToolResponse, ToolError> {
        match self.state {
            LifecycleState::CapabilityChecked(can) if can.is_yes() => {}
            _ => return Err(self.lifecycle_error("begin")),
        }
        self.state = LifecycleState::Active;
        debug!("Tool {} begins", self.id());

        if self.tool.needs_delayed_begin() && args.event == ToolEvent::None {
            self.pending_begin = Some(args.selection.clone());
            self.publish_actions(ctx);
            return Ok(ToolResponse::Nop);
        }
        let result = self.tool.begin(ctx, args);
        self.settle(ctx, result)
    }

    pub fn update(
        &mut self,
        ctx: &mut ToolContext,
        args: &ToolArgs,
    ) -> Result<ToolResponse, ToolError> {
        if self.state != LifecycleState::Active {
            return Err(self.lifecycle_error("update"));
        }
        if args.event == ToolEvent::None {
            return Ok(ToolResponse::Nop);
        }
        if let Some(selection) = self.pending_begin.take() {
            // The first event both begins the tool and is handled by it,
            // against the selection the tool was started with.
            let begin_args = ToolArgs {
                selection,
                ..args.clone()
            };
            let result = self.tool.begin(ctx, &begin_args);
            if !matches!(result, Ok(ToolResponse::Nop)) {
                return self.settle(ctx, result);
            }
        }
        let result = self.tool.update(ctx, args);
        self.settle(ctx, result)
    }

    /// Abandons the tool. The caller restores the document.
    pub fn cancel(&mut self) -> Result<(), ToolError> {
        if self.state.is_finished() {
            return Err(self.lifecycle_error("cancel"));
        }
        debug!("Tool {} cancelled", self.id());
        self.state = LifecycleState::Cancelled;
        Ok(())
    }

    fn settle(
        &mut self,
        ctx: &mut ToolContext,
        result: SketchResult<ToolResponse>,
    ) -> Result<ToolResponse, ToolError> {
        match result {
            Ok(response) => {
                self.state = match response {
                    ToolResponse::Nop => LifecycleState::Active,
                    ToolResponse::End | ToolResponse::Commit => LifecycleState::Completed,
                    ToolResponse::Revert => LifecycleState::Cancelled,
                };
                if self.is_active() {
                    self.publish_actions(ctx);
                } else {
                    ctx.intf.tool_bar_set_actions(&[]);
                }
                Ok(response)
            }
            Err(source) => {
                error!("Tool {} failed: {:#}", self.id(), source);
                self.state = LifecycleState::Failed;
                ctx.intf.tool_bar_set_actions(&[]);
                Err(ToolError::Failed {
                    tool: self.id(),
                    source,
                })
            }
        }
    }

    fn publish_actions(&self, ctx: &mut ToolContext) {
        ctx.set_actions(&self.tool.actions());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::editing::selection::Selection;
    use crate::tools::catalog::InToolActionId;
    use crate::tools::context::RecordingInterface;

    /// Answers with a scripted response.
    struct Scripted {
        can: CanBegin,
        delayed: bool,
        fail: bool,
    }

    impl Scripted {
        fn boxed(can: CanBegin, delayed: bool) -> Box<dyn Tool> {
            Box::new(Scripted {
                can,
                delayed,
                fail: false,
            })
        }
    }

    impl Tool for Scripted {
        fn id(&self) -> ToolId {
            ToolId::Move
        }

        fn can_begin(&self, _view: &ToolView) -> CanBegin {
            self.can
        }

        fn needs_delayed_begin(&self) -> bool {
            self.delayed
        }

        fn actions(&self) -> Vec<InToolActionId> {
            vec![InToolActionId::Lmb]
        }

        fn begin(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
            anyhow::ensure!(!self.fail, "scripted failure");
            Ok(ToolResponse::Nop)
        }

        fn update(&mut self, _ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
            if args.is_action(InToolActionId::Lmb) {
                Ok(ToolResponse::Commit)
            } else {
                Ok(ToolResponse::Nop)
            }
        }
    }

    fn fixture() -> (Document, Selection, RecordingInterface) {
        (Document::new(), Selection::new(), RecordingInterface::default())
    }

    #[test]
    fn test_begin_requires_a_check() {
        let (mut doc, _, mut intf) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::from_tool(Scripted::boxed(CanBegin::Yes, false), ToolFlags::empty());
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        let err = inst.begin(&mut ctx, &ToolArgs::default()).unwrap_err();
        assert!(matches!(err, ToolError::Lifecycle { operation: "begin", .. }));
    }

    #[test]
    fn test_negative_check_blocks_begin() {
        let (mut doc, sel, mut intf) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::from_tool(Scripted::boxed(CanBegin::No, false), ToolFlags::empty());
        {
            let view = ToolView {
                doc: &doc,
                selection: &sel,
                group,
                workplane: None,
            };
            assert_eq!(inst.check(&view).unwrap(), CanBegin::No);
        }
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        assert!(inst.begin(&mut ctx, &ToolArgs::default()).is_err());
        assert_eq!(inst.state(), LifecycleState::CapabilityChecked(CanBegin::No));
    }

    #[test]
    fn test_full_lifecycle() {
        let (mut doc, sel, mut intf) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::from_tool(Scripted::boxed(CanBegin::Yes, false), ToolFlags::empty());
        let view = ToolView {
            doc: &doc,
            selection: &sel,
            group,
            workplane: None,
        };
        inst.check(&view).unwrap();
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        assert_eq!(inst.begin(&mut ctx, &ToolArgs::default()).unwrap(), ToolResponse::Nop);
        assert!(inst.is_active());

        let idle = ToolArgs::default();
        assert_eq!(inst.update(&mut ctx, &idle).unwrap(), ToolResponse::Nop);

        let click = ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), kurbo::Point::ZERO);
        assert_eq!(inst.update(&mut ctx, &click).unwrap(), ToolResponse::Commit);
        assert_eq!(inst.state(), LifecycleState::Completed);
        assert!(inst.update(&mut ctx, &click).is_err());
        assert!(inst.cancel().is_err());
        assert_eq!(intf.actions.last().unwrap(), &Vec::new());
    }

    #[test]
    fn test_delayed_begin_waits_for_input() {
        let (mut doc, sel, mut intf) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::from_tool(Scripted::boxed(CanBegin::Yes, true), ToolFlags::empty());
        let view = ToolView {
            doc: &doc,
            selection: &sel,
            group,
            workplane: None,
        };
        inst.check(&view).unwrap();
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        inst.begin(&mut ctx, &ToolArgs::default()).unwrap();
        let moved = ToolArgs::with_event(ToolEvent::Move, kurbo::Point::new(1.0, 1.0));
        assert_eq!(inst.update(&mut ctx, &moved).unwrap(), ToolResponse::Nop);
        let click = ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), kurbo::Point::ZERO);
        assert_eq!(inst.update(&mut ctx, &click).unwrap(), ToolResponse::Commit);
    }

    #[test]
    fn test_failure_is_terminal() {
        let (mut doc, sel, mut intf) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::from_tool(
            Box::new(Scripted {
                can: CanBegin::Yes,
                delayed: false,
                fail: true,
            }),
            ToolFlags::empty(),
        );
        let view = ToolView {
            doc: &doc,
            selection: &sel,
            group,
            workplane: None,
        };
        inst.check(&view).unwrap();
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        let err = inst.begin(&mut ctx, &ToolArgs::default()).unwrap_err();
        assert!(matches!(err, ToolError::Failed { tool: ToolId::Move, .. }));
        assert_eq!(inst.state(), LifecycleState::Failed);
    }

    #[test]
    fn test_cancel_before_begin() {
        let (doc, sel, _) = fixture();
        let group = doc.groups_sorted()[1].0;
        let mut inst = ToolInstance::new(ToolId::UnsetWorkplane, ToolFlags::empty());
        let view = ToolView {
            doc: &doc,
            selection: &sel,
            group,
            workplane: None,
        };
        inst.check(&view).unwrap();
        inst.cancel().unwrap();
        assert_eq!(inst.state(), LifecycleState::Cancelled);
        assert!(inst.check(&view).is_err());
    }
}
