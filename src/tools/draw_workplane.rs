//! Workplane tool: places a workplane at the cursor and makes it the one
//! the current group draws in.

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_finite_coords, SketchResult};
use crate::core::settings::snap_to_grid;
use crate::document::EntityKind;

pub struct DrawWorkplaneTool;

impl Tool for DrawWorkplaneTool {
    fn id(&self) -> ToolId {
        ToolId::DrawWorkplane
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        view.group_is_sketch().into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        vec![InToolActionId::Lmb, InToolActionId::Cancel]
    }

    fn begin(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Action(InToolActionId::Lmb) => {
                let origin = snap_to_grid(args.cursor);
                validate_finite_coords(origin.x, origin.y)?;
                let wrkpl = ctx.add_entity(EntityKind::Workplane { origin });
                if let Some(group) = ctx.doc.group_mut(ctx.group) {
                    group.active_workplane = Some(wrkpl);
                }
                ctx.workplane = Some(wrkpl);
                Ok(ToolResponse::Commit)
            }
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}
