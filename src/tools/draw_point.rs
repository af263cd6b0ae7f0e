//! Point tool: places a single point in the current workplane.

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_finite_coords, SketchResult};
use crate::core::settings::snap_to_grid;
use crate::document::EntityKind;

pub struct DrawPointTool;

impl Tool for DrawPointTool {
    fn id(&self) -> ToolId {
        ToolId::DrawPoint2d
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        (view.workplane.is_some() && view.group_is_sketch()).into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        vec![InToolActionId::Lmb, InToolActionId::Cancel]
    }

    fn begin(&mut self, ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        ctx.workplane_id()?;
        ctx.intf.tool_bar_set_tool_tip("click to place point");
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Action(InToolActionId::Lmb) => {
                let workplane = ctx.workplane_id()?;
                let p = snap_to_grid(args.cursor);
                validate_finite_coords(p.x, p.y)?;
                ctx.add_entity(EntityKind::Point2d { workplane, p });
                ctx.set_solve_pending();
                Ok(ToolResponse::Commit)
            }
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}
