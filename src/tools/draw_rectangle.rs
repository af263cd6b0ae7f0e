//! Rectangle tool
//!
//! Two clicks span the rectangle. It is built from four lines joined by
//! coincident constraints, with horizontal and vertical constraints keeping
//! it axis aligned.

use kurbo::Point;

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_finite_coords, SketchResult};
use crate::core::settings::snap_to_grid;
use crate::document::{ConstraintKind, EntityKind, EntityPoint, ItemId};

#[derive(Default)]
pub struct DrawRectangleTool {
    first_corner: Option<Point>,
    construction: bool,
}

impl DrawRectangleTool {
    fn build(&self, ctx: &mut ToolContext, a: Point, b: Point) -> SketchResult<[ItemId; 4]> {
        let workplane = ctx.workplane_id()?;
        let corners = [
            Point::new(a.x, a.y),
            Point::new(b.x, a.y),
            Point::new(b.x, b.y),
            Point::new(a.x, b.y),
        ];
        let mut lines = [ItemId(0); 4];
        for (i, line) in lines.iter_mut().enumerate() {
            *line = ctx.add_entity(EntityKind::Line2d {
                workplane,
                p1: corners[i],
                p2: corners[(i + 1) % 4],
            });
            if let Some(en) = ctx.doc.entity_mut(*line) {
                en.construction = self.construction;
            }
        }
        for i in 0..4 {
            ctx.add_constraint(ConstraintKind::PointsCoincident {
                a: EntityPoint::new(lines[i], 2),
                b: EntityPoint::new(lines[(i + 1) % 4], 1),
            });
        }
        for (i, &line) in lines.iter().enumerate() {
            let a = EntityPoint::new(line, 1);
            let b = EntityPoint::new(line, 2);
            let kind = if i % 2 == 0 {
                ConstraintKind::Horizontal { a, b }
            } else {
                ConstraintKind::Vertical { a, b }
            };
            ctx.add_constraint(kind);
        }
        Ok(lines)
    }
}

impl Tool for DrawRectangleTool {
    fn id(&self) -> ToolId {
        ToolId::DrawRectangle
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        (view.workplane.is_some() && view.group_is_sketch()).into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        vec![
            InToolActionId::Lmb,
            InToolActionId::ToggleConstruction,
            InToolActionId::Cancel,
        ]
    }

    fn begin(&mut self, ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        ctx.workplane_id()?;
        ctx.intf.tool_bar_set_tool_tip("first corner");
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Action(InToolActionId::Lmb) => {
                let cursor = snap_to_grid(args.cursor);
                validate_finite_coords(cursor.x, cursor.y)?;
                let Some(first) = self.first_corner else {
                    self.first_corner = Some(cursor);
                    ctx.intf.tool_bar_set_tool_tip("second corner");
                    return Ok(ToolResponse::Nop);
                };
                if first.x == cursor.x || first.y == cursor.y {
                    ctx.intf.tool_bar_flash("rectangle must not be degenerate");
                    return Ok(ToolResponse::Nop);
                }
                self.build(ctx, first, cursor)?;
                ctx.set_solve_pending();
                ctx.intf.canvas_update_from_tool();
                Ok(ToolResponse::Commit)
            }
            ToolEvent::Action(InToolActionId::ToggleConstruction) => {
                self.construction = !self.construction;
                Ok(ToolResponse::Nop)
            }
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}
