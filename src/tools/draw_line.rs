//! Line tool
//!
//! Each click starts a new segment at the end of the previous one, chained
//! with coincident constraints. Clicking on an existing point snaps to it.
//! RMB drops the segment under construction; a second RMB finishes.

use kurbo::Point;

use super::catalog::InToolActionId;
use super::common::hover_point;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_finite_coords, SketchResult};
use crate::core::settings::snap_to_grid;
use crate::document::{ConstraintKind, EntityKind, EntityPoint, ItemId, ItemsToDelete};

#[derive(Default)]
pub struct DrawLineTool {
    /// Segment following the cursor.
    temp_line: Option<ItemId>,
    /// Constraints added together with `temp_line`.
    temp_constraints: Vec<ItemId>,
}

impl DrawLineTool {
    fn drop_temp_line(&mut self, ctx: &mut ToolContext) {
        if let Some(line) = self.temp_line.take() {
            ctx.doc.delete_items(&ItemsToDelete {
                entities: [line].into(),
                constraints: self.temp_constraints.drain(..).collect(),
            });
        }
    }

    fn update_tip(&self, ctx: &mut ToolContext, args: &ToolArgs) {
        let tip = if hover_point(ctx.doc, &args.selection).is_some() {
            "point"
        } else {
            ""
        };
        ctx.intf.tool_bar_set_tool_tip(tip);
    }

    fn place(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<()> {
        let workplane = ctx.workplane_id()?;
        let snapped = hover_point(ctx.doc, &args.selection);
        let cursor = match snapped.and_then(|enp| ctx.doc.entity_point(enp)) {
            Some(p) => p,
            None => snap_to_grid(args.cursor),
        };
        validate_finite_coords(cursor.x, cursor.y)?;

        let last_line = self.temp_line;
        if let Some(last) = last_line {
            if let Some(en) = ctx.doc.entity_mut(last) {
                en.set_point(2, cursor);
            }
        }

        let line = ctx.add_entity(EntityKind::Line2d {
            workplane,
            p1: cursor,
            p2: cursor,
        });
        self.temp_constraints.clear();

        if let Some(enp) = snapped {
            // The click ends the previous segment, or starts the first one.
            let (target, point) = match last_line {
                Some(last) => (last, 2),
                None => (line, 1),
            };
            let c = ctx.add_constraint(ConstraintKind::PointsCoincident {
                a: EntityPoint::new(target, point),
                b: enp,
            });
            if last_line.is_none() {
                self.temp_constraints.push(c);
            }
        }
        if let Some(last) = last_line {
            let c = ctx.add_constraint(ConstraintKind::PointsCoincident {
                a: EntityPoint::new(last, 2),
                b: EntityPoint::new(line, 1),
            });
            self.temp_constraints.push(c);
        }

        self.temp_line = Some(line);
        ctx.set_solve_pending();
        Ok(())
    }

    fn move_temp_line(&self, ctx: &mut ToolContext, to: Point) {
        if let Some(line) = self.temp_line {
            if let Some(en) = ctx.doc.entity_mut(line) {
                en.set_point(2, to);
            }
        }
    }
}

impl Tool for DrawLineTool {
    fn id(&self) -> ToolId {
        ToolId::DrawLine2d
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        (view.workplane.is_some() && view.group_is_sketch()).into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        let mut actions = vec![InToolActionId::Lmb, InToolActionId::Rmb];
        if self.temp_line.is_some() {
            actions.push(InToolActionId::ToggleConstruction);
        }
        actions.push(InToolActionId::Cancel);
        actions
    }

    fn begin(&mut self, ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        ctx.workplane_id()?;
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Move => {
                self.move_temp_line(ctx, snap_to_grid(args.cursor));
                self.update_tip(ctx, args);
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::Lmb) => {
                self.place(ctx, args)?;
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::ToggleConstruction) => {
                if let Some(line) = self.temp_line {
                    if let Some(en) = ctx.doc.entity_mut(line) {
                        en.construction = !en.construction;
                    }
                }
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::Rmb) => {
                if self.temp_line.is_some() {
                    self.drop_temp_line(ctx);
                    Ok(ToolResponse::Nop)
                } else {
                    Ok(ToolResponse::Commit)
                }
            }
            ToolEvent::Action(InToolActionId::Cancel) => {
                self.drop_temp_line(ctx);
                Ok(ToolResponse::Revert)
            }
            _ => Ok(ToolResponse::Nop),
        }
    }
}
