//! Circle tool: first click places the center, the second sets the radius.

use kurbo::Point;

use super::catalog::InToolActionId;
use super::common::{hover_point, is_abort};
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_finite_coords, SketchResult};
use crate::core::settings::snap_to_grid;
use crate::document::{ConstraintKind, EntityKind, EntityPoint, ItemId};

#[derive(Default)]
pub struct DrawCircleTool {
    circle: Option<ItemId>,
}

impl DrawCircleTool {
    fn set_radius(&self, ctx: &mut ToolContext, cursor: Point) {
        let Some(id) = self.circle else {
            return;
        };
        if let Some(en) = ctx.doc.entity_mut(id) {
            if let EntityKind::Circle2d { center, radius, .. } = &mut en.kind {
                *radius = center.distance(cursor);
            }
        }
    }

    fn radius(&self, ctx: &ToolContext) -> f64 {
        match self.circle.and_then(|id| ctx.doc.entity(id)).map(|en| &en.kind) {
            Some(EntityKind::Circle2d { radius, .. }) => *radius,
            _ => 0.0,
        }
    }
}

impl Tool for DrawCircleTool {
    fn id(&self) -> ToolId {
        ToolId::DrawCircle2d
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        (view.workplane.is_some() && view.group_is_sketch()).into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        if self.circle.is_some() {
            vec![
                InToolActionId::Lmb,
                InToolActionId::ToggleConstruction,
                InToolActionId::Cancel,
            ]
        } else {
            vec![InToolActionId::Lmb, InToolActionId::Cancel]
        }
    }

    fn begin(&mut self, ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        ctx.workplane_id()?;
        ctx.intf.tool_bar_set_tool_tip("place center");
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Move => {
                self.set_radius(ctx, snap_to_grid(args.cursor));
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::Lmb) if self.circle.is_none() => {
                let workplane = ctx.workplane_id()?;
                let snapped = hover_point(ctx.doc, &args.selection);
                let center = match snapped.and_then(|enp| ctx.doc.entity_point(enp)) {
                    Some(p) => p,
                    None => snap_to_grid(args.cursor),
                };
                validate_finite_coords(center.x, center.y)?;
                let circle = ctx.add_entity(EntityKind::Circle2d {
                    workplane,
                    center,
                    radius: 0.0,
                });
                if let Some(enp) = snapped {
                    ctx.add_constraint(ConstraintKind::PointsCoincident {
                        a: EntityPoint::new(circle, 1),
                        b: enp,
                    });
                }
                self.circle = Some(circle);
                ctx.intf.tool_bar_set_tool_tip("set radius");
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::Lmb) => {
                self.set_radius(ctx, snap_to_grid(args.cursor));
                if self.radius(ctx) <= 0.0 {
                    ctx.intf.tool_bar_flash("radius must not be zero");
                    return Ok(ToolResponse::Nop);
                }
                ctx.set_solve_pending();
                Ok(ToolResponse::Commit)
            }
            ToolEvent::Action(InToolActionId::ToggleConstruction) => {
                if let Some(id) = self.circle {
                    if let Some(en) = ctx.doc.entity_mut(id) {
                        en.construction = !en.construction;
                    }
                }
                Ok(ToolResponse::Nop)
            }
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::tools::context::RecordingInterface;

    #[test]
    fn test_two_clicks_make_a_circle() {
        let mut doc = Document::new();
        let (group, g) = doc.groups_sorted()[1];
        let workplane = g.active_workplane;
        let mut intf = RecordingInterface::default();
        let mut ctx = ToolContext::new(&mut doc, group, workplane, &mut intf);
        let mut tool = DrawCircleTool::default();
        tool.begin(&mut ctx, &ToolArgs::default()).unwrap();
        let lmb = |x, y| ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), Point::new(x, y));
        assert_eq!(tool.update(&mut ctx, &lmb(1.0, 1.0)).unwrap(), ToolResponse::Nop);
        // Zero radius is refused.
        assert_eq!(tool.update(&mut ctx, &lmb(1.0, 1.0)).unwrap(), ToolResponse::Nop);
        assert_eq!(tool.update(&mut ctx, &lmb(4.0, 5.0)).unwrap(), ToolResponse::Commit);
        assert_eq!(intf.flashes, vec!["radius must not be zero".to_string()]);
        assert_eq!(doc.face_count(group), 1);
    }
}
