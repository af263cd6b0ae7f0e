//! Constraint tools. Each one is a single-step operation: it reads the
//! points to constrain from the selection, adds the constraint and commits.

use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::document::{ConstraintKind, Document, EntityPoint, ItemId};
use crate::editing::selection::two_points_from_selection;

/// True if the two points already share a constraint matching `pred`.
fn has_constraint(
    doc: &Document,
    (a, b): (EntityPoint, EntityPoint),
    pred: impl Fn(&ConstraintKind) -> bool,
) -> bool {
    doc.find_constraints(a, b)
        .iter()
        .any(|(_, c)| pred(&c.kind))
}

fn any_entity_in_group(doc: &Document, group: ItemId, (a, b): (EntityPoint, EntityPoint)) -> bool {
    [a, b]
        .iter()
        .any(|enp| doc.entity(enp.entity).is_some_and(|en| en.group == group))
}

fn is_hv(kind: &ConstraintKind) -> bool {
    matches!(
        kind,
        ConstraintKind::Horizontal { .. } | ConstraintKind::Vertical { .. }
    )
}

pub struct ConstrainCoincidentTool;

impl Tool for ConstrainCoincidentTool {
    fn id(&self) -> ToolId {
        ToolId::ConstrainCoincident
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        let Some(tp) = two_points_from_selection(view.doc, view.selection) else {
            return CanBegin::No;
        };
        // Endpoints of one line never coincide.
        if tp.0.entity == tp.1.entity {
            return CanBegin::No;
        }
        let exists = has_constraint(view.doc, tp, |kind| {
            matches!(kind, ConstraintKind::PointsCoincident { .. })
        });
        (!exists && any_entity_in_group(view.doc, view.group, tp)).into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let Some((a, b)) = two_points_from_selection(ctx.doc, &args.selection) else {
            return Ok(ToolResponse::End);
        };
        ctx.add_constraint(ConstraintKind::PointsCoincident { a, b });
        ctx.set_solve_pending();
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}

/// Horizontal or vertical, depending on the id it was created for.
pub struct ConstrainHvTool {
    vertical: bool,
}

impl ConstrainHvTool {
    pub fn horizontal() -> Self {
        Self { vertical: false }
    }

    pub fn vertical() -> Self {
        Self { vertical: true }
    }
}

impl Tool for ConstrainHvTool {
    fn id(&self) -> ToolId {
        if self.vertical {
            ToolId::ConstrainVertical
        } else {
            ToolId::ConstrainHorizontal
        }
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        if view.workplane.is_none() {
            return CanBegin::No;
        }
        let Some(tp) = two_points_from_selection(view.doc, view.selection) else {
            return CanBegin::No;
        };
        let blocked = has_constraint(view.doc, tp, |kind| {
            is_hv(kind) || matches!(kind, ConstraintKind::PointsCoincident { .. })
        });
        (!blocked && any_entity_in_group(view.doc, view.group, tp)).into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let Some((a, b)) = two_points_from_selection(ctx.doc, &args.selection) else {
            return Ok(ToolResponse::End);
        };
        let kind = if self.vertical {
            ConstraintKind::Vertical { a, b }
        } else {
            ConstraintKind::Horizontal { a, b }
        };
        ctx.add_constraint(kind);
        ctx.set_solve_pending();
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}

/// Fixes the distance between two points at their current value.
pub struct ConstrainDistanceTool;

impl Tool for ConstrainDistanceTool {
    fn id(&self) -> ToolId {
        ToolId::ConstrainDistance
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        let Some(tp) = two_points_from_selection(view.doc, view.selection) else {
            return CanBegin::No;
        };
        let blocked = has_constraint(view.doc, tp, |kind| {
            is_hv(kind) || matches!(kind, ConstraintKind::Distance { .. })
        });
        (!blocked && any_entity_in_group(view.doc, view.group, tp)).into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let Some((a, b)) = two_points_from_selection(ctx.doc, &args.selection) else {
            return Ok(ToolResponse::End);
        };
        let (Some(pa), Some(pb)) = (ctx.doc.entity_point(a), ctx.doc.entity_point(b)) else {
            return Ok(ToolResponse::End);
        };
        let distance = pa.distance(pb);
        if distance <= 0.0 {
            ctx.intf.tool_bar_flash("points coincide");
            return Ok(ToolResponse::End);
        }
        ctx.add_constraint(ConstraintKind::Distance {
            a,
            b,
            distance,
            measurement: false,
        });
        ctx.set_solve_pending();
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}
