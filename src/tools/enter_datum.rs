//! Enter datum tool: edits the value of the selected dimensional constraint.
//!
//! The value arrives as `ToolData::Datum`; each one is applied immediately
//! and commits.

use bevy::log::debug;

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolData, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_datum, SketchResult};
use crate::document::{Document, ItemId};
use crate::editing::selection::{SelectableKind, Selection};

#[derive(Default)]
pub struct EnterDatumTool {
    constraint: Option<ItemId>,
}

fn selected_datum_constraint(doc: &Document, selection: &Selection) -> Option<ItemId> {
    let mut iter = selection.iter();
    let sr = iter.next()?;
    if iter.next().is_some() || sr.kind != SelectableKind::Constraint {
        return None;
    }
    doc.constraint(sr.item)?.datum().map(|_| sr.item)
}

impl Tool for EnterDatumTool {
    fn id(&self) -> ToolId {
        ToolId::EnterDatum
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        selected_datum_constraint(view.doc, view.selection)
            .is_some()
            .into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        vec![InToolActionId::Cancel]
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let Some(id) = selected_datum_constraint(ctx.doc, &args.selection) else {
            return Ok(ToolResponse::End);
        };
        self.constraint = Some(id);
        if let Some(value) = ctx.doc.constraint(id).and_then(|c| c.datum()) {
            ctx.intf.tool_bar_set_tool_tip(&format!("enter datum (current {value})"));
        }
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Data(ToolData::Datum(value)) => {
                if let Err(err) = validate_datum(value) {
                    ctx.intf.tool_bar_flash(&err.to_string());
                    return Ok(ToolResponse::Nop);
                }
                let id = self
                    .constraint
                    .ok_or_else(|| anyhow::anyhow!("no constraint to edit"))?;
                let constraint = ctx
                    .doc
                    .constraint_mut(id)
                    .ok_or_else(|| anyhow::anyhow!("constraint {id} disappeared"))?;
                constraint.set_datum(value);
                let group = constraint.group;
                debug!("Datum of constraint {} set to {}", id, value);
                ctx.doc.set_group_solve_pending(group);
                Ok(ToolResponse::Commit)
            }
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Constraint, ConstraintKind, EntityPoint};
    use crate::editing::selection::SelectableRef;
    use crate::tools::context::RecordingInterface;

    #[test]
    fn test_invalid_datum_keeps_tool_running() {
        let mut doc = Document::new();
        let (group, g) = doc.groups_sorted()[1];
        let wrkpl = g.active_workplane.unwrap();
        let c = doc.add_constraint(Constraint::new(
            group,
            Some(wrkpl),
            ConstraintKind::Distance {
                a: EntityPoint::new(wrkpl, 1),
                b: EntityPoint::new(wrkpl, 1),
                distance: 1.0,
                measurement: false,
            },
        ));
        let args = ToolArgs {
            selection: [SelectableRef::constraint(c)].into(),
            ..Default::default()
        };
        let mut intf = RecordingInterface::default();
        let mut ctx = ToolContext::new(&mut doc, group, Some(wrkpl), &mut intf);
        let mut tool = EnterDatumTool::default();
        assert!(tool.can_begin(&ctx.view(&args.selection)).is_yes());
        assert_eq!(tool.begin(&mut ctx, &args).unwrap(), ToolResponse::Nop);

        let bad = ToolArgs::with_event(ToolEvent::Data(ToolData::Datum(-2.0)), Default::default());
        assert_eq!(tool.update(&mut ctx, &bad).unwrap(), ToolResponse::Nop);
        let good = ToolArgs::with_event(ToolEvent::Data(ToolData::Datum(2.5)), Default::default());
        assert_eq!(tool.update(&mut ctx, &good).unwrap(), ToolResponse::Commit);
        assert_eq!(doc.constraint(c).unwrap().datum(), Some(2.5));
        assert_eq!(intf.flashes.len(), 1);
    }
}
