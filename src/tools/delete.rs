//! Delete tool
//!
//! Removes the selected entities and constraints together with everything
//! that depends on them.

use bevy::log::debug;

use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::document::ItemsToDelete;
use crate::editing::selection::SelectableKind;

pub struct DeleteTool;

impl Tool for DeleteTool {
    fn id(&self) -> ToolId {
        ToolId::Delete
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        view.selection
            .iter()
            .any(|sr| match sr.kind {
                SelectableKind::Entity => view.doc.can_delete_entity(sr.item),
                SelectableKind::Constraint => view.doc.constraint(sr.item).is_some(),
                SelectableKind::Face => false,
            })
            .into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let mut items = ItemsToDelete::default();
        for sr in &args.selection {
            match sr.kind {
                SelectableKind::Entity if ctx.doc.can_delete_entity(sr.item) => {
                    items.entities.insert(sr.item);
                }
                SelectableKind::Constraint if ctx.doc.constraint(sr.item).is_some() => {
                    items.constraints.insert(sr.item);
                }
                _ => {}
            }
        }

        let extra = ctx.doc.additional_items_to_delete(&items);
        for id in &extra.entities {
            debug!("Delete dependent entity {}", id);
        }
        for id in &extra.constraints {
            debug!("Delete dependent constraint {}", id);
        }
        items.append(extra);

        let groups: Vec<_> = items
            .entities
            .iter()
            .chain(items.constraints.iter())
            .filter_map(|id| {
                ctx.doc
                    .entity(*id)
                    .map(|en| en.group)
                    .or_else(|| ctx.doc.constraint(*id).map(|c| c.group))
            })
            .collect();
        ctx.doc.delete_items(&items);
        for group in groups {
            ctx.doc.set_group_solve_pending(group);
        }
        ctx.intf.canvas_update_from_tool();
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}
