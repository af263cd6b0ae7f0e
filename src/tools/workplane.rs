//! Choosing the workplane the current group draws in.

use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::document::{Document, EntityType, ItemId};
use crate::editing::selection::Selection;

fn selected_workplane(doc: &Document, selection: &Selection) -> Option<ItemId> {
    let mut iter = selection.iter();
    let sr = iter.next()?;
    if iter.next().is_some() || !sr.is_entity() {
        return None;
    }
    let en = doc.entity(sr.item)?;
    (en.entity_type() == EntityType::Workplane).then_some(sr.item)
}

pub struct SetWorkplaneTool;

impl Tool for SetWorkplaneTool {
    fn id(&self) -> ToolId {
        ToolId::SetWorkplane
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        let Some(wrkpl) = selected_workplane(view.doc, view.selection) else {
            return CanBegin::No;
        };
        (view.group_is_sketch() && view.workplane != Some(wrkpl)).into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let Some(wrkpl) = selected_workplane(ctx.doc, &args.selection) else {
            return Ok(ToolResponse::End);
        };
        let group = ctx
            .doc
            .group_mut(ctx.group)
            .ok_or_else(|| anyhow::anyhow!("group {} does not exist", ctx.group))?;
        group.active_workplane = Some(wrkpl);
        ctx.workplane = Some(wrkpl);
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}

pub struct UnsetWorkplaneTool;

impl Tool for UnsetWorkplaneTool {
    fn id(&self) -> ToolId {
        ToolId::UnsetWorkplane
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        view.doc
            .group(view.group)
            .is_some_and(|g| g.active_workplane.is_some())
            .into()
    }

    fn begin(&mut self, ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        if let Some(group) = ctx.doc.group_mut(ctx.group) {
            group.active_workplane = None;
        }
        ctx.workplane = None;
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}
