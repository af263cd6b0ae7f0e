//! Construction geometry tools. Construction entities are kept for
//! reference but do not bound faces.

use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::document::{Document, EntityType, ItemId};
use crate::editing::selection::{selected_entities, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionMode {
    Toggle,
    Set,
    Unset,
}

pub struct ConstructionTool {
    mode: ConstructionMode,
}

impl ConstructionTool {
    pub fn new(mode: ConstructionMode) -> Self {
        Self { mode }
    }

    /// Selected entities this tool would change.
    fn targets(&self, doc: &Document, selection: &Selection) -> Vec<ItemId> {
        selected_entities(selection)
            .into_iter()
            .filter(|id| {
                let Some(en) = doc.entity(*id) else {
                    return false;
                };
                if en.entity_type() == EntityType::Workplane || !doc.can_delete_entity(*id) {
                    return false;
                }
                match self.mode {
                    ConstructionMode::Toggle => true,
                    ConstructionMode::Set => !en.construction,
                    ConstructionMode::Unset => en.construction,
                }
            })
            .collect()
    }
}

impl Tool for ConstructionTool {
    fn id(&self) -> ToolId {
        match self.mode {
            ConstructionMode::Toggle => ToolId::ToggleConstruction,
            ConstructionMode::Set => ToolId::SetConstruction,
            ConstructionMode::Unset => ToolId::UnsetConstruction,
        }
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        let can = !self.targets(view.doc, view.selection).is_empty();
        match (can, self.mode) {
            (false, _) => CanBegin::No,
            // Toggle duplicates Set/Unset in the context menu.
            (true, ConstructionMode::Toggle) => CanBegin::YesNoMenu,
            (true, _) => CanBegin::Yes,
        }
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let targets = self.targets(ctx.doc, &args.selection);
        if targets.is_empty() {
            return Ok(ToolResponse::End);
        }
        for id in targets {
            if let Some(en) = ctx.doc.entity_mut(id) {
                en.construction = match self.mode {
                    ConstructionMode::Toggle => !en.construction,
                    ConstructionMode::Set => true,
                    ConstructionMode::Unset => false,
                };
                let group = en.group;
                ctx.doc.set_group_generate_pending(group);
            }
        }
        Ok(ToolResponse::Commit)
    }

    fn update(&mut self, _ctx: &mut ToolContext, _args: &ToolArgs) -> SketchResult<ToolResponse> {
        Ok(ToolResponse::Nop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Entity, EntityKind};
    use crate::editing::selection::SelectableRef;
    use crate::tools::context::NullInterface;

    #[test]
    fn test_set_then_unset() {
        let mut doc = Document::new();
        let (group, g) = doc.groups_sorted()[1];
        let workplane = g.active_workplane.unwrap();
        let p = doc.add_entity(Entity::new(
            group,
            EntityKind::Point2d {
                workplane,
                p: kurbo::Point::ZERO,
            },
        ));
        let sel: Selection = [SelectableRef::entity(p, 0)].into();
        let unset = ConstructionTool::new(ConstructionMode::Unset);
        let view = ToolView {
            doc: &doc,
            selection: &sel,
            group,
            workplane: Some(workplane),
        };
        assert_eq!(unset.can_begin(&view), CanBegin::No);
        assert_eq!(
            ConstructionTool::new(ConstructionMode::Toggle).can_begin(&view),
            CanBegin::YesNoMenu
        );

        let mut set = ConstructionTool::new(ConstructionMode::Set);
        let mut intf = NullInterface;
        let mut ctx = ToolContext::new(&mut doc, group, Some(workplane), &mut intf);
        let args = ToolArgs {
            selection: sel,
            ..Default::default()
        };
        assert_eq!(set.begin(&mut ctx, &args).unwrap(), ToolResponse::Commit);
        assert!(doc.entity(p).unwrap().construction);
    }
}
