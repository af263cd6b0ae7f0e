//! Move tool
//!
//! Drags the selected entities with the cursor. Started transiently (by a
//! drag) it commits when the button is released, and only picks up the
//! entities once the first drag event arrives.

use kurbo::Point;
use std::collections::BTreeSet;

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolEvent, ToolFlags, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::SketchResult;
use crate::document::{Document, EntityType, ItemId};
use crate::editing::selection::selected_entities;

pub struct MoveTool {
    flags: ToolFlags,
    entities: BTreeSet<ItemId>,
    last: Point,
}

impl MoveTool {
    pub fn new(flags: ToolFlags) -> Self {
        Self {
            flags,
            entities: BTreeSet::new(),
            last: Point::ZERO,
        }
    }

    fn is_movable(doc: &Document, id: ItemId) -> bool {
        doc.entity(id)
            .is_some_and(|en| en.entity_type() != EntityType::Workplane)
            && doc.can_delete_entity(id)
    }
}

impl Tool for MoveTool {
    fn id(&self) -> ToolId {
        ToolId::Move
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        selected_entities(view.selection)
            .into_iter()
            .any(|id| Self::is_movable(view.doc, id))
            .into()
    }

    fn needs_delayed_begin(&self) -> bool {
        self.flags.contains(ToolFlags::TRANSIENT)
    }

    fn actions(&self) -> Vec<InToolActionId> {
        if self.flags.contains(ToolFlags::TRANSIENT) {
            vec![InToolActionId::LmbRelease, InToolActionId::Cancel]
        } else {
            vec![InToolActionId::Lmb, InToolActionId::Rmb]
        }
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        self.entities = selected_entities(&args.selection)
            .into_iter()
            .filter(|id| Self::is_movable(ctx.doc, *id))
            .collect();
        self.last = args.cursor;
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Move => {
                let delta = args.cursor - self.last;
                self.last = args.cursor;
                for id in &self.entities {
                    if let Some(en) = ctx.doc.entity_mut(*id) {
                        en.translate(delta);
                    }
                }
                ctx.set_solve_pending();
                ctx.intf.canvas_update_from_tool();
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Action(InToolActionId::Lmb) if !self.flags.contains(ToolFlags::TRANSIENT) => {
                Ok(ToolResponse::Commit)
            }
            ToolEvent::Action(InToolActionId::LmbRelease)
                if self.flags.contains(ToolFlags::TRANSIENT) =>
            {
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
    use crate::document::{Entity, EntityKind};
    use crate::editing::selection::{SelectableRef, Selection};
    use crate::tools::context::NullInterface;
    use crate::tools::instance::ToolInstance;

    fn setup() -> (Document, ItemId, ItemId) {
        let mut doc = Document::new();
        let (group, g) = doc.groups_sorted()[1];
        let workplane = g.active_workplane.unwrap();
        let p = doc.add_entity(Entity::new(
            group,
            EntityKind::Point2d {
                workplane,
                p: Point::new(1.0, 1.0),
            },
        ));
        (doc, group, p)
    }

    #[test]
    fn test_drag_and_release() {
        let (mut doc, group, p) = setup();
        let mut tool = MoveTool::new(ToolFlags::TRANSIENT);
        let mut intf = NullInterface;
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        let args = ToolArgs {
            selection: [SelectableRef::entity(p, 0)].into(),
            ..Default::default()
        };
        tool.begin(&mut ctx, &args).unwrap();
        let moved = ToolArgs::with_event(ToolEvent::Move, Point::new(2.0, 3.0));
        assert_eq!(tool.update(&mut ctx, &moved).unwrap(), ToolResponse::Nop);
        // A click does nothing while dragging.
        let click = ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), Point::new(2.0, 3.0));
        assert_eq!(tool.update(&mut ctx, &click).unwrap(), ToolResponse::Nop);
        let release = ToolArgs::with_event(ToolEvent::Action(InToolActionId::LmbRelease), Point::new(2.0, 3.0));
        assert_eq!(tool.update(&mut ctx, &release).unwrap(), ToolResponse::Commit);
        assert_eq!(doc.entity(p).unwrap().point(1), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_drag_starts_at_first_event() {
        let (mut doc, group, p) = setup();
        let selection: Selection = [SelectableRef::entity(p, 0)].into();
        let mut inst = ToolInstance::new(ToolId::Move, ToolFlags::TRANSIENT);
        let view = ToolView {
            doc: &doc,
            selection: &selection,
            group,
            workplane: None,
        };
        assert_eq!(inst.check(&view).unwrap(), CanBegin::Yes);

        let mut intf = NullInterface;
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        let args = ToolArgs {
            selection,
            ..Default::default()
        };
        assert_eq!(inst.begin(&mut ctx, &args).unwrap(), ToolResponse::Nop);
        // The drag is picked up at (5, 5), so the entity stays put there.
        let first = ToolArgs::with_event(ToolEvent::Move, Point::new(5.0, 5.0));
        assert_eq!(inst.update(&mut ctx, &first).unwrap(), ToolResponse::Nop);
        assert_eq!(ctx.doc.entity(p).unwrap().point(1), Some(Point::new(1.0, 1.0)));

        let second = ToolArgs::with_event(ToolEvent::Move, Point::new(6.0, 7.0));
        inst.update(&mut ctx, &second).unwrap();
        let release = ToolArgs::with_event(ToolEvent::Action(InToolActionId::LmbRelease), Point::new(6.0, 7.0));
        assert_eq!(inst.update(&mut ctx, &release).unwrap(), ToolResponse::Commit);
        assert_eq!(doc.entity(p).unwrap().point(1), Some(Point::new(2.0, 3.0)));
    }

    #[test]
    fn test_click_move_begins_at_once() {
        assert!(!MoveTool::new(ToolFlags::empty()).needs_delayed_begin());
        assert!(MoveTool::new(ToolFlags::TRANSIENT).needs_delayed_begin());
    }

    #[test]
    fn test_rmb_reverts() {
        let (mut doc, group, p) = setup();
        let mut tool = MoveTool::new(ToolFlags::empty());
        let mut intf = NullInterface;
        let mut ctx = ToolContext::new(&mut doc, group, None, &mut intf);
        let args = ToolArgs {
            selection: [SelectableRef::entity(p, 0)].into(),
            ..Default::default()
        };
        tool.begin(&mut ctx, &args).unwrap();
        let rmb = ToolArgs::with_event(ToolEvent::Action(InToolActionId::Rmb), Point::ZERO);
        assert_eq!(tool.update(&mut ctx, &rmb).unwrap(), ToolResponse::Revert);
    }
}
