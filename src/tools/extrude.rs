//! Extrude tool
//!
//! Turns a closed face of a sketch into a new extrude group. The distance
//! follows the cursor until the user clicks or types a value.

use bevy::log::info;
use kurbo::Point;

use super::catalog::InToolActionId;
use super::common::is_abort;
use super::context::{ToolContext, ToolView};
use super::tool::{CanBegin, Tool, ToolArgs, ToolData, ToolEvent, ToolResponse};
use super::tool_id::ToolId;
use crate::core::errors::{validate_datum, SketchResult};
use crate::core::settings::{DEFAULT_EXTRUDE_DISTANCE, MIN_EXTRUDE_DISTANCE};
use crate::document::{Document, GroupKind, ItemId};
use crate::editing::selection::{single_face, Selection};

#[derive(Default)]
pub struct ExtrudeTool {
    group: Option<ItemId>,
    anchor: Point,
}

/// The selected face, if it is a valid face of a sketch group.
fn selected_face(doc: &Document, selection: &Selection) -> Option<(ItemId, u32)> {
    let (group, face) = single_face(selection)?;
    (doc.group(group)?.is_sketch() && (face as usize) < doc.face_count(group))
        .then_some((group, face))
}

impl ExtrudeTool {
    fn set_distance(&self, ctx: &mut ToolContext, value: f64) {
        let Some(id) = self.group else {
            return;
        };
        if let Some(group) = ctx.doc.group_mut(id) {
            if let GroupKind::Extrude { distance, .. } = &mut group.kind {
                *distance = value;
            }
        }
        ctx.doc.set_group_generate_pending(id);
        ctx.intf.canvas_update_from_tool();
    }
}

impl Tool for ExtrudeTool {
    fn id(&self) -> ToolId {
        ToolId::Extrude
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, view: &ToolView) -> CanBegin {
        selected_face(view.doc, view.selection).is_some().into()
    }

    fn actions(&self) -> Vec<InToolActionId> {
        vec![InToolActionId::Lmb, InToolActionId::Rmb, InToolActionId::Cancel]
    }

    fn begin(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        let (source, face) = selected_face(ctx.doc, &args.selection)
            .ok_or_else(|| anyhow::anyhow!("selection is not a closed face"))?;
        let group = ctx.doc.add_group(
            "Extrude",
            GroupKind::Extrude {
                source,
                face,
                distance: DEFAULT_EXTRUDE_DISTANCE,
            },
        );
        ctx.doc.set_group_generate_pending(group);
        self.group = Some(group);
        self.anchor = args.cursor;
        ctx.intf.tool_bar_set_tool_tip("drag to set distance, click to finish");
        // Further input decides the distance.
        Ok(ToolResponse::Nop)
    }

    fn update(&mut self, ctx: &mut ToolContext, args: &ToolArgs) -> SketchResult<ToolResponse> {
        match args.event {
            ToolEvent::Move => {
                let distance =
                    (DEFAULT_EXTRUDE_DISTANCE + args.cursor.y - self.anchor.y).max(MIN_EXTRUDE_DISTANCE);
                self.set_distance(ctx, distance);
                Ok(ToolResponse::Nop)
            }
            ToolEvent::Data(ToolData::Datum(value)) => {
                if let Err(err) = validate_datum(value) {
                    ctx.intf.tool_bar_flash(&err.to_string());
                    return Ok(ToolResponse::Nop);
                }
                self.set_distance(ctx, value);
                info!("Extruded by {}", value);
                Ok(ToolResponse::Commit)
            }
            ToolEvent::Action(InToolActionId::Lmb) => Ok(ToolResponse::Commit),
            _ if is_abort(args) => Ok(ToolResponse::Revert),
            _ => Ok(ToolResponse::Nop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Entity, EntityKind};
    use crate::editing::selection::SelectableRef;
    use crate::tools::context::NullInterface;

    fn doc_with_circle() -> (Document, ItemId) {
        let mut doc = Document::new();
        let (group, g) = doc.groups_sorted()[1];
        let workplane = g.active_workplane.unwrap();
        doc.add_entity(Entity::new(
            group,
            EntityKind::Circle2d {
                workplane,
                center: Point::ZERO,
                radius: 3.0,
            },
        ));
        (doc, group)
    }

    #[test]
    fn test_face_index_must_exist() {
        let (doc, sketch) = doc_with_circle();
        let ok: Selection = [SelectableRef::face(sketch, 0)].into();
        let missing: Selection = [SelectableRef::face(sketch, 1)].into();
        assert_eq!(selected_face(&doc, &ok), Some((sketch, 0)));
        assert_eq!(selected_face(&doc, &missing), None);
        assert_eq!(selected_face(&doc, &Selection::new()), None);
    }

    #[test]
    fn test_drag_then_click() {
        let (mut doc, sketch) = doc_with_circle();
        let mut intf = NullInterface;
        let mut ctx = ToolContext::new(&mut doc, sketch, None, &mut intf);
        let mut tool = ExtrudeTool::default();
        let args = ToolArgs {
            selection: [SelectableRef::face(sketch, 0)].into(),
            ..Default::default()
        };
        assert_eq!(tool.begin(&mut ctx, &args).unwrap(), ToolResponse::Nop);
        let moved = ToolArgs::with_event(ToolEvent::Move, Point::new(0.0, 5.0));
        tool.update(&mut ctx, &moved).unwrap();
        let click = ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), Point::new(0.0, 5.0));
        assert_eq!(tool.update(&mut ctx, &click).unwrap(), ToolResponse::Commit);

        let (_, extrude) = doc.groups_sorted()[2];
        assert_eq!(
            extrude.kind,
            GroupKind::Extrude {
                source: sketch,
                face: 0,
                distance: DEFAULT_EXTRUDE_DISTANCE + 5.0
            }
        );
    }
}
