//! Scenarios that run through the whole stack: lookup tables, factory,
//! session and history.

#[cfg(test)]
mod registry_tests {
    use crate::tools::catalog::{action_catalog, action_lut, catalog_item, tool_lut, ActionFlags};
    use crate::tools::{create_tool, ActionId, ActionToolId, ToolFlags, ToolId};

    #[test]
    fn test_every_tool_has_one_name_and_one_entry() {
        assert_eq!(tool_lut().len(), ToolId::ALL.len());
        assert_eq!(action_lut().len(), ActionId::ALL.len());
        assert_eq!(
            action_catalog().len(),
            ToolId::ALL.len() + ActionId::ALL.len()
        );
        for &id in ToolId::ALL {
            let name = tool_lut().lookup_reverse(id).unwrap();
            assert_eq!(name, id.name());
            assert_eq!(tool_lut().lookup(name), Some(id));
            assert_eq!(ActionToolId::parse(name), Ok(ActionToolId::Tool(id)));
            assert!(catalog_item(id).is_some(), "{id} has no catalog entry");
        }
    }

    #[test]
    fn test_lut_keeps_declaration_order() {
        let names: Vec<&str> = tool_lut().names().collect();
        let expected: Vec<&str> = ToolId::ALL.iter().map(|id| id.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_specific_flag_matches_tools() {
        for &id in ToolId::ALL {
            let flagged = catalog_item(id)
                .unwrap()
                .flags
                .contains(ActionFlags::SPECIFIC);
            assert_eq!(flagged, create_tool(id, ToolFlags::empty()).is_specific(), "{id}");
        }
    }
}

#[cfg(test)]
mod scenario_tests {
    use kurbo::Point;

    use crate::core::errors::ToolError;
    use crate::core::session::Core;
    use crate::core::settings::Settings;
    use crate::document::{EntityKind, GroupKind, ItemId};
    use crate::editing::selection::{SelectableRef, Selection};
    use crate::tools::catalog::{tool_lut, InToolActionId};
    use crate::tools::context::{NullInterface, ToolView};
    use crate::tools::{create_tool, CanBegin, ToolArgs, ToolEvent, ToolFlags, ToolId, ToolResponse};

    fn core() -> Core {
        Core::new(&Settings::default(), Box::new(NullInterface))
    }

    fn at(event: ToolEvent, x: f64, y: f64) -> ToolArgs {
        ToolArgs::with_event(event, Point::new(x, y))
    }

    fn click(x: f64, y: f64) -> ToolArgs {
        at(ToolEvent::Action(InToolActionId::Lmb), x, y)
    }

    fn draw_circle(core: &mut Core, radius: f64) {
        core.tool_begin(ToolId::DrawCircle2d, &ToolArgs::default(), false)
            .unwrap();
        core.tool_update(&click(0.0, 0.0)).unwrap();
        assert_eq!(
            core.tool_update(&click(radius, 0.0)).unwrap(),
            ToolResponse::Commit
        );
    }

    #[test]
    fn test_extrude_end_to_end() {
        let mut core = core();
        let id = tool_lut().lookup("EXTRUDE").unwrap();
        assert_eq!(id, ToolId::Extrude);
        let tool = create_tool(id, ToolFlags::empty());
        assert!(tool.is_specific());

        draw_circle(&mut core, 5.0);
        let sketch = core.current_group();
        let empty = Selection::new();
        let view = ToolView {
            doc: core.document(),
            selection: &empty,
            group: sketch,
            workplane: core.current_workplane(),
        };
        assert_eq!(tool.can_begin(&view), CanBegin::No);

        let face: Selection = [SelectableRef::face(sketch, 0)].into();
        let view = ToolView {
            selection: &face,
            ..view
        };
        assert_eq!(tool.can_begin(&view), CanBegin::Yes);

        let args = ToolArgs {
            selection: face,
            ..Default::default()
        };
        assert_eq!(core.tool_begin(id, &args, false).unwrap(), ToolResponse::Nop);
        assert_eq!(core.active_tool(), Some(ToolId::Extrude));
    }

    #[test]
    fn test_none_event_leaves_document_untouched() {
        let mut core = core();
        core.tool_begin(ToolId::DrawLine2d, &ToolArgs::default(), false)
            .unwrap();
        core.tool_update(&click(0.0, 0.0)).unwrap();
        let before = serde_json::to_vec(core.document()).unwrap();
        assert_eq!(
            core.tool_update(&at(ToolEvent::None, 9.0, 9.0)).unwrap(),
            ToolResponse::Nop
        );
        assert_eq!(serde_json::to_vec(core.document()).unwrap(), before);
    }

    #[test]
    fn test_delete_undo_redo() {
        let mut core = core();
        draw_circle(&mut core, 2.0);
        let (circle, _) = core
            .document()
            .entities()
            .find(|(_, en)| matches!(en.kind, EntityKind::Circle2d { .. }))
            .unwrap();

        let args = ToolArgs {
            selection: [SelectableRef::entity(circle, 0)].into(),
            ..Default::default()
        };
        assert_eq!(
            core.tool_begin(ToolId::Delete, &args, false).unwrap(),
            ToolResponse::Commit
        );
        assert!(core.document().entity(circle).is_none());
        assert_eq!(core.history().current().unwrap().comment, "Delete");

        core.undo().unwrap();
        assert!(core.document().entity(circle).is_some());
        core.redo().unwrap();
        assert!(core.document().entity(circle).is_none());
    }

    #[test]
    fn test_reference_group_cannot_be_deleted_from() {
        let core = core();
        let (workplane, _) = core
            .document()
            .entities()
            .find(|(_, en)| en.group == ItemId(1))
            .unwrap();
        let sel: Selection = [SelectableRef::entity(workplane, 0)].into();
        assert_eq!(core.tool_can_begin(ToolId::Delete, &sel).can_begin, CanBegin::No);
    }

    #[test]
    fn test_revert_after_drag() {
        let mut core = core();
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            core.tool_begin(ToolId::DrawPoint2d, &ToolArgs::default(), false)
                .unwrap();
            core.tool_update(&click(x, 0.0)).unwrap();
            points.push(core.document().entities().last().unwrap().0);
        }
        let before = core.document().clone();

        let args = ToolArgs {
            selection: [SelectableRef::entity(points[0], 1)].into(),
            ..at(ToolEvent::None, 0.0, 0.0)
        };
        core.tool_begin(ToolId::Move, &args, true).unwrap();
        // A drag picks the entities up at its first event.
        core.tool_update(&at(ToolEvent::Move, 1.0, 1.0)).unwrap();
        core.tool_update(&at(ToolEvent::Move, 3.0, 4.0)).unwrap();
        assert_ne!(core.document(), &before);
        assert_eq!(
            core.tool_update(&at(ToolEvent::Action(InToolActionId::Rmb), 3.0, 4.0))
                .unwrap(),
            ToolResponse::Revert
        );
        assert_eq!(core.document(), &before);
        assert!(!core.tool_is_active());
    }

    #[test]
    fn test_second_extrude_needs_its_own_face() {
        let mut core = core();
        draw_circle(&mut core, 1.0);
        let sketch = core.current_group();
        let args = ToolArgs {
            selection: [SelectableRef::face(sketch, 0)].into(),
            ..Default::default()
        };
        core.tool_begin(ToolId::Extrude, &args, false).unwrap();
        core.tool_update(&click(0.0, 0.0)).unwrap();
        let extrudes = core
            .document()
            .groups_sorted()
            .iter()
            .filter(|(_, g)| matches!(g.kind, GroupKind::Extrude { .. }))
            .count();
        assert_eq!(extrudes, 1);

        let missing = ToolArgs {
            selection: [SelectableRef::face(sketch, 1)].into(),
            ..Default::default()
        };
        assert!(matches!(
            core.tool_begin(ToolId::Extrude, &missing, false),
            Err(ToolError::CannotBegin(ToolId::Extrude))
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use kurbo::Point;
    use proptest::prelude::*;

    use crate::core::session::Core;
    use crate::core::settings::Settings;
    use crate::document::ItemId;
    use crate::editing::selection::{SelectableRef, Selection};
    use crate::tools::catalog::InToolActionId;
    use crate::tools::context::NullInterface;
    use crate::tools::{ToolArgs, ToolEvent, ToolId};

    fn arb_selection() -> impl Strategy<Value = Selection> {
        prop::collection::btree_set(
            prop_oneof![
                (1u64..16, 0u32..3).prop_map(|(id, pt)| SelectableRef::entity(ItemId(id), pt)),
                (1u64..16).prop_map(|id| SelectableRef::constraint(ItemId(id))),
                (1u64..6, 0u32..3).prop_map(|(g, f)| SelectableRef::face(ItemId(g), f)),
            ],
            0..4,
        )
    }

    /// A session with a few circles and lines drawn in the sketch group.
    fn populated(circles: &[(f64, f64, f64)]) -> Core {
        let mut core = Core::new(&Settings::default(), Box::new(NullInterface));
        for &(x, y, r) in circles {
            let click = |px: f64, py: f64| {
                ToolArgs::with_event(ToolEvent::Action(InToolActionId::Lmb), Point::new(px, py))
            };
            core.tool_begin(ToolId::DrawCircle2d, &ToolArgs::default(), false)
                .unwrap();
            core.tool_update(&click(x, y)).unwrap();
            core.tool_update(&click(x + r, y)).unwrap();
        }
        core
    }

    proptest! {
        #[test]
        fn can_begin_never_changes_the_document(
            circles in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, 0.5f64..10.0), 0..4),
            selection in arb_selection(),
        ) {
            let core = populated(&circles);
            let before = serde_json::to_vec(core.document()).unwrap();
            for &id in ToolId::ALL {
                let first = core.tool_can_begin(id, &selection);
                let second = core.tool_can_begin(id, &selection);
                prop_assert_eq!(first, second);
            }
            prop_assert_eq!(serde_json::to_vec(core.document()).unwrap(), before);
            prop_assert!(!core.tool_is_active());
        }

        #[test]
        fn none_event_is_a_no_op(
            circles in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, 0.5f64..10.0), 1..3),
            selection in arb_selection(),
        ) {
            for &id in ToolId::ALL {
                let mut core = populated(&circles);
                if !core.tool_can_begin(id, &selection).can_begin.is_yes() {
                    continue;
                }
                let args = ToolArgs { selection: selection.clone(), ..Default::default() };
                let Ok(response) = core.tool_begin(id, &args, false) else {
                    continue;
                };
                if response.is_final() {
                    continue;
                }
                let before = serde_json::to_vec(core.document()).unwrap();
                core.tool_update(&ToolArgs::default()).unwrap();
                prop_assert_eq!(serde_json::to_vec(core.document()).unwrap(), before);
            }
        }
    }
}
