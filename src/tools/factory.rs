//! Tool construction and the start-up consistency check of the registry.

use bevy::log::{debug, info};
use std::collections::HashSet;

use super::catalog::{
    action_lut, catalog_entries, catalog_item, in_tool_action_lut, tool_lut, ActionFlags,
    ActionId, ActionToolId, InToolActionId,
};
use super::constrain::{ConstrainCoincidentTool, ConstrainDistanceTool, ConstrainHvTool};
use super::construction::{ConstructionMode, ConstructionTool};
use super::delete::DeleteTool;
use super::draw_circle::DrawCircleTool;
use super::draw_line::DrawLineTool;
use super::draw_point::DrawPointTool;
use super::draw_rectangle::DrawRectangleTool;
use super::draw_workplane::DrawWorkplaneTool;
use super::enter_datum::EnterDatumTool;
use super::extrude::ExtrudeTool;
use super::move_items::MoveTool;
use super::tool::{Tool, ToolFlags};
use super::tool_id::ToolId;
use super::workplane::{SetWorkplaneTool, UnsetWorkplaneTool};
use crate::core::errors::RegistryError;
use crate::utils::lut::LutEnumStr;

/// Creates a fresh instance of the tool `id`.
pub fn create_tool(id: ToolId, flags: ToolFlags) -> Box<dyn Tool> {
    match id {
        ToolId::Delete => Box::new(DeleteTool),
        ToolId::Move => Box::new(MoveTool::new(flags)),
        ToolId::DrawPoint2d => Box::new(DrawPointTool),
        ToolId::DrawLine2d => Box::<DrawLineTool>::default(),
        ToolId::DrawCircle2d => Box::<DrawCircleTool>::default(),
        ToolId::DrawRectangle => Box::<DrawRectangleTool>::default(),
        ToolId::DrawWorkplane => Box::new(DrawWorkplaneTool),
        ToolId::ConstrainCoincident => Box::new(ConstrainCoincidentTool),
        ToolId::ConstrainHorizontal => Box::new(ConstrainHvTool::horizontal()),
        ToolId::ConstrainVertical => Box::new(ConstrainHvTool::vertical()),
        ToolId::ConstrainDistance => Box::new(ConstrainDistanceTool),
        ToolId::EnterDatum => Box::<EnterDatumTool>::default(),
        ToolId::ToggleConstruction => Box::new(ConstructionTool::new(ConstructionMode::Toggle)),
        ToolId::SetConstruction => Box::new(ConstructionTool::new(ConstructionMode::Set)),
        ToolId::UnsetConstruction => Box::new(ConstructionTool::new(ConstructionMode::Unset)),
        ToolId::SetWorkplane => Box::new(SetWorkplaneTool),
        ToolId::UnsetWorkplane => Box::new(UnsetWorkplaneTool),
        ToolId::Extrude => Box::<ExtrudeTool>::default(),
    }
}

fn check_lut<T>(
    lut: &LutEnumStr<T>,
    all: &[T],
    kind: &'static str,
    code: impl Fn(T) -> u16,
    wrap: impl Fn(T) -> Option<ActionToolId>,
) -> Result<(), RegistryError>
where
    T: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    let mut codes = HashSet::new();
    for &id in all {
        if !codes.insert(code(id)) {
            return Err(RegistryError::DuplicateCode {
                kind,
                code: code(id),
            });
        }
        let Some(at) = wrap(id) else {
            continue;
        };
        let Some(name) = lut.lookup_reverse(id) else {
            return Err(RegistryError::MissingLutEntry(at));
        };
        if lut.lookup(name) != Some(id) {
            return Err(RegistryError::LutMismatch { id: at, name });
        }
    }
    Ok(())
}

/// Checks what the compiler cannot: every tool and action has exactly one
/// catalog entry and one lookup table entry, codes are unique, and the
/// factory builds the tool it is asked for.
pub fn verify_registry() -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for (id, _) in catalog_entries() {
        if !seen.insert(*id) {
            return Err(RegistryError::DuplicateCatalogEntry(*id));
        }
    }
    for id in ActionToolId::all() {
        if !seen.contains(&id) {
            return Err(RegistryError::MissingCatalogEntry(id));
        }
    }

    check_lut(tool_lut(), ToolId::ALL, "tool", ToolId::code, |id| {
        Some(ActionToolId::Tool(id))
    })?;
    check_lut(action_lut(), ActionId::ALL, "action", ActionId::code, |id| {
        Some(ActionToolId::Action(id))
    })?;
    check_lut(
        in_tool_action_lut(),
        InToolActionId::ALL,
        "in-tool action",
        InToolActionId::code,
        |_| None,
    )?;

    for &id in ToolId::ALL {
        let tool = create_tool(id, ToolFlags::empty());
        if tool.id() != id {
            return Err(RegistryError::FactoryMismatch {
                requested: id,
                built: tool.id(),
            });
        }
        let declared = catalog_item(id)
            .map(|item| item.flags.contains(ActionFlags::SPECIFIC))
            .ok_or(RegistryError::MissingCatalogEntry(ActionToolId::Tool(id)))?;
        if declared != tool.is_specific() {
            return Err(RegistryError::SpecificMismatch {
                tool: id,
                declared,
                actual: tool.is_specific(),
            });
        }
        debug!("Registered tool {} ({})", id, id.code());
    }

    info!(
        "Tool registry verified: {} tools, {} actions",
        ToolId::ALL.len(),
        ActionId::ALL.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_consistent() {
        assert_eq!(verify_registry(), Ok(()));
    }

    #[test]
    fn test_factory_builds_requested_tool() {
        for &id in ToolId::ALL {
            assert_eq!(create_tool(id, ToolFlags::empty()).id(), id);
        }
    }

    #[test]
    fn test_duplicate_lut_name_is_reported() {
        let broken = LutEnumStr::new([("DELETE", ToolId::Delete), ("DELETE", ToolId::Move)]);
        let err = check_lut(&broken, ToolId::ALL, "tool", ToolId::code, |id| {
            Some(ActionToolId::Tool(id))
        })
        .unwrap_err();
        assert_eq!(err, RegistryError::MissingLutEntry(ActionToolId::Tool(ToolId::Move)));
    }

    #[test]
    fn test_extrude_is_specific() {
        let tool = create_tool(ToolId::Extrude, ToolFlags::empty());
        assert!(tool.is_specific());
        assert!(catalog_item(ToolId::Extrude)
            .unwrap()
            .flags
            .contains(ActionFlags::SPECIFIC));
    }
}
