//! Action catalog and lookup tables.
//!
//! The catalog maps every tool and non-tool action to its display metadata.
//! Menus, the preferences key list and the tool-bar all read it; none of them
//! special-case an entry.

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use super::tool_id::{stable_id_enum, ToolId};
use crate::utils::lut::{LutEnumStr, UnknownName};

stable_id_enum! {
    /// Editor commands that act immediately instead of running a tool.
    pub enum ActionId ("action", crate::tools::catalog::action_lut) {
        Undo = 1 => "UNDO",
        Redo = 2 => "REDO",
        Save = 3 => "SAVE",
        PreviousGroup = 4 => "PREVIOUS_GROUP",
        NextGroup = 5 => "NEXT_GROUP",
    }
}

stable_id_enum! {
    /// Inputs an active tool can react to.
    pub enum InToolActionId ("in-tool action", crate::tools::catalog::in_tool_action_lut) {
        Lmb = 1 => "LMB",
        LmbRelease = 2 => "LMB_RELEASE",
        Rmb = 3 => "RMB",
        Cancel = 4 => "CANCEL",
        ToggleConstruction = 5 => "TOGGLE_CONSTRUCTION",
    }
}

/// Either a non-tool action or a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionToolId {
    Action(ActionId),
    Tool(ToolId),
}

impl ActionToolId {
    pub fn name(self) -> &'static str {
        match self {
            ActionToolId::Action(id) => id.name(),
            ActionToolId::Tool(id) => id.name(),
        }
    }

    /// Resolves a tool name first, then an action name. The two name
    /// spaces do not overlap.
    pub fn parse(name: &str) -> Result<Self, UnknownName> {
        if let Some(id) = tool_lut().lookup(name) {
            return Ok(ActionToolId::Tool(id));
        }
        if let Some(id) = action_lut().lookup(name) {
            return Ok(ActionToolId::Action(id));
        }
        Err(UnknownName {
            kind: "action or tool",
            name: name.to_string(),
        })
    }

    /// Every tool and action identifier.
    pub fn all() -> impl Iterator<Item = ActionToolId> {
        ActionId::ALL
            .iter()
            .map(|id| ActionToolId::Action(*id))
            .chain(ToolId::ALL.iter().map(|id| ActionToolId::Tool(*id)))
    }
}

impl fmt::Display for ActionToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ToolId> for ActionToolId {
    fn from(id: ToolId) -> Self {
        ActionToolId::Tool(id)
    }
}

impl From<ActionId> for ActionToolId {
    fn from(id: ActionId) -> Self {
        ActionToolId::Action(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ActionGroup {
    #[default]
    Unknown,
    Draw,
    Constrain,
    Undo,
    Move,
    Document,
    Group,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u32 {
        /// Needs a concrete selection; offered in the context menu.
        const SPECIFIC = 1 << 4;
        /// Not offered for key binding; a toggle covers it.
        const NO_PREFERENCES = 1 << 5;
    }
}

impl ActionFlags {
    pub const DEFAULT: ActionFlags = ActionFlags::empty();
}

impl Default for ActionFlags {
    fn default() -> Self {
        ActionFlags::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCatalogItem {
    pub name: &'static str,
    pub group: ActionGroup,
    pub flags: ActionFlags,
}

impl ActionCatalogItem {
    const fn new(name: &'static str, group: ActionGroup, flags: ActionFlags) -> Self {
        Self { name, group, flags }
    }
}

use ActionGroup as G;

const CATALOG_ENTRIES: &[(ActionToolId, ActionCatalogItem)] = &[
    (
        ActionToolId::Action(ActionId::Undo),
        ActionCatalogItem::new("Undo", G::Undo, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Action(ActionId::Redo),
        ActionCatalogItem::new("Redo", G::Undo, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Action(ActionId::Save),
        ActionCatalogItem::new("Save", G::Document, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Action(ActionId::PreviousGroup),
        ActionCatalogItem::new("Previous group", G::Group, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Action(ActionId::NextGroup),
        ActionCatalogItem::new("Next group", G::Group, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::Delete),
        ActionCatalogItem::new("Delete", G::Unknown, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::Move),
        ActionCatalogItem::new("Move", G::Move, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::DrawPoint2d),
        ActionCatalogItem::new("Draw point in workplane", G::Draw, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::DrawLine2d),
        ActionCatalogItem::new("Draw line in workplane", G::Draw, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::DrawCircle2d),
        ActionCatalogItem::new("Draw circle in workplane", G::Draw, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::DrawRectangle),
        ActionCatalogItem::new("Draw rectangle", G::Draw, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::DrawWorkplane),
        ActionCatalogItem::new("Draw workplane", G::Draw, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::ConstrainCoincident),
        ActionCatalogItem::new("Constrain coincident", G::Constrain, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::ConstrainHorizontal),
        ActionCatalogItem::new("Constrain horizontal", G::Constrain, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::ConstrainVertical),
        ActionCatalogItem::new("Constrain vertical", G::Constrain, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::ConstrainDistance),
        ActionCatalogItem::new("Constrain distance", G::Constrain, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::EnterDatum),
        ActionCatalogItem::new("Enter datum", G::Constrain, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::ToggleConstruction),
        ActionCatalogItem::new("Toggle construction", G::Unknown, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::SetConstruction),
        ActionCatalogItem::new(
            "Set construction",
            G::Unknown,
            ActionFlags::SPECIFIC.union(ActionFlags::NO_PREFERENCES),
        ),
    ),
    (
        ActionToolId::Tool(ToolId::UnsetConstruction),
        ActionCatalogItem::new(
            "Unset construction",
            G::Unknown,
            ActionFlags::SPECIFIC.union(ActionFlags::NO_PREFERENCES),
        ),
    ),
    (
        ActionToolId::Tool(ToolId::SetWorkplane),
        ActionCatalogItem::new("Set workplane", G::Unknown, ActionFlags::SPECIFIC),
    ),
    (
        ActionToolId::Tool(ToolId::UnsetWorkplane),
        ActionCatalogItem::new("Unset workplane", G::Unknown, ActionFlags::DEFAULT),
    ),
    (
        ActionToolId::Tool(ToolId::Extrude),
        ActionCatalogItem::new("Extrude", G::Group, ActionFlags::SPECIFIC),
    ),
];

/// Declared catalog entries, duplicates included.
pub fn catalog_entries() -> &'static [(ActionToolId, ActionCatalogItem)] {
    CATALOG_ENTRIES
}

static ACTION_CATALOG: LazyLock<BTreeMap<ActionToolId, ActionCatalogItem>> =
    LazyLock::new(|| CATALOG_ENTRIES.iter().copied().collect());

pub fn action_catalog() -> &'static BTreeMap<ActionToolId, ActionCatalogItem> {
    &ACTION_CATALOG
}

pub fn catalog_item(id: impl Into<ActionToolId>) -> Option<&'static ActionCatalogItem> {
    ACTION_CATALOG.get(&id.into())
}

/// Display names of the groups, in menu order.
pub const ACTION_GROUP_CATALOG: &[(ActionGroup, &str)] = &[
    (ActionGroup::Constrain, "Constrain"),
    (ActionGroup::Draw, "Draw"),
    (ActionGroup::Move, "Move"),
    (ActionGroup::Group, "Group"),
    (ActionGroup::Undo, "Undo"),
    (ActionGroup::Document, "Document"),
    (ActionGroup::Unknown, "Misc"),
];

pub fn group_name(group: ActionGroup) -> Option<&'static str> {
    ACTION_GROUP_CATALOG
        .iter()
        .find(|(g, _)| *g == group)
        .map(|(_, name)| *name)
}

static TOOL_LUT: LazyLock<LutEnumStr<ToolId>> =
    LazyLock::new(|| LutEnumStr::new(ToolId::NAMES.iter().copied()));

static ACTION_LUT: LazyLock<LutEnumStr<ActionId>> =
    LazyLock::new(|| LutEnumStr::new(ActionId::NAMES.iter().copied()));

static IN_TOOL_ACTION_LUT: LazyLock<LutEnumStr<InToolActionId>> =
    LazyLock::new(|| LutEnumStr::new(InToolActionId::NAMES.iter().copied()));

pub fn tool_lut() -> &'static LutEnumStr<ToolId> {
    &TOOL_LUT
}

pub fn action_lut() -> &'static LutEnumStr<ActionId> {
    &ACTION_LUT
}

pub fn in_tool_action_lut() -> &'static LutEnumStr<InToolActionId> {
    &IN_TOOL_ACTION_LUT
}

/// Display metadata of an in-tool action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InToolActionCatalogItem {
    pub name: &'static str,
    /// Default binding, in key sequence notation.
    pub default_key: &'static str,
}

const IN_TOOL_ACTION_CATALOG: &[(InToolActionId, InToolActionCatalogItem)] = &[
    (
        InToolActionId::Lmb,
        InToolActionCatalogItem {
            name: "Place",
            default_key: "",
        },
    ),
    (
        InToolActionId::LmbRelease,
        InToolActionCatalogItem {
            name: "Release",
            default_key: "",
        },
    ),
    (
        InToolActionId::Rmb,
        InToolActionCatalogItem {
            name: "Cancel",
            default_key: "",
        },
    ),
    (
        InToolActionId::Cancel,
        InToolActionCatalogItem {
            name: "Cancel",
            default_key: "Escape",
        },
    ),
    (
        InToolActionId::ToggleConstruction,
        InToolActionCatalogItem {
            name: "Toggle construction",
            default_key: "c",
        },
    ),
];

pub fn in_tool_action_catalog() -> &'static [(InToolActionId, InToolActionCatalogItem)] {
    IN_TOOL_ACTION_CATALOG
}

pub fn in_tool_action_item(id: InToolActionId) -> Option<&'static InToolActionCatalogItem> {
    IN_TOOL_ACTION_CATALOG
        .iter()
        .find(|(i, _)| *i == id)
        .map(|(_, item)| item)
}
