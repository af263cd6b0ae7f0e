//! Groups: the ordered steps a part is built from.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupKind {
    /// Holds the reference workplanes; never edited by tools.
    Reference,
    Sketch,
    /// Extrudes face `face` of sketch group `source` by `distance`.
    Extrude {
        source: ItemId,
        face: u32,
        distance: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: SmolStr,
    pub index: u32,
    #[serde(flatten)]
    pub kind: GroupKind,
    #[serde(default)]
    pub active_workplane: Option<ItemId>,
    #[serde(skip)]
    pub solve_pending: bool,
    #[serde(skip)]
    pub generate_pending: bool,
}

impl Group {
    pub fn new(name: impl Into<SmolStr>, index: u32, kind: GroupKind) -> Self {
        Self {
            name: name.into(),
            index,
            kind,
            active_workplane: None,
            solve_pending: false,
            generate_pending: false,
        }
    }

    pub fn is_sketch(&self) -> bool {
        matches!(self.kind, GroupKind::Sketch)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, GroupKind::Reference)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            GroupKind::Reference => "reference",
            GroupKind::Sketch => "sketch",
            GroupKind::Extrude { .. } => "extrude",
        }
    }
}
