//! Selection of document items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::document::{Document, EntityPoint, EntityType, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectableKind {
    Entity,
    Constraint,
    /// A closed face of a sketch group; `point` holds the face index.
    Face,
}

/// One selected thing. For entities `point` follows the entity point
/// convention (0 = the whole entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectableRef {
    pub kind: SelectableKind,
    pub item: ItemId,
    pub point: u32,
}

impl SelectableRef {
    pub fn entity(item: ItemId, point: u32) -> Self {
        Self {
            kind: SelectableKind::Entity,
            item,
            point,
        }
    }

    pub fn constraint(item: ItemId) -> Self {
        Self {
            kind: SelectableKind::Constraint,
            item,
            point: 0,
        }
    }

    pub fn face(group: ItemId, index: u32) -> Self {
        Self {
            kind: SelectableKind::Face,
            item: group,
            point: index,
        }
    }

    pub fn is_entity(&self) -> bool {
        self.kind == SelectableKind::Entity
    }

    pub fn entity_point(&self) -> Option<EntityPoint> {
        self.is_entity()
            .then(|| EntityPoint::new(self.item, self.point))
    }
}

pub type Selection = BTreeSet<SelectableRef>;

/// The two points a two-point constraint applies to: either a whole line
/// (its endpoints) or two valid entity points.
pub fn two_points_from_selection(
    doc: &Document,
    selection: &Selection,
) -> Option<(EntityPoint, EntityPoint)> {
    if selection.len() == 1 {
        let sr = selection.iter().next()?;
        if !sr.is_entity() || sr.point != 0 {
            return None;
        }
        let en = doc.entity(sr.item)?;
        if en.entity_type() != EntityType::Line2d {
            return None;
        }
        return Some((EntityPoint::new(sr.item, 1), EntityPoint::new(sr.item, 2)));
    }

    if selection.len() != 2 {
        return None;
    }
    let mut points = selection
        .iter()
        .filter_map(SelectableRef::entity_point)
        .filter(|enp| enp.point != 0 && doc.is_valid_point(*enp));
    let a = points.next()?;
    let b = points.next()?;
    Some((a, b))
}

/// Ids of all selected entities, whether selected whole or by a point.
pub fn selected_entities(selection: &Selection) -> BTreeSet<ItemId> {
    selection
        .iter()
        .filter(|sr| sr.is_entity())
        .map(|sr| sr.item)
        .collect()
}

/// The single selected face, if the selection is exactly one face.
pub fn single_face(selection: &Selection) -> Option<(ItemId, u32)> {
    match selection.iter().collect::<Vec<_>>().as_slice() {
        [sr] if sr.kind == SelectableKind::Face => Some((sr.item, sr.point)),
        _ => None,
    }
}
