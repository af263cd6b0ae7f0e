//! Geometric constraints. They are only recorded here; solving them is the
//! job of an external solver.

use serde::{Deserialize, Serialize};

use super::entity::EntityPoint;
use super::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    PointsCoincident {
        a: EntityPoint,
        b: EntityPoint,
    },
    Horizontal {
        a: EntityPoint,
        b: EntityPoint,
    },
    Vertical {
        a: EntityPoint,
        b: EntityPoint,
    },
    Distance {
        a: EntityPoint,
        b: EntityPoint,
        distance: f64,
        #[serde(default)]
        measurement: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub group: ItemId,
    pub workplane: Option<ItemId>,
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(group: ItemId, workplane: Option<ItemId>, kind: ConstraintKind) -> Self {
        Self {
            group,
            workplane,
            kind,
        }
    }

    /// The two points every supported constraint relates.
    pub fn points(&self) -> [EntityPoint; 2] {
        match self.kind {
            ConstraintKind::PointsCoincident { a, b }
            | ConstraintKind::Horizontal { a, b }
            | ConstraintKind::Vertical { a, b }
            | ConstraintKind::Distance { a, b, .. } => [a, b],
        }
    }

    pub fn referenced_entities(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.points().iter().map(|p| p.entity).collect();
        ids.extend(self.workplane);
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn datum(&self) -> Option<f64> {
        match self.kind {
            ConstraintKind::Distance { distance, .. } => Some(distance),
            _ => None,
        }
    }

    /// Sets the datum value. Returns false for constraints without one.
    pub fn set_datum(&mut self, value: f64) -> bool {
        match &mut self.kind {
            ConstraintKind::Distance { distance, .. } => {
                *distance = value;
                true
            }
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ConstraintKind::PointsCoincident { .. } => "coincident",
            ConstraintKind::Horizontal { .. } => "horizontal",
            ConstraintKind::Vertical { .. } => "vertical",
            ConstraintKind::Distance { .. } => "distance",
        }
    }

    /// True if both constraints relate the same pair of points, in any order.
    pub fn relates(&self, a: EntityPoint, b: EntityPoint) -> bool {
        let [x, y] = self.points();
        (x == a && y == b) || (x == b && y == a)
    }
}
