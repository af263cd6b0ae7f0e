//! Sketch entities.
//!
//! Point indices follow one convention everywhere: index 0 addresses the
//! entity as a whole, indices from 1 upwards address its defining points.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use super::ItemId;

/// A specific point of an entity, e.g. the second endpoint of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityPoint {
    pub entity: ItemId,
    pub point: u32,
}

impl EntityPoint {
    pub fn new(entity: ItemId, point: u32) -> Self {
        Self { entity, point }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Point2d,
    Line2d,
    Circle2d,
    Workplane,
}

/// Geometry of an entity. 2D entities live in a workplane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Point2d {
        workplane: ItemId,
        p: Point,
    },
    Line2d {
        workplane: ItemId,
        p1: Point,
        p2: Point,
    },
    Circle2d {
        workplane: ItemId,
        center: Point,
        radius: f64,
    },
    Workplane {
        origin: Point,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub group: ItemId,
    #[serde(default)]
    pub construction: bool,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(group: ItemId, kind: EntityKind) -> Self {
        Self {
            group,
            construction: false,
            kind,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Point2d { .. } => EntityType::Point2d,
            EntityKind::Line2d { .. } => EntityType::Line2d,
            EntityKind::Circle2d { .. } => EntityType::Circle2d,
            EntityKind::Workplane { .. } => EntityType::Workplane,
        }
    }

    /// Workplane a 2D entity is drawn in.
    pub fn workplane(&self) -> Option<ItemId> {
        match self.kind {
            EntityKind::Point2d { workplane, .. }
            | EntityKind::Line2d { workplane, .. }
            | EntityKind::Circle2d { workplane, .. } => Some(workplane),
            EntityKind::Workplane { .. } => None,
        }
    }

    pub fn point(&self, index: u32) -> Option<Point> {
        match (&self.kind, index) {
            (EntityKind::Point2d { p, .. }, 1) => Some(*p),
            (EntityKind::Line2d { p1, .. }, 1) => Some(*p1),
            (EntityKind::Line2d { p2, .. }, 2) => Some(*p2),
            (EntityKind::Circle2d { center, .. }, 1) => Some(*center),
            (EntityKind::Workplane { origin }, 1) => Some(*origin),
            _ => None,
        }
    }

    /// Moves one defining point. Returns false for an invalid index.
    pub fn set_point(&mut self, index: u32, to: Point) -> bool {
        let slot = match (&mut self.kind, index) {
            (EntityKind::Point2d { p, .. }, 1) => p,
            (EntityKind::Line2d { p1, .. }, 1) => p1,
            (EntityKind::Line2d { p2, .. }, 2) => p2,
            (EntityKind::Circle2d { center, .. }, 1) => center,
            (EntityKind::Workplane { origin }, 1) => origin,
            _ => return false,
        };
        *slot = to;
        true
    }

    pub fn is_valid_point(&self, index: u32) -> bool {
        self.point(index).is_some()
    }

    pub fn point_indices(&self) -> &'static [u32] {
        match self.kind {
            EntityKind::Line2d { .. } => &[1, 2],
            _ => &[1],
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for &index in self.point_indices() {
            if let Some(p) = self.point(index) {
                self.set_point(index, p + delta);
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.entity_type() {
            EntityType::Point2d => "point",
            EntityType::Line2d => "line",
            EntityType::Circle2d => "circle",
            EntityType::Workplane => "workplane",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Entity {
        Entity::new(
            ItemId(1),
            EntityKind::Line2d {
                workplane: ItemId(2),
                p1: Point::new(0.0, 0.0),
                p2: Point::new(10.0, 0.0),
            },
        )
    }

    #[test]
    fn test_line_points() {
        let mut en = line();
        assert_eq!(en.point(2), Some(Point::new(10.0, 0.0)));
        assert_eq!(en.point(0), None);
        assert_eq!(en.point(3), None);
        assert!(en.set_point(1, Point::new(-1.0, 0.0)));
        assert!(!en.set_point(3, Point::ZERO));
        assert_eq!(en.point(1), Some(Point::new(-1.0, 0.0)));
    }

    #[test]
    fn test_translate_moves_every_point() {
        let mut en = line();
        en.translate(Vec2::new(1.0, 2.0));
        assert_eq!(en.point(1), Some(Point::new(1.0, 2.0)));
        assert_eq!(en.point(2), Some(Point::new(11.0, 2.0)));
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(line()).unwrap();
        assert_eq!(json["type"], "line2d");
        assert_eq!(json["construction"], false);
    }
}
