//! The editable document: entities, constraints and groups.
//!
//! Every collection is a `BTreeMap` so that two documents with the same
//! content always serialize to the same bytes.

pub mod constraint;
pub mod entity;
pub mod group;

use bevy::log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

use crate::core::errors::{SketchContext, SketchResult};

pub use constraint::{Constraint, ConstraintKind};
pub use entity::{Entity, EntityKind, EntityPoint, EntityType};
pub use group::{Group, GroupKind};

/// File format version written by this build. Files with a newer version
/// open read-only.
pub const DOCUMENT_VERSION: u32 = 1;

/// Identifier of an entity, constraint or group. Never reused within a
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Items scheduled for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsToDelete {
    pub entities: BTreeSet<ItemId>,
    pub constraints: BTreeSet<ItemId>,
}

impl ItemsToDelete {
    pub fn append(&mut self, other: ItemsToDelete) {
        self.entities.extend(other.entities);
        self.constraints.extend(other.constraints);
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.constraints.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    next_id: u64,
    #[serde(default)]
    entities: BTreeMap<ItemId, Entity>,
    #[serde(default)]
    constraints: BTreeMap<ItemId, Constraint>,
    groups: BTreeMap<ItemId, Group>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A new document with a reference group holding the XY workplane and
    /// an empty sketch on that workplane.
    pub fn new() -> Self {
        let mut doc = Self {
            version: DOCUMENT_VERSION,
            next_id: 1,
            entities: BTreeMap::new(),
            constraints: BTreeMap::new(),
            groups: BTreeMap::new(),
        };
        let reference = doc.add_group("Reference", GroupKind::Reference);
        let xy = doc.add_entity(Entity::new(
            reference,
            EntityKind::Workplane {
                origin: kurbo::Point::ZERO,
            },
        ));
        let sketch = doc.add_group("Sketch", GroupKind::Sketch);
        if let Some(group) = doc.group_mut(sketch) {
            group.active_workplane = Some(xy);
        }
        doc
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_file_context("read", path)?;
        let doc: Document = serde_json::from_str(&text).with_file_context("parse", path)?;
        doc.validate()?;
        debug!(
            "Loaded document {} ({} entities, {} constraints, {} groups)",
            path.display(),
            doc.entities.len(),
            doc.constraints.len(),
            doc.groups.len()
        );
        Ok(doc)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> SketchResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_file_context("write", path)?;
        Ok(())
    }

    /// Checks references between items after loading.
    pub fn validate(&self) -> SketchResult<()> {
        anyhow::ensure!(!self.groups.is_empty(), "document has no groups");
        for (id, entity) in &self.entities {
            anyhow::ensure!(
                self.groups.contains_key(&entity.group),
                "entity {id} refers to missing group {}",
                entity.group
            );
            anyhow::ensure!(id.0 < self.next_id, "entity {id} is beyond the id counter");
        }
        for (id, constraint) in &self.constraints {
            for en in constraint.referenced_entities() {
                anyhow::ensure!(
                    self.entities.contains_key(&en),
                    "constraint {id} refers to missing entity {en}"
                );
            }
            anyhow::ensure!(id.0 < self.next_id, "constraint {id} is beyond the id counter");
        }
        for (id, group) in &self.groups {
            if let GroupKind::Extrude { source, .. } = group.kind {
                anyhow::ensure!(
                    self.groups.contains_key(&source),
                    "group {id} extrudes missing group {source}"
                );
            }
            anyhow::ensure!(id.0 < self.next_id, "group {id} is beyond the id counter");
        }
        Ok(())
    }

    /// The document was written by a newer version of the application.
    pub fn is_read_only(&self) -> bool {
        self.version > DOCUMENT_VERSION
    }

    fn alloc_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_entity(&mut self, entity: Entity) -> ItemId {
        let id = self.alloc_id();
        self.entities.insert(id, entity);
        id
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ItemId {
        let id = self.alloc_id();
        self.constraints.insert(id, constraint);
        id
    }

    /// Appends a group after the last one.
    pub fn add_group(&mut self, name: &str, kind: GroupKind) -> ItemId {
        let index = self
            .groups
            .values()
            .map(|g| g.index + 1)
            .max()
            .unwrap_or(0);
        let id = self.alloc_id();
        self.groups.insert(id, Group::new(name, index, kind));
        id
    }

    pub fn entity(&self, id: ItemId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: ItemId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (ItemId, &Entity)> {
        self.entities.iter().map(|(id, en)| (*id, en))
    }

    pub fn constraint(&self, id: ItemId) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    pub fn constraint_mut(&mut self, id: ItemId) -> Option<&mut Constraint> {
        self.constraints.get_mut(&id)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (ItemId, &Constraint)> {
        self.constraints.iter().map(|(id, c)| (*id, c))
    }

    pub fn group(&self, id: ItemId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: ItemId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    pub fn contains_group(&self, id: ItemId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Groups in build order.
    pub fn groups_sorted(&self) -> Vec<(ItemId, &Group)> {
        let mut groups: Vec<_> = self.groups.iter().map(|(id, g)| (*id, g)).collect();
        groups.sort_by_key(|(_, g)| g.index);
        groups
    }

    pub fn entity_point(&self, enp: EntityPoint) -> Option<kurbo::Point> {
        self.entity(enp.entity)?.point(enp.point)
    }

    pub fn is_valid_point(&self, enp: EntityPoint) -> bool {
        self.entity_point(enp).is_some()
    }

    /// Entities of the reference group are fixed.
    pub fn can_delete_entity(&self, id: ItemId) -> bool {
        self.entity(id)
            .and_then(|en| self.group(en.group))
            .is_some_and(|group| !group.is_reference())
    }

    /// Constraints relating exactly these two points.
    pub fn find_constraints(&self, a: EntityPoint, b: EntityPoint) -> Vec<(ItemId, &Constraint)> {
        self.constraints()
            .filter(|(_, c)| c.relates(a, b))
            .collect()
    }

    /// Everything that has to go along with `items`: entities drawn in a
    /// deleted workplane and constraints referencing a deleted entity.
    pub fn additional_items_to_delete(&self, items: &ItemsToDelete) -> ItemsToDelete {
        let mut entities = items.entities.clone();
        loop {
            let dependents: Vec<ItemId> = self
                .entities
                .iter()
                .filter(|(id, en)| {
                    !entities.contains(id)
                        && en.workplane().is_some_and(|wrkpl| entities.contains(&wrkpl))
                })
                .map(|(id, _)| *id)
                .collect();
            if dependents.is_empty() {
                break;
            }
            entities.extend(dependents);
        }

        let constraints = self
            .constraints
            .iter()
            .filter(|(id, c)| {
                !items.constraints.contains(id)
                    && c.referenced_entities().iter().any(|en| entities.contains(en))
            })
            .map(|(id, _)| *id)
            .collect();

        ItemsToDelete {
            entities: entities.difference(&items.entities).copied().collect(),
            constraints,
        }
    }

    pub fn delete_items(&mut self, items: &ItemsToDelete) {
        for id in &items.entities {
            self.entities.remove(id);
        }
        for id in &items.constraints {
            self.constraints.remove(id);
        }
        for group in self.groups.values_mut() {
            if group
                .active_workplane
                .is_some_and(|wrkpl| items.entities.contains(&wrkpl))
            {
                group.active_workplane = None;
            }
        }
    }

    pub fn set_group_solve_pending(&mut self, group: ItemId) {
        if let Some(group) = self.groups.get_mut(&group) {
            group.solve_pending = true;
        }
    }

    pub fn set_group_generate_pending(&mut self, group: ItemId) {
        if let Some(group) = self.groups.get_mut(&group) {
            group.generate_pending = true;
        }
    }

    /// Clears all pending flags, returning the groups that had any set.
    pub fn take_pending(&mut self) -> Vec<ItemId> {
        let mut touched = Vec::new();
        for (id, group) in self.groups.iter_mut() {
            if group.solve_pending || group.generate_pending {
                touched.push(*id);
            }
            group.solve_pending = false;
            group.generate_pending = false;
        }
        touched
    }

    /// Number of closed faces in a sketch group: every circle, plus every
    /// independent cycle of lines joined end to end by coincident constraints.
    /// Construction geometry does not bound faces.
    pub fn face_count(&self, group: ItemId) -> usize {
        if !self.group(group).is_some_and(Group::is_sketch) {
            return 0;
        }

        let in_group = |en: &Entity| en.group == group && !en.construction;
        let circles = self
            .entities
            .values()
            .filter(|en| in_group(en) && en.entity_type() == EntityType::Circle2d)
            .count();

        let lines: Vec<ItemId> = self
            .entities
            .iter()
            .filter(|(_, en)| in_group(en) && en.entity_type() == EntityType::Line2d)
            .map(|(id, _)| *id)
            .collect();
        if lines.is_empty() {
            return circles;
        }

        // Endpoints merged by coincident constraints form the graph's nodes.
        let mut endpoints = HashMap::new();
        for (i, line) in lines.iter().enumerate() {
            endpoints.insert(EntityPoint::new(*line, 1), 2 * i);
            endpoints.insert(EntityPoint::new(*line, 2), 2 * i + 1);
        }
        let mut nodes = UnionFind::new(2 * lines.len());
        for constraint in self.constraints.values() {
            if let ConstraintKind::PointsCoincident { a, b } = constraint.kind {
                if let (Some(&ia), Some(&ib)) = (endpoints.get(&a), endpoints.get(&b)) {
                    nodes.union(ia, ib);
                }
            }
        }

        let mut roots: Vec<usize> = (0..2 * lines.len()).map(|i| nodes.find(i)).collect();
        roots.sort_unstable();
        roots.dedup();
        let node_index: HashMap<usize, usize> =
            roots.iter().enumerate().map(|(i, root)| (*root, i)).collect();

        let mut components = UnionFind::new(roots.len());
        for i in 0..lines.len() {
            let a = node_index[&nodes.find(2 * i)];
            let b = node_index[&nodes.find(2 * i + 1)];
            components.union(a, b);
        }
        let component_count = (0..roots.len())
            .filter(|&i| components.find(i) == i)
            .count();

        // Cyclomatic number: edges - vertices + components.
        circles + lines.len() + component_count - roots.len()
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn sketch(doc: &Document) -> (ItemId, ItemId) {
        let (id, group) = doc.groups_sorted()[1];
        (id, group.active_workplane.unwrap())
    }

    fn add_line(doc: &mut Document, a: (f64, f64), b: (f64, f64)) -> ItemId {
        let (group, workplane) = sketch(doc);
        doc.add_entity(Entity::new(
            group,
            EntityKind::Line2d {
                workplane,
                p1: Point::new(a.0, a.1),
                p2: Point::new(b.0, b.1),
            },
        ))
    }

    fn join(doc: &mut Document, a: ItemId, b: ItemId) {
        let (group, workplane) = sketch(doc);
        doc.add_constraint(Constraint::new(
            group,
            Some(workplane),
            ConstraintKind::PointsCoincident {
                a: EntityPoint::new(a, 2),
                b: EntityPoint::new(b, 1),
            },
        ));
    }

    #[test]
    fn test_new_document_layout() {
        let doc = Document::new();
        let groups = doc.groups_sorted();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].1.is_reference());
        assert!(groups[1].1.is_sketch());
        let wrkpl = groups[1].1.active_workplane.unwrap();
        assert_eq!(doc.entity(wrkpl).unwrap().entity_type(), EntityType::Workplane);
        assert!(!doc.can_delete_entity(wrkpl));
        assert!(!doc.is_read_only());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut doc = Document::new();
        let a = add_line(&mut doc, (0.0, 0.0), (1.0, 0.0));
        doc.delete_items(&ItemsToDelete {
            entities: [a].into(),
            constraints: BTreeSet::new(),
        });
        let b = add_line(&mut doc, (0.0, 0.0), (1.0, 0.0));
        assert!(b > a);
    }

    #[test]
    fn test_deleting_an_entity_takes_its_constraints() {
        let mut doc = Document::new();
        let a = add_line(&mut doc, (0.0, 0.0), (1.0, 0.0));
        let b = add_line(&mut doc, (1.0, 0.0), (1.0, 1.0));
        join(&mut doc, a, b);
        let items = ItemsToDelete {
            entities: [a].into(),
            constraints: BTreeSet::new(),
        };
        let extra = doc.additional_items_to_delete(&items);
        assert!(extra.entities.is_empty());
        assert_eq!(extra.constraints.len(), 1);
    }

    #[test]
    fn test_deleting_a_workplane_takes_its_sketch() {
        let mut doc = Document::new();
        let (_, wrkpl) = sketch(&doc);
        let line = add_line(&mut doc, (0.0, 0.0), (1.0, 0.0));
        let items = ItemsToDelete {
            entities: [wrkpl].into(),
            constraints: BTreeSet::new(),
        };
        let mut extra = doc.additional_items_to_delete(&items);
        assert_eq!(extra.entities, [line].into());
        extra.append(items);
        doc.delete_items(&extra);
        assert!(doc.entity(line).is_none());
        assert_eq!(sketch_group(&doc).active_workplane, None);
    }

    fn sketch_group(doc: &Document) -> &Group {
        doc.groups_sorted()[1].1
    }

    #[test]
    fn test_face_count_of_a_closed_rectangle() {
        let mut doc = Document::new();
        let (group, _) = sketch(&doc);
        let l1 = add_line(&mut doc, (0.0, 0.0), (10.0, 0.0));
        let l2 = add_line(&mut doc, (10.0, 0.0), (10.0, 5.0));
        let l3 = add_line(&mut doc, (10.0, 5.0), (0.0, 5.0));
        let l4 = add_line(&mut doc, (0.0, 5.0), (0.0, 0.0));
        join(&mut doc, l1, l2);
        join(&mut doc, l2, l3);
        join(&mut doc, l3, l4);
        assert_eq!(doc.face_count(group), 0);
        join(&mut doc, l4, l1);
        assert_eq!(doc.face_count(group), 1);
    }

    #[test]
    fn test_face_count_counts_circles_but_not_construction() {
        let mut doc = Document::new();
        let (group, workplane) = sketch(&doc);
        let circle = doc.add_entity(Entity::new(
            group,
            EntityKind::Circle2d {
                workplane,
                center: Point::ZERO,
                radius: 2.0,
            },
        ));
        assert_eq!(doc.face_count(group), 1);
        doc.entity_mut(circle).unwrap().construction = true;
        assert_eq!(doc.face_count(group), 0);
        let reference = doc.groups_sorted()[0].0;
        assert_eq!(doc.face_count(reference), 0);
    }

    #[test]
    fn test_file_round_trip_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.json");
        let mut doc = Document::new();
        add_line(&mut doc, (0.0, 0.0), (3.0, 4.0));
        doc.save_to_file(&path).unwrap();
        let loaded = Document::load_from_file(&path).unwrap();
        assert_eq!(loaded, doc);

        std::fs::write(&path, r#"{"version":1,"next_id":1,"groups":{}}"#).unwrap();
        assert!(Document::load_from_file(&path).is_err());
    }

    #[test]
    fn test_newer_version_is_read_only() {
        let mut doc = Document::new();
        doc.version = DOCUMENT_VERSION + 1;
        assert!(doc.is_read_only());
    }
}
