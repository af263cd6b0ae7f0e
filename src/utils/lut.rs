//! Bidirectional lookup tables between stable names and enum values.
//!
//! Used for every textual surface of the editor: scripts, key bindings and
//! the serialized form of tool and action identifiers.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// A name that did not resolve through a lookup table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} name \"{name}\"")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

/// Lookup table mapping `&'static str` names to enum values and back.
///
/// Declaration order is remembered so listings are stable. A duplicate name
/// or value keeps its first occurrence; [`LutEnumStr::len`] then reports fewer
/// entries than were declared, which is how registry verification finds it.
#[derive(Debug, Clone)]
pub struct LutEnumStr<T> {
    forward: HashMap<&'static str, T>,
    reverse: HashMap<T, &'static str>,
    order: Vec<&'static str>,
}

impl<T> LutEnumStr<T>
where
    T: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new(items: impl IntoIterator<Item = (&'static str, T)>) -> Self {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        let mut order = Vec::new();
        for (name, value) in items {
            if forward.contains_key(name) || reverse.contains_key(&value) {
                continue;
            }
            forward.insert(name, value);
            reverse.insert(value, name);
            order.push(name);
        }
        Self {
            forward,
            reverse,
            order,
        }
    }

    /// Resolve a name to its value.
    pub fn lookup(&self, name: &str) -> Option<T> {
        self.forward.get(name).copied()
    }

    /// Resolve a value to its name.
    pub fn lookup_reverse(&self, value: T) -> Option<&'static str> {
        self.reverse.get(&value).copied()
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Fruit {
        Apple,
        Pear,
    }

    #[test]
    fn test_lookup_both_directions() {
        let lut = LutEnumStr::new([("APPLE", Fruit::Apple), ("PEAR", Fruit::Pear)]);
        assert_eq!(lut.lookup("PEAR"), Some(Fruit::Pear));
        assert_eq!(lut.lookup_reverse(Fruit::Apple), Some("APPLE"));
        assert_eq!(lut.lookup("pear"), None);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let lut = LutEnumStr::new([("PEAR", Fruit::Pear), ("APPLE", Fruit::Apple)]);
        assert_eq!(lut.names().collect::<Vec<_>>(), vec!["PEAR", "APPLE"]);
    }

    #[test]
    fn test_duplicates_keep_first_entry() {
        let lut = LutEnumStr::new([
            ("APPLE", Fruit::Apple),
            ("APPLE", Fruit::Pear),
            ("GREEN_APPLE", Fruit::Apple),
        ]);
        assert_eq!(lut.len(), 1);
        assert_eq!(lut.lookup("APPLE"), Some(Fruit::Apple));
        assert_eq!(lut.lookup("GREEN_APPLE"), None);
    }
}
