//! Key bindings
//!
//! Bindings come from the settings file and name tools and actions by their
//! lookup table names, e.g. `"CONSTRAIN_HORIZONTAL": ["i h"]`. A sequence is
//! a space separated list of items; an item is a key with optional
//! modifiers, e.g. `Ctrl+Shift+z`.

use anyhow::Context;
use bevy::log::{debug, warn};
use bitflags::bitflags;
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

use super::errors::{bail, SketchResult};
use super::settings::Settings;
use crate::tools::catalog::{
    catalog_item, in_tool_action_catalog, ActionFlags, ActionToolId, InToolActionId,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequenceItem {
    pub key: SmolStr,
    pub mods: Modifiers,
}

impl KeySequenceItem {
    pub fn new(key: &str, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }
}

impl FromStr for KeySequenceItem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> SketchResult<Self> {
        // A trailing '+' is the plus key itself, e.g. "Ctrl++".
        let (prefix, key) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match s.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", s),
            },
        };
        if key.is_empty() {
            bail!("key sequence item \"{}\" has no key", s);
        }
        let mut mods = Modifiers::empty();
        for m in prefix.split('+').filter(|m| !m.is_empty()) {
            mods |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "shift" => Modifiers::SHIFT,
                "alt" => Modifiers::ALT,
                _ => bail!("unknown modifier \"{}\" in \"{}\"", m, s),
            };
        }
        Ok(Self::new(key, mods))
    }
}

impl fmt::Display for KeySequenceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(Modifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.mods.contains(Modifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        if self.mods.contains(Modifiers::ALT) {
            f.write_str("Alt+")?;
        }
        f.write_str(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeySequence(pub Vec<KeySequenceItem>);

impl KeySequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, item: KeySequenceItem) {
        self.0.push(item);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromStr for KeySequence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> SketchResult<Self> {
        let items = s
            .split_whitespace()
            .map(str::parse)
            .collect::<SketchResult<Vec<KeySequenceItem>>>()?;
        if items.is_empty() {
            bail!("empty key sequence");
        }
        Ok(Self(items))
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    None,
    /// The keys typed so far start the binding.
    Prefix,
    Complete,
}

/// Compares the keys typed so far with a binding.
pub fn key_sequence_match(current: &KeySequence, binding: &KeySequence) -> KeyMatch {
    if current.is_empty() || current.len() > binding.len() {
        return KeyMatch::None;
    }
    if current.0[..] != binding.0[..current.len()] {
        return KeyMatch::None;
    }
    if current.len() == binding.len() {
        KeyMatch::Complete
    } else {
        KeyMatch::Prefix
    }
}

/// Result of feeding the typed keys to the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    None,
    /// Wait for more keys.
    Pending,
    Matched(ActionToolId),
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeySequence, ActionToolId)>,
    in_tool: Vec<(KeySequenceItem, InToolActionId)>,
}

impl Keymap {
    /// Builds the keymap from settings, resolving names through the lookup
    /// tables. Unknown names and malformed sequences are errors.
    pub fn from_settings(settings: &Settings) -> SketchResult<Self> {
        let mut bindings = Vec::new();
        for (name, sequences) in &settings.keys {
            let id = ActionToolId::parse(name)?;
            let unbindable = catalog_item(id)
                .is_some_and(|item| item.flags.contains(ActionFlags::NO_PREFERENCES));
            if unbindable {
                warn!("{} cannot be bound to keys, ignoring its bindings", name);
                continue;
            }
            for seq in sequences {
                let keys: KeySequence = seq
                    .parse()
                    .with_context(|| format!("key binding of {name}"))?;
                bindings.push((keys, id));
            }
        }

        let mut in_tool = Vec::new();
        for (id, item) in in_tool_action_catalog() {
            if !item.default_key.is_empty() {
                in_tool.push((item.default_key.parse()?, *id));
            }
        }

        debug!("Keymap has {} bindings", bindings.len());
        Ok(Self { bindings, in_tool })
    }

    pub fn lookup(&self, current: &KeySequence) -> KeyLookup {
        let mut pending = false;
        for (keys, id) in &self.bindings {
            match key_sequence_match(current, keys) {
                KeyMatch::Complete => return KeyLookup::Matched(*id),
                KeyMatch::Prefix => pending = true,
                KeyMatch::None => {}
            }
        }
        if pending {
            KeyLookup::Pending
        } else {
            KeyLookup::None
        }
    }

    /// In-tool action bound to a single key press.
    pub fn in_tool_action(&self, item: &KeySequenceItem) -> Option<InToolActionId> {
        self.in_tool
            .iter()
            .find(|(key, _)| key == item)
            .map(|(_, id)| *id)
    }

    pub fn sequences_for(&self, id: ActionToolId) -> Vec<&KeySequence> {
        self.bindings
            .iter()
            .filter(|(_, i)| *i == id)
            .map(|(keys, _)| keys)
            .collect()
    }
}
