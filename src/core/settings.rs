// Settings ///////////////////////////////////////////////////////////////////
// Compile-time defaults plus the user settings file.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::errors::{SketchContext, SketchResult};

// History ////////////////////////////////////////////////////////////////////

/// Number of document snapshots kept for undo, the live one included
pub const DEFAULT_UNDO_DEPTH: usize = 128;

// Tools //////////////////////////////////////////////////////////////////////

/// Distance a new extrusion starts with (in model units)
pub const DEFAULT_EXTRUDE_DISTANCE: f64 = 10.0;
/// Extrusions never get thinner than this while dragging
pub const MIN_EXTRUDE_DISTANCE: f64 = 0.01;

// Snap to Grid ///////////////////////////////////////////////////////////////

// Control whether grid snapping is enabled for drawing tools
pub const SNAP_TO_GRID_ENABLED: bool = false;
// The size of the grid to snap to
pub const SNAP_TO_GRID_VALUE: f64 = 1.0;

/// Rounds a cursor position to the grid when snapping is enabled.
pub fn snap_to_grid(p: kurbo::Point) -> kurbo::Point {
    if !SNAP_TO_GRID_ENABLED {
        return p;
    }
    kurbo::Point::new(
        (p.x / SNAP_TO_GRID_VALUE).round() * SNAP_TO_GRID_VALUE,
        (p.y / SNAP_TO_GRID_VALUE).round() * SNAP_TO_GRID_VALUE,
    )
}

/// User settings, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Settings {
    pub undo_depth: usize,
    /// Tool or action name to key sequences, e.g. `"UNDO": ["Ctrl+z"]`.
    pub keys: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        let keys = [
            ("UNDO", "Ctrl+z"),
            ("REDO", "Ctrl+Shift+z"),
            ("SAVE", "Ctrl+s"),
            ("DELETE", "Delete"),
            ("MOVE", "g"),
            ("DRAW_LINE_2D", "l"),
            ("DRAW_CIRCLE_2D", "c"),
            ("DRAW_RECTANGLE", "r"),
            ("CONSTRAIN_HORIZONTAL", "i h"),
            ("CONSTRAIN_VERTICAL", "i v"),
            ("CONSTRAIN_DISTANCE", "i d"),
            ("EXTRUDE", "e"),
        ]
        .into_iter()
        .map(|(name, seq)| (name.to_string(), vec![seq.to_string()]))
        .collect();
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
            keys,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_file_context("read", path)?;
        let settings: Settings =
            serde_json::from_str(&text).with_file_context("parse", path)?;
        anyhow::ensure!(settings.undo_depth > 0, "undo_depth must be at least 1");
        Ok(settings)
    }
}
