//! The annotated study-plot location drawn on every frame.

use serde::{Deserialize, Serialize};

/// A labelled point drawn on both panels.
///
/// On the map panel the site is a marker with a text label at
/// `(label_x, label_y)`. On the surface panel it is drawn as two vertical stem
/// segments (`lower_stem` below the label, `upper_stem` rising above the
/// terrain) with the label at `label_z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub lower_stem: (f64, f64),
    pub upper_stem: (f64, f64),
    pub label_z: f64,
}

impl Site {
    /// Senator Beck Study Plot in the San Juan Mountains (UTM 13N).
    pub fn sasp() -> Self {
        Self {
            name: "SASP".to_string(),
            x: 260315.0,
            y: 4198989.0,
            label_x: 260615.0,
            label_y: 4199989.0,
            lower_stem: (0.0, 3300.0),
            upper_stem: (3400.0, 4500.0),
            label_z: 4600.0,
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::sasp()
    }
}
