//! Pluggable dashboard widgets.
//!
//! A widget type is described by a static [`WidgetDescriptor`] (icon, options
//! schema, grid size bounds). The user places [`WidgetInstance`]s of a type on
//! the dashboard; instances are stored in the shelf document.
//!
//! The only widget type shipped today is the torrent network-traffic chart
//! (`dlspeed`), see [`traffic`].

pub mod format;
pub mod host;
pub mod traffic;

pub use host::{WidgetHost, WidgetView};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Min/max grid size a widget type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl GridBounds {
    pub fn contains(&self, placement: &GridPlacement) -> bool {
        (self.min_width..=self.max_width).contains(&placement.width)
            && (self.min_height..=self.max_height).contains(&placement.height)
    }
}

/// Static capability record of a widget type.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetDescriptor {
    pub id: &'static str,
    pub icon: &'static str,
    /// Options schema; keys are option names
    pub options: Map<String, Value>,
    pub gridstack: GridBounds,
}

/// All widget types this build knows about.
pub fn descriptors() -> Vec<WidgetDescriptor> {
    vec![traffic::descriptor()]
}

/// Look up the descriptor for a widget type tag.
pub fn descriptor(widget_type: &str) -> Option<WidgetDescriptor> {
    descriptors().into_iter().find(|d| d.id == widget_type)
}

/// Position and size of a widget instance on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        }
    }
}

/// A widget placed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub placement: GridPlacement,
}

impl WidgetInstance {
    /// New instance with a generated id, sized at the type's minimum bounds.
    pub fn new(widget_type: &str) -> Self {
        let placement = descriptor(widget_type)
            .map(|d| GridPlacement {
                width: d.gridstack.min_width,
                height: d.gridstack.min_height,
                ..GridPlacement::default()
            })
            .unwrap_or_default();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            widget_type: widget_type.to_string(),
            options: Map::new(),
            placement,
        }
    }

    /// Check the type is known and the placement fits its grid bounds.
    pub fn validate(&self) -> Result<WidgetDescriptor, String> {
        let descriptor = descriptor(&self.widget_type)
            .ok_or_else(|| format!("unknown widget type '{}'", self.widget_type))?;

        if !descriptor.gridstack.contains(&self.placement) {
            let b = descriptor.gridstack;
            return Err(format!(
                "widget '{}' must be {}..={} wide and {}..={} high, got {}x{}",
                self.id,
                b.min_width,
                b.max_width,
                b.min_height,
                b.max_height,
                self.placement.width,
                self.placement.height
            ));
        }

        Ok(descriptor)
    }
}
