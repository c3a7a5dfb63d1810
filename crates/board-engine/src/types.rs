//! Core types for board graphs
//!
//! These types define the structure of a canvas board: nodes with
//! geometry and settings, directed edges, and group state. The graph
//! container that owns them lives in [`crate::graph`].

use serde::{Deserialize, Serialize};

use crate::constants;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// A point on the canvas, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a node in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions so they are at least `min`
    pub fn clamped_to(self, min: Size) -> Size {
        Size {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: constants::nodes::FALLBACK_MIN_WIDTH,
            height: constants::nodes::FALLBACK_MIN_HEIGHT,
        }
    }
}

/// Group-specific state, present only on nodes of the group type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupState {
    /// Title shown on the group header
    pub label: String,
    /// Tint color for the group frame
    pub color: String,
    /// Whether the group is currently collapsed to its header
    #[serde(default)]
    pub is_collapsed: bool,
    /// Full size stashed while collapsed, restored on expand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_size: Option<Size>,
}

impl GroupState {
    /// Create an expanded group state with the default color
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: constants::groups::DEFAULT_COLOR.to_string(),
            is_collapsed: false,
            expanded_size: None,
        }
    }

    /// Set the group color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// A node instance on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Node type (key into the type registry)
    pub node_type: String,
    /// Position of the top-left corner on the canvas
    pub position: Point,
    /// Current size
    pub size: Size,
    /// Rotation in degrees, clockwise
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    /// Free-form presentation data (label, content, colors, filters)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
    /// Sparse per-node values for the type's settings schema;
    /// absent keys resolve to schema defaults
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub node_settings: serde_json::Map<String, serde_json::Value>,
    /// Locked nodes reject geometry mutations
    #[serde(default)]
    pub is_locked: bool,
    /// Ratio-locked nodes preserve aspect on resize
    #[serde(default)]
    pub is_ratio_locked: bool,
    /// Back-reference to the containing group, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<NodeId>,
    /// Minimum size, copied from the type descriptor at creation
    #[serde(default)]
    pub min_size: Size,
    /// Group state, present iff this node is a group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupState>,
}

impl BoardNode {
    /// Create a node with defaulted data, settings, and flags
    pub fn new(
        id: impl Into<NodeId>,
        node_type: impl Into<String>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position,
            size,
            rotation: 0.0,
            data: serde_json::Map::new(),
            node_settings: serde_json::Map::new(),
            is_locked: false,
            is_ratio_locked: false,
            group_id: None,
            min_size: Size::default(),
            group: None,
        }
    }

    /// Set the minimum size
    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set a presentation data entry
    pub fn with_data_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Turn this node into a group with the given state
    pub fn with_group_state(mut self, state: GroupState) -> Self {
        self.group = Some(state);
        self
    }

    /// Whether this node is a group
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// Aspect ratio (width / height), if the height is non-zero
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.size.height == 0.0 {
            None
        } else {
            Some(self.size.width / self.size.height)
        }
    }
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Handle on the source node this edge leaves from
    pub source_handle: String,
    /// Target node ID
    pub target: NodeId,
    /// Handle on the target node this edge arrives at
    pub target_handle: String,
}

impl BoardEdge {
    /// Create an edge
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        source_handle: impl Into<String>,
        target: impl Into<NodeId>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }
}

/// Partial update applied to a node
///
/// Every field is optional; absent fields leave the node untouched.
/// `data` and `node_settings` shallow-merge into the existing maps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// New position
    #[serde(default)]
    pub position: Option<Point>,
    /// New size (clamped to the node's minimum)
    #[serde(default)]
    pub size: Option<Size>,
    /// New rotation in degrees
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Presentation data entries to merge
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    /// Settings entries to merge
    #[serde(default)]
    pub node_settings: Option<serde_json::Map<String, serde_json::Value>>,
    /// Lock or unlock geometry
    #[serde(default)]
    pub is_locked: Option<bool>,
    /// Enable or disable the aspect-ratio lock
    #[serde(default)]
    pub is_ratio_locked: Option<bool>,
}

impl NodePatch {
    /// Patch that moves the node
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Patch that resizes the node
    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Patch that merges one presentation data entry
    pub fn data_entry(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(key.into(), value);
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Patch that merges one settings entry
    pub fn setting(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut settings = serde_json::Map::new();
        settings.insert(key.into(), value);
        Self {
            node_settings: Some(settings),
            ..Default::default()
        }
    }

    /// Whether the patch touches position, size, or rotation
    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some() || self.rotation.is_some()
    }
}

/// Per-board canvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Whether drag-end positions snap to the grid
    #[serde(default)]
    pub snap_to_grid: bool,
    /// Grid cell size used when snapping
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

fn default_grid_size() -> f64 {
    constants::canvas::DEFAULT_GRID_SIZE
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: constants::canvas::DEFAULT_WIDTH,
            height: constants::canvas::DEFAULT_HEIGHT,
            snap_to_grid: false,
            grid_size: constants::canvas::DEFAULT_GRID_SIZE,
        }
    }
}
