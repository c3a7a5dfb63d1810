//! Engine-wide constants
//!
//! Single source of truth for canvas defaults and interaction magic numbers.

/// Canvas defaults
pub mod canvas {
    /// Default canvas width in pixels
    pub const DEFAULT_WIDTH: f64 = 1920.0;
    /// Default canvas height in pixels
    pub const DEFAULT_HEIGHT: f64 = 1080.0;
    /// Default grid cell size used when snap-to-grid is enabled
    pub const DEFAULT_GRID_SIZE: f64 = 20.0;
}

/// Node geometry defaults
pub mod nodes {
    /// Default node width when a type declares no size of its own
    pub const DEFAULT_WIDTH: f64 = 200.0;
    /// Default node height when a type declares no size of its own
    pub const DEFAULT_HEIGHT: f64 = 120.0;
    /// Minimum node width when a type declares no minimum of its own
    pub const FALLBACK_MIN_WIDTH: f64 = 40.0;
    /// Minimum node height when a type declares no minimum of its own
    pub const FALLBACK_MIN_HEIGHT: f64 = 40.0;
}

/// Group layout configuration
pub mod groups {
    /// Padding added around the members' bounding box when a group is created
    pub const PADDING: f64 = 24.0;
    /// Fixed height of a collapsed group header
    pub const COLLAPSED_HEIGHT: f64 = 48.0;
    /// Color assigned to new groups until the user picks one
    pub const DEFAULT_COLOR: &str = "#8b5cf6";
}

/// Confirmation tokens for destructive operations
pub mod confirmations {
    /// Token the caller must type to clear the whole canvas
    pub const CLEAR_CANVAS: &str = "DELETE";
}

/// Undo history configuration
pub mod history {
    /// Snapshots kept before the oldest states are trimmed
    pub const DEFAULT_CAPACITY: usize = 100;
}
