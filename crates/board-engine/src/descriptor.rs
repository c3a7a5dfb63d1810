//! Node type descriptors
//!
//! A descriptor is the single source of truth for one node type: its
//! identity, palette grouping, default geometry, edge dispatch
//! behavior, and settings schema. Node type crates register their
//! descriptors at link time through `inventory`, and the registry
//! assembles them into the installed catalog.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::schema::SettingsSchema;
use crate::types::Size;

/// Palette category of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    /// Canvas primitives shipped with every board
    Core,
    /// AI content generation
    AiGen,
    /// Triggers and schedules that start pipelines
    Signal,
    /// Routing and merging infrastructure
    System,
    /// Post-processing and refinement
    Refinement,
    /// Annotation and convenience types
    Extras,
    /// Installable text processing module
    TextProcessing,
    /// Installable social media module
    SocialMedia,
    /// Installable third-party integration module
    Integrations,
}

/// How a node hands its output to outgoing edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Every outgoing edge receives the output
    #[default]
    Broadcast,
    /// Outgoing edges are consumed one at a time, cycling in the order
    /// they were connected
    RoundRobin,
}

/// Complete metadata for one node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDescriptor {
    /// Unique type identifier (e.g. "content-generator")
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Palette category
    pub category: NodeCategory,
    /// Description shown in the palette
    pub description: String,
    /// Icon identifier for the frontend
    pub icon: String,
    /// Core types cannot be uninstalled
    pub is_core: bool,
    /// Whether the type is installed before any module activation
    pub preinstalled: bool,
    /// Size given to freshly created nodes
    pub default_size: Size,
    /// Smallest size a node of this type may take
    pub min_size: Size,
    /// Output dispatch behavior
    pub dispatch: DispatchMode,
    /// Whether edges from a node to itself are rejected
    #[serde(default)]
    pub forbid_self_loops: bool,
    /// Settings panel description
    pub settings: SettingsSchema,
}

impl NodeTypeDescriptor {
    /// Create a descriptor with default geometry and an empty schema
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: NodeCategory,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            description: String::new(),
            icon: String::new(),
            is_core: false,
            preinstalled: false,
            default_size: Size::new(
                constants::nodes::DEFAULT_WIDTH,
                constants::nodes::DEFAULT_HEIGHT,
            ),
            min_size: Size::default(),
            dispatch: DispatchMode::Broadcast,
            forbid_self_loops: false,
            settings: SettingsSchema::new(),
        }
    }

    /// Create a core descriptor: preinstalled and protected from uninstall
    pub fn core(id: impl Into<String>, label: impl Into<String>) -> Self {
        let mut descriptor = Self::new(id, label, NodeCategory::Core);
        descriptor.is_core = true;
        descriptor.preinstalled = true;
        descriptor
    }

    /// Set the palette description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the icon identifier
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Mark the type as installed out of the box
    pub fn preinstalled(mut self) -> Self {
        self.preinstalled = true;
        self
    }

    /// Set the default size for new nodes
    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Size::new(width, height);
        self
    }

    /// Set the minimum size
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_size = Size::new(width, height);
        self
    }

    /// Set the dispatch mode
    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Reject edges from a node of this type to itself
    pub fn forbid_self_loops(mut self) -> Self {
        self.forbid_self_loops = true;
        self
    }

    /// Attach the settings schema
    pub fn with_settings(mut self, settings: SettingsSchema) -> Self {
        self.settings = settings;
        self
    }
}

/// Link-time registration of a node type descriptor
///
/// Node type crates submit a const function pointer per type:
///
/// ```ignore
/// inventory::submit!(board_engine::DescriptorFn(shape_descriptor));
/// ```
///
/// `NodeTypeRegistry::from_inventory` collects every submission.
pub struct DescriptorFn(pub fn() -> NodeTypeDescriptor);

inventory::collect!(DescriptorFn);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_descriptor_defaults() {
        let descriptor = NodeTypeDescriptor::core("shape", "Shape");
        assert!(descriptor.is_core);
        assert!(descriptor.preinstalled);
        assert_eq!(descriptor.category, NodeCategory::Core);
        assert_eq!(descriptor.dispatch, DispatchMode::Broadcast);
        assert!(!descriptor.forbid_self_loops);
    }

    #[test]
    fn test_builder_chain() {
        let descriptor = NodeTypeDescriptor::new("router", "Router", NodeCategory::System)
            .with_description("Cycles output across connections")
            .with_icon("shuffle")
            .preinstalled()
            .with_default_size(160.0, 80.0)
            .with_min_size(120.0, 60.0)
            .with_dispatch(DispatchMode::RoundRobin)
            .forbid_self_loops();

        assert_eq!(descriptor.default_size, Size::new(160.0, 80.0));
        assert_eq!(descriptor.min_size, Size::new(120.0, 60.0));
        assert_eq!(descriptor.dispatch, DispatchMode::RoundRobin);
        assert!(descriptor.forbid_self_loops);
        assert!(!descriptor.is_core);
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = NodeTypeDescriptor::new(
            "content-generator",
            "Content Generator",
            NodeCategory::AiGen,
        );

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["category"], "AI_GEN");
        assert_eq!(json["isCore"], false); // camelCase
        assert_eq!(json["dispatch"], "broadcast");
    }
}
