//! Fluent builder for constructing board graphs programmatically
//!
//! Used by template seeds and tests. `build` funnels everything through
//! the graph's own insert operations, so a builder cannot produce a
//! graph that violates the storage invariants.

use crate::constants;
use crate::error::{BoardError, Result};
use crate::graph::BoardGraph;
use crate::types::{BoardEdge, BoardNode, GroupState, NodeId, Point, Size};

/// Fluent builder for board graphs
///
/// # Example
///
/// ```ignore
/// let graph = GraphBuilder::new()
///     .add_node("hero", "image", 0.0, 0.0)
///     .with_size(480.0, 320.0)
///     .add_node("caption", "text", 0.0, 360.0)
///     .with_data("label", serde_json::json!("Launch hero"))
///     .add_edge("hero", "out", "caption", "in")
///     .build()?;
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<BoardNode>,
    edges: Vec<BoardEdge>,
    memberships: Vec<(NodeId, NodeId)>,
    edge_counter: usize,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the default size
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Self {
        self.nodes.push(BoardNode::new(
            id,
            node_type,
            Point::new(x, y),
            Size::new(
                constants::nodes::DEFAULT_WIDTH,
                constants::nodes::DEFAULT_HEIGHT,
            ),
        ));
        self
    }

    /// Add a group node
    pub fn add_group(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        self.nodes.push(
            BoardNode::new(id, "group", Point::new(x, y), Size::new(width, height))
                .with_group_state(GroupState::new(label)),
        );
        self
    }

    /// Set the size of the most recently added node
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.size = Size::new(width, height);
        }
        self
    }

    /// Merge a data entry into the most recently added node
    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.insert(key.into(), value);
        }
        self
    }

    /// Merge a settings entry into the most recently added node
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.node_settings.insert(key.into(), value);
        }
        self
    }

    /// Lock the most recently added node
    pub fn locked(mut self) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.is_locked = true;
        }
        self
    }

    /// Put the most recently added node into a group
    ///
    /// The group may be declared before or after its members; membership
    /// is wired after all nodes are inserted.
    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last() {
            self.memberships.push((node.id.clone(), group_id.into()));
        }
        self
    }

    /// Add an edge (auto-generates the edge id)
    pub fn add_edge(
        mut self,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.edge_counter += 1;
        self.edges.push(BoardEdge::new(
            format!("edge-{}", self.edge_counter),
            source,
            source_handle,
            target,
            target_handle,
        ));
        self
    }

    /// Add an edge with an explicit id
    pub fn add_edge_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.edges.push(BoardEdge::new(
            edge_id,
            source,
            source_handle,
            target,
            target_handle,
        ));
        self
    }

    /// Build the graph, validating ids, endpoints, and memberships
    pub fn build(self) -> Result<BoardGraph> {
        let mut graph = BoardGraph::new();
        for node in self.nodes {
            graph.insert_node(node)?;
        }
        for edge in self.edges {
            graph.insert_edge(edge)?;
        }
        for (node_id, group_id) in self.memberships {
            match graph.node(&group_id) {
                Some(node) if node.is_group() => {}
                Some(_) => return Err(BoardError::NotAGroup(group_id)),
                None => return Err(BoardError::GroupNotFound(group_id)),
            }
            graph.set_group_membership(&node_id, Some(group_id));
        }
        Ok(graph)
    }
}
