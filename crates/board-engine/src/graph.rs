//! Board graph storage and atomic mutations
//!
//! [`BoardGraph`] is the canonical source of truth for a canvas: nodes,
//! edges, and a derived member-to-group index. Every mutating operation
//! validates fully before touching state, so a failed call leaves the
//! graph exactly as it was.
//!
//! Group membership is a weak relation: members carry a `group_id`
//! back-reference and the graph maintains the reverse index. Whether a
//! node is visible is derived on demand from the collapse state of its
//! ancestor chain, so collapsing and expanding a group never rewrites
//! member state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{BoardError, Result};
use crate::types::{BoardEdge, BoardNode, NodeId, NodePatch};

/// Everything removed by a cascading node deletion
#[derive(Debug, Clone)]
pub struct RemovedNode {
    /// The node itself
    pub node: BoardNode,
    /// Edges removed because they referenced the node
    pub removed_edges: Vec<BoardEdge>,
    /// Members detached because the node was their group
    pub detached_members: Vec<NodeId>,
}

/// A canvas graph: nodes, edges, and the derived group index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GraphDoc")]
pub struct BoardGraph {
    nodes: Vec<BoardNode>,
    edges: Vec<BoardEdge>,
    /// Member node id -> group node id, rebuilt on deserialization
    #[serde(skip)]
    group_index: HashMap<NodeId, NodeId>,
}

/// Raw persisted shape of a graph; conversion rebuilds the group index
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDoc {
    #[serde(default)]
    nodes: Vec<BoardNode>,
    #[serde(default)]
    edges: Vec<BoardEdge>,
}

impl From<GraphDoc> for BoardGraph {
    fn from(doc: GraphDoc) -> Self {
        let mut graph = BoardGraph {
            nodes: doc.nodes,
            edges: doc.edges,
            group_index: HashMap::new(),
        };
        graph.rebuild_group_index();
        graph
    }
}

impl BoardGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from persisted nodes and edges
    ///
    /// Trusts its input the way deserialization does; the group index is
    /// rebuilt from the nodes' back-references.
    pub fn from_parts(nodes: Vec<BoardNode>, edges: Vec<BoardEdge>) -> Self {
        Self::from(GraphDoc { nodes, edges })
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[BoardNode] {
        &self.nodes
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[BoardEdge] {
        &self.edges
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes and no edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Find a node by ID
    pub fn node(&self, id: &str) -> Option<&BoardNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable, crate-internal)
    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut BoardNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Whether a node with this ID exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn edge(&self, id: &str) -> Option<&BoardEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges arriving at a node, in insertion order
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a BoardEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Edges leaving a node, in insertion order
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a BoardEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// The group a node belongs to, if any
    pub fn group_of(&self, node_id: &str) -> Option<&str> {
        self.group_index.get(node_id).map(|s| s.as_str())
    }

    /// Direct members of a group, in node insertion order
    pub fn members_of<'a>(
        &'a self,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a BoardNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.group_id.as_deref() == Some(group_id))
    }

    /// Whether a node is visible on the canvas
    ///
    /// A node is hidden iff any group on its ancestor chain is collapsed.
    /// A collapsed group node itself stays visible (it renders as the
    /// header). Unknown ids are not visible.
    pub fn is_visible(&self, node_id: &str) -> bool {
        let mut current = match self.node(node_id) {
            Some(node) => node,
            None => return false,
        };
        // Hop count bounds the walk in case of a corrupted cyclic chain
        let mut hops = 0;
        while let Some(group_id) = current.group_id.as_deref() {
            let group = match self.node(group_id) {
                Some(group) => group,
                None => break,
            };
            if group.group.as_ref().map_or(false, |g| g.is_collapsed) {
                return false;
            }
            current = group;
            hops += 1;
            if hops > self.nodes.len() {
                break;
            }
        }
        true
    }

    /// Insert a node
    ///
    /// Rejects duplicate ids. If the node carries a `group_id`, the
    /// referenced group must already exist.
    pub fn insert_node(&mut self, node: BoardNode) -> Result<()> {
        if self.contains_node(&node.id) {
            return Err(BoardError::DuplicateId(node.id));
        }
        if let Some(group_id) = node.group_id.as_deref() {
            match self.node(group_id) {
                Some(group) if group.is_group() => {}
                Some(_) => return Err(BoardError::NotAGroup(group_id.to_string())),
                None => return Err(BoardError::GroupNotFound(group_id.to_string())),
            }
        }

        if let Some(group_id) = node.group_id.clone() {
            self.group_index.insert(node.id.clone(), group_id);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Apply a partial update to a node
    ///
    /// Geometry fields (position, size, rotation) are rejected on locked
    /// nodes; `data` and `node_settings` merge shallowly and are always
    /// allowed. New sizes clamp to the node's minimum.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<()> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| BoardError::node_not_found(id))?;
        if self.nodes[index].is_locked && patch.touches_geometry() {
            return Err(BoardError::NodeLocked(id.to_string()));
        }

        let node = &mut self.nodes[index];
        if let Some(position) = patch.position {
            node.position = position;
        }
        if let Some(size) = patch.size {
            node.size = size.clamped_to(node.min_size);
        }
        if let Some(rotation) = patch.rotation {
            node.rotation = rotation;
        }
        if let Some(data) = patch.data {
            for (key, value) in data {
                node.data.insert(key, value);
            }
        }
        if let Some(settings) = patch.node_settings {
            for (key, value) in settings {
                node.node_settings.insert(key, value);
            }
        }
        if let Some(is_locked) = patch.is_locked {
            node.is_locked = is_locked;
        }
        if let Some(is_ratio_locked) = patch.is_ratio_locked {
            node.is_ratio_locked = is_ratio_locked;
        }
        Ok(())
    }

    /// Delete a node, cascading to every edge that references it
    ///
    /// When the node is a group its members are detached; use
    /// [`delete_group`](crate::groups) for the recursive variant.
    pub fn delete_node(&mut self, id: &str) -> Result<RemovedNode> {
        let position = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| BoardError::node_not_found(id))?;

        let node = self.nodes.remove(position);
        self.group_index.remove(&node.id);

        let mut removed_edges = Vec::new();
        self.edges.retain(|e| {
            if e.source == id || e.target == id {
                removed_edges.push(e.clone());
                false
            } else {
                true
            }
        });

        let mut detached_members = Vec::new();
        if node.is_group() {
            for member in self.nodes.iter_mut() {
                if member.group_id.as_deref() == Some(id) {
                    member.group_id = None;
                    detached_members.push(member.id.clone());
                }
            }
            for member_id in &detached_members {
                self.group_index.remove(member_id);
            }
        }

        log::debug!(
            "Deleted node '{}' ({} edge(s) cascaded, {} member(s) detached)",
            id,
            removed_edges.len(),
            detached_members.len()
        );
        Ok(RemovedNode {
            node,
            removed_edges,
            detached_members,
        })
    }

    /// Insert an edge
    ///
    /// Both endpoints must exist; a missing endpoint fails with
    /// `DanglingReference` and leaves the edge list untouched.
    pub fn insert_edge(&mut self, edge: BoardEdge) -> Result<()> {
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(BoardError::DuplicateId(edge.id));
        }
        if !self.contains_node(&edge.source) {
            return Err(BoardError::DanglingReference(edge.source));
        }
        if !self.contains_node(&edge.target) {
            return Err(BoardError::DanglingReference(edge.target));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Delete an edge by ID
    pub fn delete_edge(&mut self, id: &str) -> Result<BoardEdge> {
        let position = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| BoardError::EdgeNotFound(id.to_string()))?;
        Ok(self.edges.remove(position))
    }

    /// Remove every node and edge
    ///
    /// Refused unless `confirmation` is the exact clear-canvas token;
    /// the graph is untouched on mismatch.
    pub fn clear(&mut self, confirmation: &str) -> Result<()> {
        if confirmation != constants::confirmations::CLEAR_CANVAS {
            return Err(BoardError::ConfirmationMismatch {
                expected: constants::confirmations::CLEAR_CANVAS.to_string(),
                got: confirmation.to_string(),
            });
        }
        let nodes = self.nodes.len();
        let edges = self.edges.len();
        self.nodes.clear();
        self.edges.clear();
        self.group_index.clear();
        log::debug!("Cleared canvas ({} node(s), {} edge(s))", nodes, edges);
        Ok(())
    }

    /// Point a node's membership at a group (or detach with `None`),
    /// keeping the back-reference and the index in step
    pub(crate) fn set_group_membership(&mut self, node_id: &str, group_id: Option<NodeId>) {
        if let Some(node) = self.node_mut(node_id) {
            node.group_id = group_id.clone();
            match group_id {
                Some(group_id) => {
                    self.group_index.insert(node_id.to_string(), group_id);
                }
                None => {
                    self.group_index.remove(node_id);
                }
            }
        }
    }

    fn rebuild_group_index(&mut self) {
        self.group_index.clear();
        for node in &self.nodes {
            if let Some(group_id) = node.group_id.clone() {
                self.group_index.insert(node.id.clone(), group_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupState, Point, Size};

    fn make_node(id: &str, x: f64, y: f64) -> BoardNode {
        BoardNode::new(id, "shape", Point::new(x, y), Size::new(200.0, 100.0))
    }

    fn make_edge(id: &str, source: &str, target: &str) -> BoardEdge {
        BoardEdge::new(id, source, "out", target, "in")
    }

    fn make_group(id: &str) -> BoardNode {
        BoardNode::new(id, "group", Point::new(0.0, 0.0), Size::new(400.0, 300.0))
            .with_group_state(GroupState::new("Group"))
    }

    #[test]
    fn test_insert_and_find() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();

        assert!(graph.contains_node("a"));
        assert_eq!(graph.node("a").unwrap().position, Point::new(0.0, 0.0));
        assert!(graph.node("missing").is_none());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();

        let err = graph.insert_node(make_node("a", 10.0, 10.0)).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateId(_)));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_update_node_merges_data() {
        let mut graph = BoardGraph::new();
        graph
            .insert_node(
                make_node("a", 0.0, 0.0).with_data_entry("label", serde_json::json!("old")),
            )
            .unwrap();

        let mut data = serde_json::Map::new();
        data.insert("color".to_string(), serde_json::json!("#123456"));
        graph
            .update_node(
                "a",
                NodePatch {
                    data: Some(data),
                    ..Default::default()
                },
            )
            .unwrap();

        let node = graph.node("a").unwrap();
        assert_eq!(node.data["label"], "old");
        assert_eq!(node.data["color"], "#123456");
    }

    #[test]
    fn test_update_locked_node_rejects_geometry() {
        let mut graph = BoardGraph::new();
        let mut node = make_node("a", 0.0, 0.0);
        node.is_locked = true;
        graph.insert_node(node).unwrap();

        let err = graph
            .update_node("a", NodePatch::position(Point::new(50.0, 50.0)))
            .unwrap_err();
        assert!(matches!(err, BoardError::NodeLocked(_)));
        assert_eq!(graph.node("a").unwrap().position, Point::new(0.0, 0.0));

        // Content updates are still allowed on locked nodes
        graph
            .update_node("a", NodePatch::data_entry("label", serde_json::json!("hi")))
            .unwrap();
        assert_eq!(graph.node("a").unwrap().data["label"], "hi");
    }

    #[test]
    fn test_update_clamps_to_min_size() {
        let mut graph = BoardGraph::new();
        graph
            .insert_node(make_node("a", 0.0, 0.0).with_min_size(Size::new(100.0, 80.0)))
            .unwrap();

        graph
            .update_node("a", NodePatch::size(Size::new(10.0, 10.0)))
            .unwrap();
        assert_eq!(graph.node("a").unwrap().size, Size::new(100.0, 80.0));
    }

    #[test]
    fn test_delete_node_cascades_edges() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();
        graph.insert_node(make_node("b", 100.0, 0.0)).unwrap();
        graph.insert_node(make_node("c", 200.0, 0.0)).unwrap();
        graph.insert_edge(make_edge("e1", "a", "b")).unwrap();
        graph.insert_edge(make_edge("e2", "b", "c")).unwrap();
        graph.insert_edge(make_edge("e3", "a", "c")).unwrap();

        let removed = graph.delete_node("b").unwrap();

        let removed_ids: Vec<&str> = removed.removed_edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(removed_ids, vec!["e1", "e2"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].id, "e3");
    }

    #[test]
    fn test_insert_edge_dangling_rejected() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();
        graph.insert_edge(make_edge("e1", "a", "a")).unwrap();

        let err = graph.insert_edge(make_edge("e2", "a", "ghost")).unwrap_err();
        assert!(matches!(err, BoardError::DanglingReference(ref id) if id == "ghost"));
        // Failed insert leaves the edge list exactly as it was
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].id, "e1");
    }

    #[test]
    fn test_delete_edge() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();
        graph.insert_node(make_node("b", 100.0, 0.0)).unwrap();
        graph.insert_edge(make_edge("e1", "a", "b")).unwrap();

        let edge = graph.delete_edge("e1").unwrap();
        assert_eq!(edge.id, "e1");
        assert_eq!(graph.edge_count(), 0);
        assert!(matches!(
            graph.delete_edge("e1").unwrap_err(),
            BoardError::EdgeNotFound(_)
        ));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_node("a", 0.0, 0.0)).unwrap();

        let err = graph.clear("delete").unwrap_err();
        assert!(matches!(err, BoardError::ConfirmationMismatch { .. }));
        assert_eq!(graph.node_count(), 1);

        graph.clear("DELETE").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_group_index_rebuilt_after_deserialize() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_group("g1")).unwrap();
        let mut member = make_node("a", 10.0, 10.0);
        member.group_id = Some("g1".to_string());
        graph.insert_node(member).unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let restored: BoardGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.group_of("a"), Some("g1"));
        assert_eq!(restored.members_of("g1").count(), 1);
    }

    #[test]
    fn test_visibility_follows_ancestor_collapse() {
        let mut graph = BoardGraph::new();
        graph.insert_node(make_group("outer")).unwrap();
        let mut inner = make_group("inner");
        inner.group_id = Some("outer".to_string());
        graph.insert_node(inner).unwrap();
        let mut leaf = make_node("leaf", 5.0, 5.0);
        leaf.group_id = Some("inner".to_string());
        graph.insert_node(leaf).unwrap();

        assert!(graph.is_visible("leaf"));

        // Collapsing the outer group hides everything below it
        if let Some(state) = graph.node_mut("outer").and_then(|n| n.group.as_mut()) {
            state.is_collapsed = true;
        }
        assert!(graph.is_visible("outer"));
        assert!(!graph.is_visible("inner"));
        assert!(!graph.is_visible("leaf"));
    }

    #[test]
    fn test_member_insert_requires_existing_group() {
        let mut graph = BoardGraph::new();
        let mut member = make_node("a", 0.0, 0.0);
        member.group_id = Some("ghost".to_string());

        let err = graph.insert_node(member).unwrap_err();
        assert!(matches!(err, BoardError::GroupNotFound(_)));
        assert_eq!(graph.node_count(), 0);
    }
}
