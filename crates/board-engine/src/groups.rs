//! Group operations on a board graph
//!
//! Groups are ordinary nodes of the group type with [`GroupState`]
//! attached. Members point back at the group through `group_id`; the
//! graph's reverse index answers membership queries. Because member
//! visibility is derived from the ancestor collapse chain, collapsing
//! never rewrites member state, which is what makes the
//! collapse/expand round-trip lossless.

use std::collections::HashSet;

use crate::constants;
use crate::error::{BoardError, Result};
use crate::graph::BoardGraph;
use crate::types::{BoardNode, EdgeId, GroupState, NodeId, Point, Size};

/// How a group deletion treats the group's members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupDeletion {
    /// Remove only the group node; members are detached in place
    #[default]
    Detach,
    /// Remove the group node and every transitive member with it
    Recursive,
}

/// Everything removed or detached by a group deletion
#[derive(Debug, Clone)]
pub struct GroupRemoval {
    /// The group node itself
    pub group: BoardNode,
    /// Members detached in place (Detach mode)
    pub detached_member_ids: Vec<NodeId>,
    /// Members removed with the group (Recursive mode)
    pub removed_member_ids: Vec<NodeId>,
    /// Edges cascaded by the removals
    pub removed_edge_ids: Vec<EdgeId>,
}

impl BoardGraph {
    /// Create a group around the given nodes
    ///
    /// Every id is validated before anything mutates. The group node is
    /// sized to the members' bounding box plus a fixed padding, and each
    /// member's `group_id` is pointed at it. Members already in another
    /// group are re-parented.
    pub fn group_nodes(
        &mut self,
        node_ids: &[NodeId],
        label: impl Into<String>,
    ) -> Result<NodeId> {
        if node_ids.is_empty() {
            return Err(BoardError::EmptySelection);
        }
        let member_set: HashSet<&str> = node_ids.iter().map(|s| s.as_str()).collect();
        for id in &member_set {
            if !self.contains_node(id) {
                return Err(BoardError::node_not_found(*id));
            }
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for node in self.nodes() {
            if member_set.contains(node.id.as_str()) {
                min_x = min_x.min(node.position.x);
                min_y = min_y.min(node.position.y);
                max_x = max_x.max(node.position.x + node.size.width);
                max_y = max_y.max(node.position.y + node.size.height);
            }
        }

        let padding = constants::groups::PADDING;
        let group_id = format!("group-{}", uuid::Uuid::new_v4());
        let group = BoardNode::new(
            group_id.clone(),
            "group",
            Point::new(min_x - padding, min_y - padding),
            Size::new(
                (max_x - min_x) + padding * 2.0,
                (max_y - min_y) + padding * 2.0,
            ),
        )
        .with_group_state(GroupState::new(label));
        self.insert_node(group)?;

        for member_id in &member_set {
            self.set_group_membership(member_id, Some(group_id.clone()));
        }

        log::debug!("Grouped {} node(s) into '{}'", member_set.len(), group_id);
        Ok(group_id)
    }

    /// Collapse or expand a group; returns the new collapsed state
    ///
    /// Collapsing stashes the expanded size and swaps the height to the
    /// fixed header height. Expanding restores the stashed size exactly.
    /// Members are untouched either way.
    pub fn toggle_collapse(&mut self, group_id: &str) -> Result<bool> {
        let node = self
            .node_mut(group_id)
            .ok_or_else(|| BoardError::GroupNotFound(group_id.to_string()))?;
        let current_size = node.size;
        let state = match node.group.as_mut() {
            Some(state) => state,
            None => return Err(BoardError::NotAGroup(group_id.to_string())),
        };

        if state.is_collapsed {
            state.is_collapsed = false;
            if let Some(expanded) = state.expanded_size.take() {
                node.size = expanded;
            }
            Ok(false)
        } else {
            state.is_collapsed = true;
            state.expanded_size = Some(current_size);
            node.size.height = constants::groups::COLLAPSED_HEIGHT;
            Ok(true)
        }
    }

    /// Delete a group
    ///
    /// `Detach` (the default) removes only the group node and leaves the
    /// members in place with their membership cleared; this holds for
    /// collapsed groups too, whose members simply become visible again.
    /// `Recursive` removes every transitive member along with the group.
    pub fn delete_group(&mut self, group_id: &str, mode: GroupDeletion) -> Result<GroupRemoval> {
        match self.node(group_id) {
            Some(node) if node.is_group() => {}
            Some(_) => return Err(BoardError::NotAGroup(group_id.to_string())),
            None => return Err(BoardError::GroupNotFound(group_id.to_string())),
        }

        match mode {
            GroupDeletion::Detach => {
                let removed = self.delete_node(group_id)?;
                Ok(GroupRemoval {
                    group: removed.node,
                    detached_member_ids: removed.detached_members,
                    removed_member_ids: Vec::new(),
                    removed_edge_ids: removed.removed_edges.into_iter().map(|e| e.id).collect(),
                })
            }
            GroupDeletion::Recursive => {
                let members = self.transitive_members(group_id);
                let mut removed_edge_ids = Vec::new();
                let mut removed_member_ids = Vec::new();
                for member_id in members {
                    // Deleting a nested group first detaches its members,
                    // which is fine: they are on this list themselves.
                    if let Ok(removed) = self.delete_node(&member_id) {
                        removed_edge_ids.extend(removed.removed_edges.into_iter().map(|e| e.id));
                        removed_member_ids.push(removed.node.id);
                    }
                }
                let removed = self.delete_node(group_id)?;
                removed_edge_ids.extend(removed.removed_edges.into_iter().map(|e| e.id));
                log::debug!(
                    "Recursively deleted group '{}' with {} member(s)",
                    group_id,
                    removed_member_ids.len()
                );
                Ok(GroupRemoval {
                    group: removed.node,
                    detached_member_ids: Vec::new(),
                    removed_member_ids,
                    removed_edge_ids,
                })
            }
        }
    }

    /// Rename a group
    pub fn set_group_label(&mut self, group_id: &str, label: impl Into<String>) -> Result<()> {
        let state = self.group_state_mut(group_id)?;
        state.label = label.into();
        Ok(())
    }

    /// Recolor a group
    pub fn set_group_color(&mut self, group_id: &str, color: impl Into<String>) -> Result<()> {
        let state = self.group_state_mut(group_id)?;
        state.color = color.into();
        Ok(())
    }

    /// Every node whose membership chain leads to this group
    pub fn transitive_members(&self, group_id: &str) -> Vec<NodeId> {
        let mut queue = vec![group_id.to_string()];
        let mut collected = Vec::new();
        while let Some(current) = queue.pop() {
            for member in self.members_of(&current) {
                collected.push(member.id.clone());
                if member.is_group() {
                    queue.push(member.id.clone());
                }
            }
        }
        collected
    }

    fn group_state_mut(&mut self, group_id: &str) -> Result<&mut GroupState> {
        let node = self
            .node_mut(group_id)
            .ok_or_else(|| BoardError::GroupNotFound(group_id.to_string()))?;
        match node.group.as_mut() {
            Some(state) => Ok(state),
            None => Err(BoardError::NotAGroup(group_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoardEdge;

    fn make_node(id: &str, x: f64, y: f64) -> BoardNode {
        BoardNode::new(id, "shape", Point::new(x, y), Size::new(200.0, 100.0))
    }

    fn graph_with(nodes: &[(&str, f64, f64)]) -> BoardGraph {
        let mut graph = BoardGraph::new();
        for (id, x, y) in nodes {
            graph.insert_node(make_node(id, *x, *y)).unwrap();
        }
        graph
    }

    #[test]
    fn test_group_nodes_creates_bounding_box() {
        let mut graph = graph_with(&[("a", 0.0, 0.0), ("b", 300.0, 200.0)]);

        let group_id = graph
            .group_nodes(&["a".to_string(), "b".to_string()], "Scene")
            .unwrap();

        let group = graph.node(&group_id).unwrap();
        assert_eq!(group.position, Point::new(-24.0, -24.0));
        assert_eq!(group.size, Size::new(548.0, 348.0));
        assert_eq!(group.group.as_ref().unwrap().label, "Scene");
        assert_eq!(graph.group_of("a"), Some(group_id.as_str()));
        assert_eq!(graph.group_of("b"), Some(group_id.as_str()));
    }

    #[test]
    fn test_group_nodes_validates_before_mutating() {
        let mut graph = graph_with(&[("a", 0.0, 0.0)]);

        let err = graph
            .group_nodes(&["a".to_string(), "ghost".to_string()], "Broken")
            .unwrap_err();
        assert!(matches!(err, BoardError::NodeNotFound(_)));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.node("a").unwrap().group_id.is_none());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let mut graph = BoardGraph::new();
        assert!(matches!(
            graph.group_nodes(&[], "Empty").unwrap_err(),
            BoardError::EmptySelection
        ));
    }

    #[test]
    fn test_collapse_round_trip_is_lossless() {
        let mut graph = graph_with(&[("a", 10.0, 20.0), ("b", 400.0, 300.0)]);
        let group_id = graph
            .group_nodes(&["a".to_string(), "b".to_string()], "Scene")
            .unwrap();

        let before: Vec<BoardNode> = graph.nodes().to_vec();

        assert!(graph.toggle_collapse(&group_id).unwrap());
        assert!(!graph.toggle_collapse(&group_id).unwrap());

        assert_eq!(graph.nodes(), before.as_slice());
    }

    #[test]
    fn test_collapse_swaps_height_and_stashes_size() {
        let mut graph = graph_with(&[("a", 0.0, 0.0)]);
        let group_id = graph.group_nodes(&["a".to_string()], "Solo").unwrap();
        let expanded = graph.node(&group_id).unwrap().size;

        graph.toggle_collapse(&group_id).unwrap();

        let group = graph.node(&group_id).unwrap();
        assert!(group.group.as_ref().unwrap().is_collapsed);
        assert_eq!(group.size.height, constants::groups::COLLAPSED_HEIGHT);
        assert_eq!(group.size.width, expanded.width);
        assert_eq!(group.group.as_ref().unwrap().expanded_size, Some(expanded));

        // Members are untouched while collapsed, only hidden
        assert!(!graph.is_visible("a"));
        assert_eq!(graph.node("a").unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_delete_group_detaches_members() {
        let mut graph = graph_with(&[("a", 0.0, 0.0), ("b", 300.0, 0.0), ("c", 600.0, 0.0)]);
        let group_id = graph
            .group_nodes(&["a".to_string(), "b".to_string()], "Pair")
            .unwrap();
        graph
            .insert_edge(BoardEdge::new("e1", "a", "out", "c", "in"))
            .unwrap();
        graph
            .insert_edge(BoardEdge::new("e2", group_id.clone(), "out", "c", "in"))
            .unwrap();

        let removal = graph.delete_group(&group_id, GroupDeletion::Detach).unwrap();

        assert_eq!(removal.removed_member_ids.len(), 0);
        assert_eq!(removal.detached_member_ids.len(), 2);
        assert_eq!(removal.removed_edge_ids, vec!["e2".to_string()]);
        assert!(graph.contains_node("a"));
        assert!(graph.node("a").unwrap().group_id.is_none());
        assert!(graph.group_of("a").is_none());
        // The member's own edge survives
        assert!(graph.edge("e1").is_some());
    }

    #[test]
    fn test_delete_collapsed_group_detaches_members() {
        let mut graph = graph_with(&[("a", 0.0, 0.0)]);
        let group_id = graph.group_nodes(&["a".to_string()], "Solo").unwrap();
        graph.toggle_collapse(&group_id).unwrap();
        assert!(!graph.is_visible("a"));

        graph.delete_group(&group_id, GroupDeletion::Detach).unwrap();

        assert!(graph.contains_node("a"));
        assert!(graph.is_visible("a"));
    }

    #[test]
    fn test_delete_group_recursive() {
        let mut graph = graph_with(&[("a", 0.0, 0.0), ("b", 300.0, 0.0), ("out", 900.0, 0.0)]);
        let inner = graph.group_nodes(&["a".to_string()], "Inner").unwrap();
        let outer = graph
            .group_nodes(&[inner.clone(), "b".to_string()], "Outer")
            .unwrap();
        graph
            .insert_edge(BoardEdge::new("e1", "b", "out", "out", "in"))
            .unwrap();

        let removal = graph.delete_group(&outer, GroupDeletion::Recursive).unwrap();

        assert_eq!(removal.removed_member_ids.len(), 3);
        assert!(removal.removed_edge_ids.contains(&"e1".to_string()));
        assert!(!graph.contains_node("a"));
        assert!(!graph.contains_node("b"));
        assert!(!graph.contains_node(&inner));
        assert!(graph.contains_node("out"));
    }

    #[test]
    fn test_group_ops_require_group_node() {
        let mut graph = graph_with(&[("a", 0.0, 0.0)]);

        assert!(matches!(
            graph.toggle_collapse("a").unwrap_err(),
            BoardError::NotAGroup(_)
        ));
        assert!(matches!(
            graph.toggle_collapse("ghost").unwrap_err(),
            BoardError::GroupNotFound(_)
        ));
        assert!(matches!(
            graph.delete_group("a", GroupDeletion::Detach).unwrap_err(),
            BoardError::NotAGroup(_)
        ));
    }

    #[test]
    fn test_set_group_label_and_color() {
        let mut graph = graph_with(&[("a", 0.0, 0.0)]);
        let group_id = graph.group_nodes(&["a".to_string()], "Old").unwrap();

        graph.set_group_label(&group_id, "New").unwrap();
        graph.set_group_color(&group_id, "#00ff00").unwrap();

        let state = graph.node(&group_id).unwrap().group.as_ref().unwrap();
        assert_eq!(state.label, "New");
        assert_eq!(state.color, "#00ff00");
    }
}
