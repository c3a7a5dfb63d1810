//! Edge dispatch bookkeeping
//!
//! Broadcast types hand their output to every outgoing edge, which
//! needs no state. Round-robin types consume outgoing edges one at a
//! time in the order the connections were made, cycling; the cursor
//! here tracks the per-node position. Cursor state is transient and is
//! never persisted with the board.

use std::collections::HashMap;

use crate::graph::BoardGraph;
use crate::types::{BoardEdge, NodeId};

/// Per-node cursor over outgoing edges for round-robin dispatch
#[derive(Debug, Default)]
pub struct RoundRobinCursor {
    positions: HashMap<NodeId, usize>,
}

impl RoundRobinCursor {
    /// Create a cursor with no positions
    pub fn new() -> Self {
        Self::default()
    }

    /// The next outgoing edge for a source node, cycling in insertion
    /// order; None when the node has no outgoing edges
    ///
    /// Edges added or removed between calls are picked up on the next
    /// call; the position wraps into the current edge count.
    pub fn next_edge<'a>(
        &mut self,
        graph: &'a BoardGraph,
        source_id: &'a str,
    ) -> Option<&'a BoardEdge> {
        let edges: Vec<&BoardEdge> = graph.outgoing_edges(source_id).collect();
        if edges.is_empty() {
            return None;
        }
        let slot = self.positions.entry(source_id.to_string()).or_insert(0);
        let index = *slot % edges.len();
        *slot = (index + 1) % edges.len();
        Some(edges[index])
    }

    /// Restart the cycle for one node
    pub fn reset(&mut self, source_id: &str) {
        self.positions.remove(source_id);
    }

    /// Drop every position
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}
