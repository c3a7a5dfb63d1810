//! Editor events for canvas mutations
//!
//! The editor reports every committed mutation to its subscribed sinks
//! so hosts can mirror state, persist, or broadcast. The sink trait
//! abstracts over the transport (IPC channel, mpsc, websocket bridge).

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId};

/// Trait for receiving board events
///
/// Sink callbacks run on the editor's thread inside the containment
/// boundary: a panicking sink is reported and skipped, never allowed to
/// take the editor down.
pub trait EventSink: Send + Sync {
    /// Deliver an event
    ///
    /// Returns an error if the event could not be delivered (e.g.
    /// channel closed)
    fn send(&self, event: BoardEvent) -> Result<(), EventError>;
}

/// Error when delivering events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted after committed canvas mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// A node was created
    #[serde(rename_all = "camelCase")]
    NodeAdded { node_id: NodeId, node_type: String },

    /// A node's content, settings, or geometry changed
    #[serde(rename_all = "camelCase")]
    NodeUpdated { node_id: NodeId },

    /// A node was deleted, along with every edge that referenced it
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        node_id: NodeId,
        removed_edge_ids: Vec<EdgeId>,
    },

    /// Nodes were moved together (end of a drag)
    #[serde(rename_all = "camelCase")]
    NodesMoved { node_ids: Vec<NodeId> },

    /// An edge was created
    #[serde(rename_all = "camelCase")]
    EdgeAdded {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },

    /// An edge was deleted
    #[serde(rename_all = "camelCase")]
    EdgeRemoved { edge_id: EdgeId },

    /// A group was created around existing nodes
    #[serde(rename_all = "camelCase")]
    GroupCreated {
        group_id: NodeId,
        member_ids: Vec<NodeId>,
    },

    /// A group was collapsed or expanded
    #[serde(rename_all = "camelCase")]
    GroupToggled {
        group_id: NodeId,
        is_collapsed: bool,
    },

    /// A group was deleted
    #[serde(rename_all = "camelCase")]
    GroupRemoved {
        group_id: NodeId,
        detached_member_ids: Vec<NodeId>,
        removed_member_ids: Vec<NodeId>,
    },

    /// The whole canvas was cleared
    #[serde(rename_all = "camelCase")]
    CanvasCleared { node_count: usize, edge_count: usize },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: BoardEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: parking_lot::Mutex<Vec<BoardEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: BoardEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}
