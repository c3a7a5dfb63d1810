//! Versioned workflow file format
//!
//! A [`WorkflowFile`] is a point-in-time snapshot of a board: the graph
//! flattened into node and edge lists, the canvas settings, and identity
//! metadata. The format is what stores persist and what templates ship
//! as, so its serde shape is the compatibility contract.

use board_engine::{BoardEdge, BoardGraph, BoardNode, CanvasSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted board snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowFile {
    /// File format version, written as [`WorkflowFile::CURRENT_VERSION`]
    pub version: String,
    /// Stable workflow identity, preserved across re-saves
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Optional longer description
    #[serde(default)]
    pub description: String,
    /// When the workflow was first saved
    pub created_at: DateTime<Utc>,
    /// When this snapshot was taken
    pub updated_at: DateTime<Utc>,
    /// Nodes, in canvas insertion order
    #[serde(default)]
    pub nodes: Vec<BoardNode>,
    /// Edges, in canvas insertion order
    #[serde(default)]
    pub edges: Vec<BoardEdge>,
    /// Canvas configuration at save time
    #[serde(default)]
    pub canvas_settings: CanvasSettings,
}

/// Listing metadata for a stored workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub node_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowFile {
    /// Version written into every new snapshot
    pub const CURRENT_VERSION: &'static str = "1.0";

    /// Snapshot a live graph into a brand-new workflow
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        graph: &BoardGraph,
        canvas: &CanvasSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            id: format!("workflow-{}", Uuid::new_v4()),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
            canvas_settings: canvas.clone(),
        }
    }

    /// Snapshot a live graph as the successor of an earlier save
    ///
    /// Keeps the identity, name, description and creation time of this
    /// file; the graph content and `updatedAt` are taken fresh.
    pub fn successor(&self, graph: &BoardGraph, canvas: &CanvasSettings) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
            canvas_settings: canvas.clone(),
        }
    }

    /// Rebuild the live graph this snapshot captured
    pub fn to_graph(&self) -> BoardGraph {
        BoardGraph::from_parts(self.nodes.clone(), self.edges.clone())
    }

    /// Listing metadata for this snapshot
    pub fn metadata(&self) -> WorkflowMetadata {
        WorkflowMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            node_count: self.nodes.len(),
            updated_at: self.updated_at,
        }
    }
}
