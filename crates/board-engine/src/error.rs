//! Error types for the board engine

use thiserror::Error;

/// Result type alias using BoardError
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in the board engine
#[derive(Debug, Error)]
pub enum BoardError {
    /// Node type is not in the registry, or is not installed
    #[error("Unknown node type: {0}")]
    UnknownType(String),

    /// Node lookup failed
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Edge lookup failed
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// Group lookup failed
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Node exists but is not a group
    #[error("Node '{0}' is not a group")]
    NotAGroup(String),

    /// Edge endpoint references a node that does not exist
    #[error("Dangling reference: edge endpoint '{0}' does not exist")]
    DanglingReference(String),

    /// A node or edge with this id already exists
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Node type forbids edges from a node to itself
    #[error("Self-loops are not allowed for node type '{0}'")]
    SelfLoopForbidden(String),

    /// Geometry mutation attempted on a locked node
    #[error("Node '{0}' is locked")]
    NodeLocked(String),

    /// Operation requires a non-empty selection
    #[error("Selection is empty")]
    EmptySelection,

    /// Destructive operation refused: confirmation token did not match
    #[error("Confirmation mismatch: expected '{expected}', got '{got}'")]
    ConfirmationMismatch { expected: String, got: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Create an unknown-type error
    pub fn unknown_type(node_type: impl Into<String>) -> Self {
        Self::UnknownType(node_type.into())
    }

    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }
}
