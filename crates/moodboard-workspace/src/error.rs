//! Error types for workspace services

use thiserror::Error;

/// Result type alias using WorkspaceError
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors that can occur in workspace services
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// An engine operation failed
    #[error(transparent)]
    Board(#[from] board_engine::BoardError),

    /// The workflow store failed
    #[error("Store error: {0}")]
    Store(String),

    /// Workflow lookup failed
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Template lookup failed
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A reset prompt is already waiting for a decision
    #[error("A reset is already pending confirmation")]
    ResetPending,

    /// resolve/cancel called with no reset prompt outstanding
    #[error("No reset is pending")]
    NoPendingReset,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkspaceError {
    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a workflow-not-found error
    pub fn workflow_not_found(id: impl Into<String>) -> Self {
        Self::WorkflowNotFound(id.into())
    }

    /// Create a template-not-found error
    pub fn template_not_found(id: impl Into<String>) -> Self {
        Self::TemplateNotFound(id.into())
    }
}
