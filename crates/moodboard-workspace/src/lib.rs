//! MoodBoard workspace services
//!
//! The asynchronous shell around the board engine. Where `board-engine`
//! mutates a graph synchronously on the caller's thread, this crate owns
//! everything that waits:
//!
//! - Workflow persistence: versioned save/load with a revision-based
//!   unsaved-changes flag and the save-or-discard gate before a reset
//! - A pluggable [`WorkflowStore`] with in-memory and one-file-per-JSON
//!   on-disk backends
//! - Seed templates whose injection is additive with regenerated ids
//! - Module activation with a simulated remote registration delay
//! - Image asset loading and the generation backend seam, both applying
//!   results through a deletion-tolerant update path
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use moodboard_workspace::{EditorSession, MemoryWorkflowStore};
//!
//! let registry = board_nodes::builtin_registry().into_shared();
//! let store = Arc::new(MemoryWorkflowStore::new());
//! let mut session = EditorSession::new(registry, store);
//! let id = session.save_current(Some("First board"), None).await?;
//! ```

pub mod assets;
pub mod error;
pub mod generation;
pub mod modules;
pub mod session;
pub mod store;
pub mod templates;
pub mod workflow;

// Re-export key types
pub use assets::{apply_image_asset, load_image_asset, ImageAsset};
pub use error::{Result, WorkspaceError};
pub use generation::{
    apply_generator_output, prepare_generation, run_generator, GenerationBackend,
    GenerationRequest,
};
pub use modules::{ModuleService, REGISTRATION_DELAY};
pub use session::{EditorSession, ResetChoice, ResetOutcome};
pub use store::{FileWorkflowStore, MemoryWorkflowStore, WorkflowStore};
pub use templates::{InjectedTemplate, Template, TemplateLibrary};
pub use workflow::{WorkflowFile, WorkflowMetadata};
