//! Board Engine - canvas graph core for MoodBoard
//!
//! This crate is the synchronous heart of a visual workflow canvas. It
//! owns:
//!
//! - The board graph: typed nodes, directed edges, weak group membership
//! - Group collapse/expand with lossless member geometry
//! - A node type registry with install/uninstall and core protection
//! - Declarative settings schemas with default resolution and
//!   rejections-as-values validation
//! - The interaction layer: selection, drag with snap-at-drag-end,
//!   ratio-locked resize, the typed clear-canvas gate
//! - Compressed snapshot undo/redo
//!
//! Everything here runs on the caller's thread; the async services
//! (persistence, module activation, asset loading) live in the
//! workspace crate and drive this one through ordinary calls.
//!
//! # Example
//!
//! ```ignore
//! use board_engine::{BoardEditor, NodeTypeRegistry};
//! use board_engine::types::Point;
//!
//! let registry = NodeTypeRegistry::from_inventory().into_shared();
//! let mut editor = BoardEditor::new(registry);
//! let id = editor.add_node("text", Point::new(40.0, 40.0))?;
//! ```

pub mod builder;
pub mod constants;
pub mod containment;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod graph;
pub mod groups;
pub mod interaction;
pub mod registry;
pub mod routing;
pub mod schema;
pub mod types;
pub mod undo;

// Re-export key types
pub use builder::GraphBuilder;
pub use descriptor::{DescriptorFn, DispatchMode, NodeCategory, NodeTypeDescriptor};
pub use error::{BoardError, Result};
pub use events::{BoardEvent, EventSink, NullEventSink, VecEventSink};
pub use graph::BoardGraph;
pub use groups::{GroupDeletion, GroupRemoval};
pub use interaction::BoardEditor;
pub use registry::{InstallChange, NodeTypeRegistry, SharedRegistry, UninstallChange};
pub use routing::RoundRobinCursor;
pub use schema::{
    FieldKind, FieldRejection, RejectionReason, SchemaSection, SelectOption, SettingsField,
    SettingsSchema,
};
pub use types::{BoardEdge, BoardNode, CanvasSettings, EdgeId, NodeId, NodePatch, Point, Size};
pub use undo::UndoStack;
