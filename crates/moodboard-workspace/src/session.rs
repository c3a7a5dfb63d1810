//! Editor session: one open board plus its persistence context
//!
//! [`EditorSession`] owns a [`BoardEditor`], the store it saves into, and
//! the undo history. Whether the board has unsaved changes is a revision
//! comparison against the last save or load, so every mutating editor
//! operation counts and transient interaction state never does. The
//! new-board reset is guarded by a two-step prompt whenever it would
//! discard unsaved work.

use std::sync::Arc;

use board_engine::{BoardEditor, BoardGraph, CanvasSettings, SharedRegistry, UndoStack};

use crate::error::{Result, WorkspaceError};
use crate::store::WorkflowStore;
use crate::workflow::{WorkflowFile, WorkflowMetadata};

/// Name given to workflows saved before the user names them
const UNTITLED_NAME: &str = "Untitled board";

/// Outcome of [`EditorSession::create_new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The board was clean and was reset immediately
    Reset,
    /// Unsaved changes exist; the caller must resolve or cancel the prompt
    PromptRequired,
}

/// Caller decision for a pending reset prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetChoice {
    /// Save the current board, then reset
    SaveThenReset,
    /// Drop the unsaved changes and reset
    DiscardThenReset,
}

/// Identity carried by a parked reset until the prompt is resolved
#[derive(Debug, Clone)]
struct PendingReset {
    name: String,
    description: String,
}

/// One open board: editor, store, undo history, and dirty tracking
pub struct EditorSession {
    editor: BoardEditor,
    store: Arc<dyn WorkflowStore>,
    undo: UndoStack,
    /// Identity and last snapshot of the workflow on the canvas; a fresh
    /// board holds its not-yet-stored draft
    current: Option<WorkflowFile>,
    /// Editor revision at the last save, load, or reset
    saved_revision: u64,
    pending_reset: Option<PendingReset>,
}

impl EditorSession {
    /// Create a session with an empty board
    pub fn new(registry: SharedRegistry, store: Arc<dyn WorkflowStore>) -> Self {
        Self::with_editor(BoardEditor::new(registry), store)
    }

    /// Create a session around an existing editor
    pub fn with_editor(editor: BoardEditor, store: Arc<dyn WorkflowStore>) -> Self {
        let mut undo = UndoStack::default();
        if let Err(e) = undo.push(editor.graph()) {
            log::warn!("Failed to record undo baseline: {e}");
        }
        let saved_revision = editor.revision();
        Self {
            editor,
            store,
            undo,
            current: None,
            saved_revision,
            pending_reset: None,
        }
    }

    /// The live editor
    pub fn editor(&self) -> &BoardEditor {
        &self.editor
    }

    /// The live editor, for mutations
    ///
    /// Mutations made here count toward unsaved changes; call
    /// [`checkpoint`](Self::checkpoint) at interaction boundaries to make
    /// them undoable.
    pub fn editor_mut(&mut self) -> &mut BoardEditor {
        &mut self.editor
    }

    /// Identity and last snapshot of the workflow being edited
    pub fn current_workflow(&self) -> Option<&WorkflowFile> {
        self.current.as_ref()
    }

    /// Whether the board has mutated since the last save, load, or reset
    pub fn has_unsaved_changes(&self) -> bool {
        self.editor.revision() != self.saved_revision
    }

    // --- persistence ---

    /// Save the board as it stands, returning the workflow id
    ///
    /// Always writes a fresh snapshot, changes or not. Re-saves keep the
    /// workflow's id, creation time, and (unless overridden here) its name
    /// and description. Clears the unsaved-changes state.
    pub async fn save_current(
        &mut self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<String> {
        let file = match &self.current {
            Some(previous) => {
                let mut file = previous.successor(self.editor.graph(), self.editor.canvas());
                if let Some(name) = name {
                    file.name = name.to_string();
                }
                if let Some(description) = description {
                    file.description = description.to_string();
                }
                file
            }
            None => WorkflowFile::new(
                name.unwrap_or(UNTITLED_NAME),
                description.unwrap_or_default(),
                self.editor.graph(),
                self.editor.canvas(),
            ),
        };

        let id = self.store.store(file.clone()).await?;
        log::info!("Saved workflow '{}' ({})", file.name, id);
        self.current = Some(file);
        self.saved_revision = self.editor.revision();
        Ok(id)
    }

    /// Load a stored workflow onto the canvas
    ///
    /// Replaces the graph and canvas settings, drops selection and any
    /// in-flight gesture, reseeds the undo history, and clears the
    /// unsaved-changes state.
    pub async fn load(&mut self, id: &str) -> Result<()> {
        let file = self.store.load(id).await?;
        log::info!("Loaded workflow '{}' ({})", file.name, file.id);

        self.editor.replace_graph(file.to_graph());
        self.editor.set_canvas(file.canvas_settings.clone());
        self.reseed_history()?;
        self.saved_revision = self.editor.revision();
        self.current = Some(file);
        self.pending_reset = None;
        Ok(())
    }

    /// List stored workflows, most recently updated first
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowMetadata>> {
        self.store.list().await
    }

    /// Delete a stored workflow
    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }

    // --- new-board reset ---

    /// Start a new board
    ///
    /// With a clean board the reset happens immediately. With unsaved
    /// changes the request is parked and `PromptRequired` is returned;
    /// the caller then resolves it with [`resolve_reset`](Self::resolve_reset)
    /// or abandons it with [`cancel_reset`](Self::cancel_reset). The board
    /// is untouched until the prompt is resolved.
    pub fn create_new(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<ResetOutcome> {
        if self.pending_reset.is_some() {
            return Err(WorkspaceError::ResetPending);
        }
        if self.has_unsaved_changes() {
            self.pending_reset = Some(PendingReset {
                name: name.into(),
                description: description.into(),
            });
            log::debug!("Reset deferred: board has unsaved changes");
            return Ok(ResetOutcome::PromptRequired);
        }
        self.reset_board(name.into(), description.into())?;
        Ok(ResetOutcome::Reset)
    }

    /// Resolve a pending reset prompt
    ///
    /// `SaveThenReset` saves under the current identity first; if that
    /// save fails the prompt stays pending so the caller can retry.
    pub async fn resolve_reset(&mut self, choice: ResetChoice) -> Result<()> {
        let pending = self
            .pending_reset
            .clone()
            .ok_or(WorkspaceError::NoPendingReset)?;

        if choice == ResetChoice::SaveThenReset {
            self.save_current(None, None).await?;
        }

        self.pending_reset = None;
        self.reset_board(pending.name, pending.description)
    }

    /// Abandon a pending reset prompt, leaving the board untouched
    pub fn cancel_reset(&mut self) -> Result<()> {
        self.pending_reset
            .take()
            .map(|_| ())
            .ok_or(WorkspaceError::NoPendingReset)
    }

    /// Whether a reset prompt is waiting for a decision
    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset.is_some()
    }

    fn reset_board(&mut self, name: String, description: String) -> Result<()> {
        self.editor.replace_graph(BoardGraph::new());
        self.editor.set_canvas(CanvasSettings::default());
        let draft = WorkflowFile::new(name, description, self.editor.graph(), self.editor.canvas());
        log::info!("Board reset to new workflow '{}'", draft.name);
        self.current = Some(draft);
        self.reseed_history()?;
        self.saved_revision = self.editor.revision();
        Ok(())
    }

    // --- undo / redo ---

    /// Record an undo snapshot if the board changed since the last one
    pub fn checkpoint(&mut self) -> Result<bool> {
        Ok(self.undo.push_if_changed(self.editor.graph())?)
    }

    /// Step back one snapshot; returns whether anything was restored
    pub fn undo(&mut self) -> Result<bool> {
        match self.undo.undo() {
            Some(graph) => {
                self.editor.replace_graph(graph?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Step forward one snapshot; returns whether anything was restored
    pub fn redo(&mut self) -> Result<bool> {
        match self.undo.redo() {
            Some(graph) => {
                self.editor.replace_graph(graph?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether undo is available
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Whether redo is available
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Clear the canvas behind the typed confirmation gate
    pub fn clear_canvas(&mut self, confirmation: &str) -> Result<()> {
        self.editor.clear_canvas(confirmation)?;
        Ok(())
    }

    fn reseed_history(&mut self) -> Result<()> {
        self.undo.clear();
        self.undo.push(self.editor.graph())?;
        Ok(())
    }
}
