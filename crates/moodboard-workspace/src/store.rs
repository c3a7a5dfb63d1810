//! Workflow persistence backends
//!
//! [`WorkflowStore`] is the collaborator seam for saving and loading
//! [`WorkflowFile`] snapshots. [`MemoryWorkflowStore`] backs tests and
//! host-side caches; [`FileWorkflowStore`] keeps one pretty-printed JSON
//! file per workflow under a directory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, WorkspaceError};
use crate::workflow::{WorkflowFile, WorkflowMetadata};

/// Storage seam for workflow snapshots
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Load a workflow by id
    async fn load(&self, id: &str) -> Result<WorkflowFile>;

    /// Persist a snapshot, returning its id
    async fn store(&self, file: WorkflowFile) -> Result<String>;

    /// List stored workflows, most recently updated first
    async fn list(&self) -> Result<Vec<WorkflowMetadata>>;

    /// Delete a workflow by id
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryWorkflowStore {
    files: Mutex<HashMap<String, WorkflowFile>>,
}

impl MemoryWorkflowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored workflows
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn load(&self, id: &str) -> Result<WorkflowFile> {
        self.files
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| WorkspaceError::workflow_not_found(id))
    }

    async fn store(&self, file: WorkflowFile) -> Result<String> {
        let id = file.id.clone();
        self.files.lock().insert(id.clone(), file);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<WorkflowMetadata>> {
        let mut entries: Vec<WorkflowMetadata> =
            self.files.lock().values().map(WorkflowFile::metadata).collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.files
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| WorkspaceError::workflow_not_found(id))
    }
}

/// One JSON file per workflow under a directory
#[derive(Debug, Clone)]
pub struct FileWorkflowStore {
    root: PathBuf,
}

impl FileWorkflowStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created on the first save.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

#[async_trait]
impl WorkflowStore for FileWorkflowStore {
    async fn load(&self, id: &str) -> Result<WorkflowFile> {
        let path = self.path_for(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WorkspaceError::workflow_not_found(id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn store(&self, file: WorkflowFile) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(&file.id);
        let content = serde_json::to_string_pretty(&file)?;
        tokio::fs::write(&path, content).await?;
        log::debug!("Saved workflow '{}' to {:?}", file.id, path);
        Ok(file.id)
    }

    async fn list(&self) -> Result<Vec<WorkflowMetadata>> {
        let mut entries = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<WorkflowFile>(&content) {
                Ok(file) => entries.push(file.metadata()),
                Err(e) => {
                    log::warn!("Skipping unparseable workflow file {:?}: {}", path, e);
                }
            }
        }

        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("Deleted workflow '{}' from {:?}", id, path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(WorkspaceError::workflow_not_found(id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
