//! Node type registry
//!
//! Maps node type ids to their descriptors and tracks which types are
//! installed. Registration order is preserved: `all_types` returns the
//! catalog exactly as it was assembled, so palette ordering is stable
//! across sessions. Filtering and sorting beyond that is a view concern.
//!
//! Core types are protected at this boundary: uninstalling one is a
//! silent no-op, never an error, so bulk module operations do not have
//! to special-case them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use crate::error::{BoardError, Result};

/// Registry handle shared between the editor and module services
pub type SharedRegistry = Arc<RwLock<NodeTypeRegistry>>;

/// What an install call actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChange {
    /// The type was newly installed
    Installed,
    /// The type was already installed; nothing changed
    AlreadyInstalled,
}

/// What an uninstall call actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallChange {
    /// The type was uninstalled
    Uninstalled,
    /// The type was already uninstalled; nothing changed
    AlreadyUninstalled,
    /// The type is core and cannot be uninstalled; nothing changed
    CoreProtected,
}

struct RegistryEntry {
    descriptor: NodeTypeDescriptor,
    installed: bool,
}

/// Registry of node types with their descriptors and installed state
pub struct NodeTypeRegistry {
    /// Type ids in registration order
    order: Vec<String>,
    entries: HashMap<String, RegistryEntry>,
}

impl NodeTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Build a registry from an ordered catalog of descriptors
    pub fn with_catalog(descriptors: impl IntoIterator<Item = NodeTypeDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Build a registry from every descriptor submitted through
    /// `inventory`
    ///
    /// Collection order is whatever the linker produced, so callers that
    /// care about palette ordering should prefer an explicit catalog.
    pub fn from_inventory() -> Self {
        let mut registry = Self::new();
        for entry in inventory::iter::<DescriptorFn> {
            registry.register((entry.0)());
        }
        registry
    }

    /// Register a node type
    ///
    /// First registration appends to the catalog order and takes the
    /// descriptor's `preinstalled` flag as the installed state.
    /// Re-registering an id replaces the descriptor but keeps both its
    /// order slot and its installed state.
    pub fn register(&mut self, descriptor: NodeTypeDescriptor) {
        let id = descriptor.id.clone();
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.descriptor = descriptor;
            }
            None => {
                let installed = descriptor.preinstalled;
                self.entries.insert(
                    id.clone(),
                    RegistryEntry {
                        descriptor,
                        installed,
                    },
                );
                self.order.push(id);
            }
        }
    }

    /// Get the descriptor for a node type
    pub fn descriptor(&self, id: &str) -> Option<&NodeTypeDescriptor> {
        self.entries.get(id).map(|e| &e.descriptor)
    }

    /// Whether a node type is registered at all
    pub fn has_type(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether a node type is currently installed
    pub fn is_installed(&self, id: &str) -> bool {
        self.entries.get(id).map_or(false, |e| e.installed)
    }

    /// Every descriptor, in registration order
    pub fn all_types(&self) -> Vec<&NodeTypeDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Installed descriptors, in registration order
    pub fn installed_types(&self) -> Vec<&NodeTypeDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|e| e.installed)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Descriptors grouped by palette category
    pub fn types_by_category(&self) -> HashMap<NodeCategory, Vec<&NodeTypeDescriptor>> {
        let mut grouped: HashMap<NodeCategory, Vec<&NodeTypeDescriptor>> = HashMap::new();
        for descriptor in self.all_types() {
            grouped.entry(descriptor.category).or_default().push(descriptor);
        }
        grouped
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Install a node type
    ///
    /// Idempotent; installing an installed type reports
    /// `AlreadyInstalled`. Unknown ids fail loudly. Nodes already on a
    /// canvas are never touched.
    pub fn install(&mut self, id: &str) -> Result<InstallChange> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| BoardError::unknown_type(id))?;
        if entry.installed {
            return Ok(InstallChange::AlreadyInstalled);
        }
        entry.installed = true;
        log::info!("Installed node type '{}'", id);
        Ok(InstallChange::Installed)
    }

    /// Uninstall a node type
    ///
    /// Idempotent, and a silent no-op for core types. Unknown ids fail
    /// loudly. Nodes already on a canvas keep working; only palette
    /// availability changes.
    pub fn uninstall(&mut self, id: &str) -> Result<UninstallChange> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| BoardError::unknown_type(id))?;
        if entry.descriptor.is_core {
            log::debug!("Ignoring uninstall of core type '{}'", id);
            return Ok(UninstallChange::CoreProtected);
        }
        if !entry.installed {
            return Ok(UninstallChange::AlreadyUninstalled);
        }
        entry.installed = false;
        log::info!("Uninstalled node type '{}'", id);
        Ok(UninstallChange::Uninstalled)
    }

    /// Merge another registry into this one
    ///
    /// Shared ids take the other registry's descriptor but keep this
    /// registry's order slot and installed state; new ids append in the
    /// other registry's order with their installed state intact.
    pub fn merge(&mut self, mut other: NodeTypeRegistry) {
        let order = std::mem::take(&mut other.order);
        for id in order {
            if let Some(entry) = other.entries.remove(&id) {
                if self.entries.contains_key(&id) {
                    self.register(entry.descriptor);
                } else {
                    self.entries.insert(id.clone(), entry);
                    self.order.push(id);
                }
            }
        }
    }

    /// Wrap the registry in the shared handle used across services
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
