//! Canvas interaction layer
//!
//! [`BoardEditor`] translates pointer and keyboard gestures into graph
//! operations and owns the transient state that is never persisted: the
//! current selection and any in-flight drag or resize. Every committed
//! mutation bumps a revision counter (the persistence layer derives its
//! dirty flag from it) and is reported to subscribed event sinks.
//!
//! Two gesture rules are contractual:
//! - positions move freely while a drag is sampled; snap-to-grid
//!   rounding happens once, at drag end
//! - the aspect ratio for a ratio-locked resize is captured when the
//!   gesture starts and reused for every sample, so repeated rounding
//!   cannot drift it

use std::collections::HashSet;
use std::sync::Arc;

use crate::containment;
use crate::error::{BoardError, Result};
use crate::events::{BoardEvent, EventSink};
use crate::graph::{BoardGraph, RemovedNode};
use crate::groups::{GroupDeletion, GroupRemoval};
use crate::registry::SharedRegistry;
use crate::schema::{self, FieldRejection, SettingsSchema};
use crate::types::{BoardEdge, BoardNode, CanvasSettings, EdgeId, NodeId, NodePatch, Point, Size};

/// In-flight drag gesture
struct DragState {
    /// Pointer position when the gesture started
    origin: Point,
    /// Dragged node ids with their positions at gesture start
    anchors: Vec<(NodeId, Point)>,
    /// Whether any sample arrived since the gesture started
    moved: bool,
}

/// In-flight resize gesture
struct ResizeState {
    node_id: NodeId,
    /// Size at gesture start, restored on cancel
    start_size: Size,
    /// Width / height at gesture start, present iff the ratio is locked
    ratio: Option<f64>,
    /// Whether any sample arrived since the gesture started
    resized: bool,
}

/// The canvas editor: graph, selection, gestures, and events
pub struct BoardEditor {
    graph: BoardGraph,
    registry: SharedRegistry,
    canvas: CanvasSettings,
    /// Ordered, duplicate-free selection
    selection: Vec<NodeId>,
    drag: Option<DragState>,
    resize: Option<ResizeState>,
    sinks: Vec<Arc<dyn EventSink>>,
    /// Monotonic count of committed mutations
    revision: u64,
}

impl BoardEditor {
    /// Create an editor over an empty graph
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_graph(registry, BoardGraph::new())
    }

    /// Create an editor over an existing graph
    pub fn with_graph(registry: SharedRegistry, graph: BoardGraph) -> Self {
        Self {
            graph,
            registry,
            canvas: CanvasSettings::default(),
            selection: Vec::new(),
            drag: None,
            resize: None,
            sinks: Vec::new(),
            revision: 0,
        }
    }

    /// The current graph
    pub fn graph(&self) -> &BoardGraph {
        &self.graph
    }

    /// Handle to the shared node type registry
    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.registry)
    }

    /// Current canvas settings
    pub fn canvas(&self) -> &CanvasSettings {
        &self.canvas
    }

    /// Replace the canvas settings wholesale
    pub fn set_canvas(&mut self, canvas: CanvasSettings) {
        self.canvas = canvas;
        self.touch();
    }

    /// Enable or disable snap-to-grid
    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.canvas.snap_to_grid = enabled;
        self.touch();
    }

    /// Set the snapping grid size
    pub fn set_grid_size(&mut self, size: f64) {
        self.canvas.grid_size = size;
        self.touch();
    }

    /// Monotonic count of committed mutations
    ///
    /// Selection changes and in-flight gesture samples do not count;
    /// a gesture commits once, when it ends.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribe a sink to committed-mutation events
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Swap in a different graph wholesale (load, new board, undo)
    ///
    /// Selection and in-flight gestures are reset. The revision still
    /// advances so callers tracking it can re-baseline.
    pub fn replace_graph(&mut self, graph: BoardGraph) {
        self.graph = graph;
        self.selection.clear();
        self.drag = None;
        self.resize = None;
        self.touch();
    }

    // --- selection ---

    /// The selection, in the order it was built
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Whether a node is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    /// Replace the selection with a single node
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.graph.contains_node(id) {
            return Err(BoardError::node_not_found(id));
        }
        self.selection.clear();
        self.selection.push(id.to_string());
        Ok(())
    }

    /// Add a node to the selection, or remove it if already selected
    ///
    /// Returns whether the node is selected afterwards.
    pub fn toggle_selected(&mut self, id: &str) -> Result<bool> {
        if !self.graph.contains_node(id) {
            return Err(BoardError::node_not_found(id));
        }
        if let Some(index) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(index);
            Ok(false)
        } else {
            self.selection.push(id.to_string());
            Ok(true)
        }
    }

    /// Deselect everything
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- nodes ---

    /// Create a node of a registered, installed type
    ///
    /// The node takes its geometry from the type descriptor. Unknown and
    /// uninstalled types both fail with `UnknownType`.
    pub fn add_node(&mut self, node_type: &str, position: Point) -> Result<NodeId> {
        let descriptor = {
            let registry = self.registry.read();
            match registry.descriptor(node_type) {
                Some(descriptor) if registry.is_installed(node_type) => descriptor.clone(),
                _ => return Err(BoardError::unknown_type(node_type)),
            }
        };

        let id = format!("node-{}", uuid::Uuid::new_v4());
        let node = BoardNode::new(
            id.clone(),
            descriptor.id.clone(),
            position,
            descriptor.default_size,
        )
        .with_min_size(descriptor.min_size);
        self.graph.insert_node(node)?;
        self.touch();
        self.emit(BoardEvent::NodeAdded {
            node_id: id.clone(),
            node_type: descriptor.id,
        });
        Ok(id)
    }

    /// Apply a partial update to a node
    ///
    /// Inherits the graph's rules: locked nodes reject geometry but
    /// accept `data` and `node_settings` merges.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<()> {
        self.graph.update_node(id, patch)?;
        self.touch();
        self.emit(BoardEvent::NodeUpdated {
            node_id: id.to_string(),
        });
        Ok(())
    }

    /// Delete a node, cascading to its edges
    pub fn delete_node(&mut self, id: &str) -> Result<RemovedNode> {
        let removed = self.graph.delete_node(id)?;
        self.forget_node(id);
        self.touch();
        self.emit(BoardEvent::NodeRemoved {
            node_id: id.to_string(),
            removed_edge_ids: removed.removed_edges.iter().map(|e| e.id.clone()).collect(),
        });
        Ok(removed)
    }

    /// Delete every selected node
    ///
    /// All ids are validated before the first deletion, so the call is
    /// all-or-nothing. The selection is cleared on success.
    pub fn delete_selection(&mut self) -> Result<Vec<RemovedNode>> {
        if self.selection.is_empty() {
            return Err(BoardError::EmptySelection);
        }
        for id in &self.selection {
            if !self.graph.contains_node(id) {
                return Err(BoardError::node_not_found(id.clone()));
            }
        }
        let ids = std::mem::take(&mut self.selection);
        let mut removed = Vec::new();
        for id in &ids {
            // Deleting a selected group first only detaches members,
            // so later ids on the list are still present.
            removed.push(self.delete_node(id)?);
        }
        Ok(removed)
    }

    /// Lock or unlock a node's geometry
    pub fn set_locked(&mut self, id: &str, locked: bool) -> Result<()> {
        self.update_node(
            id,
            NodePatch {
                is_locked: Some(locked),
                ..Default::default()
            },
        )
    }

    /// Enable or disable a node's aspect-ratio lock
    pub fn set_ratio_locked(&mut self, id: &str, locked: bool) -> Result<()> {
        self.update_node(
            id,
            NodePatch {
                is_ratio_locked: Some(locked),
                ..Default::default()
            },
        )
    }

    // --- settings ---

    /// Settings panel payload for a node: its type's schema plus the
    /// node's fully resolved values
    pub fn open_settings(
        &self,
        node_id: &str,
    ) -> Result<(SettingsSchema, serde_json::Map<String, serde_json::Value>)> {
        let node = self
            .graph
            .node(node_id)
            .ok_or_else(|| BoardError::node_not_found(node_id))?;
        let settings_schema = self.type_schema(&node.node_type)?;
        let resolved = settings_schema.resolve(&node.node_settings);
        Ok((settings_schema, resolved))
    }

    /// Commit a batch of settings edits against the node type's schema
    ///
    /// Accepted values are merged into the node's settings bag; rejected
    /// ones are returned for the form to display. A rejection never
    /// blocks the accepted fields. Edits for keys the schema does not
    /// declare are dropped.
    pub fn commit_settings(
        &mut self,
        node_id: &str,
        edits: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<FieldRejection>> {
        let node_type = self
            .graph
            .node(node_id)
            .ok_or_else(|| BoardError::node_not_found(node_id))?
            .node_type
            .clone();
        let settings_schema = self.type_schema(&node_type)?;

        let mut accepted = serde_json::Map::new();
        let mut rejections = Vec::new();
        for (key, value) in edits {
            match settings_schema.field(key) {
                Some(field) => match field.validate(value) {
                    Ok(stored) => {
                        accepted.insert(key.clone(), stored);
                    }
                    Err(rejection) => rejections.push(rejection),
                },
                None => log::debug!("Dropping edit for undeclared settings key '{}'", key),
            }
        }

        if !accepted.is_empty() {
            self.graph.update_node(
                node_id,
                NodePatch {
                    node_settings: Some(accepted),
                    ..Default::default()
                },
            )?;
            self.touch();
            self.emit(BoardEvent::NodeUpdated {
                node_id: node_id.to_string(),
            });
        }
        Ok(rejections)
    }

    /// Append a tag to a node's tags field; returns the new count
    ///
    /// Duplicates are kept: the list is whatever the user committed,
    /// element by element.
    pub fn commit_tag(
        &mut self,
        node_id: &str,
        field_key: &str,
        tag: impl Into<String>,
    ) -> Result<usize> {
        let node = self
            .graph
            .node_mut(node_id)
            .ok_or_else(|| BoardError::node_not_found(node_id))?;
        let count = schema::commit_tag(&mut node.node_settings, field_key, tag);
        self.touch();
        self.emit(BoardEvent::NodeUpdated {
            node_id: node_id.to_string(),
        });
        Ok(count)
    }

    // --- edges ---

    /// Connect two nodes
    ///
    /// Self-loops are rejected when the source node's type forbids them;
    /// other types allow them. Endpoints must exist.
    pub fn add_edge(
        &mut self,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> Result<EdgeId> {
        if source == target {
            let node_type = self
                .graph
                .node(source)
                .map(|n| n.node_type.clone())
                .ok_or_else(|| BoardError::DanglingReference(source.to_string()))?;
            let forbids = {
                let registry = self.registry.read();
                registry
                    .descriptor(&node_type)
                    .map_or(false, |d| d.forbid_self_loops)
            };
            if forbids {
                return Err(BoardError::SelfLoopForbidden(node_type));
            }
        }

        let id = format!("edge-{}", uuid::Uuid::new_v4());
        self.graph.insert_edge(BoardEdge::new(
            id.clone(),
            source,
            source_handle,
            target,
            target_handle,
        ))?;
        self.touch();
        self.emit(BoardEvent::EdgeAdded {
            edge_id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        });
        Ok(id)
    }

    /// Disconnect an edge
    pub fn delete_edge(&mut self, id: &str) -> Result<BoardEdge> {
        let edge = self.graph.delete_edge(id)?;
        self.touch();
        self.emit(BoardEvent::EdgeRemoved {
            edge_id: id.to_string(),
        });
        Ok(edge)
    }

    /// Merge a prebuilt subgraph into the board
    ///
    /// Everything is validated before anything lands, so the call is
    /// all-or-nothing: incoming node and edge ids must not collide with
    /// the board or each other, edge endpoints must resolve among the
    /// board or the batch, and group back-references must point at group
    /// nodes. Incoming nodes may reference groups declared later in the
    /// batch. Existing nodes and edges are never touched.
    pub fn merge_subgraph(
        &mut self,
        nodes: Vec<BoardNode>,
        edges: Vec<BoardEdge>,
    ) -> Result<()> {
        let mut incoming: HashSet<&str> = HashSet::new();
        for node in &nodes {
            if self.graph.contains_node(&node.id) || !incoming.insert(node.id.as_str()) {
                return Err(BoardError::DuplicateId(node.id.clone()));
            }
        }
        for node in &nodes {
            if let Some(group_id) = node.group_id.as_deref() {
                let target = nodes
                    .iter()
                    .find(|n| n.id == group_id)
                    .or_else(|| self.graph.node(group_id));
                match target {
                    Some(group) if group.is_group() => {}
                    Some(_) => return Err(BoardError::NotAGroup(group_id.to_string())),
                    None => return Err(BoardError::GroupNotFound(group_id.to_string())),
                }
            }
        }
        let mut incoming_edges: HashSet<&str> = HashSet::new();
        for edge in &edges {
            if self.graph.edge(&edge.id).is_some() || !incoming_edges.insert(edge.id.as_str()) {
                return Err(BoardError::DuplicateId(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !incoming.contains(endpoint.as_str()) && !self.graph.contains_node(endpoint) {
                    return Err(BoardError::DanglingReference(endpoint.clone()));
                }
            }
        }

        // Insert with memberships deferred so batch order never matters
        let memberships: Vec<(NodeId, NodeId)> = nodes
            .iter()
            .filter_map(|n| n.group_id.clone().map(|g| (n.id.clone(), g)))
            .collect();
        let mut added_nodes = Vec::with_capacity(nodes.len());
        for mut node in nodes {
            node.group_id = None;
            added_nodes.push((node.id.clone(), node.node_type.clone()));
            self.graph.insert_node(node)?;
        }
        for (node_id, group_id) in memberships {
            self.graph.set_group_membership(&node_id, Some(group_id));
        }
        let mut added_edges = Vec::with_capacity(edges.len());
        for edge in edges {
            added_edges.push((edge.id.clone(), edge.source.clone(), edge.target.clone()));
            self.graph.insert_edge(edge)?;
        }

        log::debug!(
            "Merged subgraph ({} node(s), {} edge(s))",
            added_nodes.len(),
            added_edges.len()
        );
        self.touch();
        for (node_id, node_type) in added_nodes {
            self.emit(BoardEvent::NodeAdded { node_id, node_type });
        }
        for (edge_id, source, target) in added_edges {
            self.emit(BoardEvent::EdgeAdded {
                edge_id,
                source,
                target,
            });
        }
        Ok(())
    }

    // --- groups ---

    /// Group the current selection; the new group becomes the selection
    pub fn group_selection(&mut self, label: impl Into<String>) -> Result<NodeId> {
        let members = self.selection.clone();
        let group_id = self.graph.group_nodes(&members, label)?;
        self.selection = vec![group_id.clone()];
        self.touch();
        self.emit(BoardEvent::GroupCreated {
            group_id: group_id.clone(),
            member_ids: members,
        });
        Ok(group_id)
    }

    /// Collapse or expand a group; returns the new collapsed state
    pub fn toggle_collapse(&mut self, group_id: &str) -> Result<bool> {
        let is_collapsed = self.graph.toggle_collapse(group_id)?;
        self.touch();
        self.emit(BoardEvent::GroupToggled {
            group_id: group_id.to_string(),
            is_collapsed,
        });
        Ok(is_collapsed)
    }

    /// Delete a group, detaching or removing its members per `mode`
    pub fn delete_group(&mut self, group_id: &str, mode: GroupDeletion) -> Result<GroupRemoval> {
        let removal = self.graph.delete_group(group_id, mode)?;
        self.forget_node(group_id);
        for id in &removal.removed_member_ids {
            self.forget_node(id);
        }
        self.touch();
        self.emit(BoardEvent::GroupRemoved {
            group_id: group_id.to_string(),
            detached_member_ids: removal.detached_member_ids.clone(),
            removed_member_ids: removal.removed_member_ids.clone(),
        });
        Ok(removal)
    }

    // --- drag ---

    /// Start dragging the current selection
    ///
    /// The drag set is the selection plus every transitive member of any
    /// selected group, minus locked nodes. Per-node anchors are captured
    /// once; every sample positions nodes relative to them. Returns the
    /// size of the drag set.
    pub fn begin_drag(&mut self, origin: Point) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(BoardError::EmptySelection);
        }

        let mut ids: Vec<NodeId> = Vec::new();
        for id in &self.selection {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
            if self.graph.node(id).map_or(false, |n| n.is_group()) {
                for member_id in self.graph.transitive_members(id) {
                    if !ids.contains(&member_id) {
                        ids.push(member_id);
                    }
                }
            }
        }

        let anchors: Vec<(NodeId, Point)> = ids
            .into_iter()
            .filter_map(|id| {
                let node = self.graph.node(&id)?;
                if node.is_locked {
                    None
                } else {
                    Some((id, node.position))
                }
            })
            .collect();
        let count = anchors.len();
        self.drag = Some(DragState {
            origin,
            anchors,
            moved: false,
        });
        Ok(count)
    }

    /// Sample the drag at a new pointer position
    ///
    /// Positions move freely here; grid snapping waits for [`end_drag`].
    /// Without an active drag this is a no-op.
    ///
    /// [`end_drag`]: Self::end_drag
    pub fn drag_to(&mut self, point: Point) {
        if let Some(drag) = self.drag.as_mut() {
            drag.moved = true;
            let delta_x = point.x - drag.origin.x;
            let delta_y = point.y - drag.origin.y;
            for (id, anchor) in &drag.anchors {
                if let Some(node) = self.graph.node_mut(id) {
                    node.position = Point::new(anchor.x + delta_x, anchor.y + delta_y);
                }
            }
        }
    }

    /// Finish the drag
    ///
    /// When snap-to-grid is enabled, each dragged position is rounded to
    /// the nearest grid multiple here, once. Returns the moved node ids;
    /// a drag with no samples commits nothing.
    pub fn end_drag(&mut self) -> Vec<NodeId> {
        let drag = match self.drag.take() {
            Some(drag) => drag,
            None => return Vec::new(),
        };
        if !drag.moved {
            return Vec::new();
        }

        let moved_ids: Vec<NodeId> = drag.anchors.iter().map(|(id, _)| id.clone()).collect();
        if self.canvas.snap_to_grid && self.canvas.grid_size > 0.0 {
            let grid = self.canvas.grid_size;
            for id in &moved_ids {
                if let Some(node) = self.graph.node_mut(id) {
                    node.position = Point::new(
                        (node.position.x / grid).round() * grid,
                        (node.position.y / grid).round() * grid,
                    );
                }
            }
        }
        self.touch();
        self.emit(BoardEvent::NodesMoved {
            node_ids: moved_ids.clone(),
        });
        moved_ids
    }

    /// Abandon the drag, restoring every node to its anchor position
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            for (id, anchor) in drag.anchors {
                if let Some(node) = self.graph.node_mut(&id) {
                    node.position = anchor;
                }
            }
        }
    }

    // --- resize ---

    /// Start resizing a node
    ///
    /// When the node is ratio-locked, or shift is held at gesture start,
    /// the aspect ratio is captured here and reused for every sample.
    /// Locked nodes are not resizable.
    pub fn begin_resize(&mut self, id: &str, shift_held: bool) -> Result<()> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| BoardError::node_not_found(id))?;
        if node.is_locked {
            return Err(BoardError::NodeLocked(id.to_string()));
        }
        let ratio = if node.is_ratio_locked || shift_held {
            node.aspect_ratio()
        } else {
            None
        };
        self.resize = Some(ResizeState {
            node_id: id.to_string(),
            start_size: node.size,
            ratio,
            resized: false,
        });
        Ok(())
    }

    /// Sample the resize at a new width
    ///
    /// With a captured ratio the height is derived from it; otherwise
    /// the height keeps its current value. Sizes clamp to the node's
    /// minimum. Without an active resize this is a no-op.
    pub fn resize_width_to(&mut self, width: f64) {
        if let Some(resize) = self.resize.as_mut() {
            if let Some(node) = self.graph.node_mut(&resize.node_id) {
                resize.resized = true;
                let height = match resize.ratio {
                    Some(ratio) if ratio != 0.0 => width / ratio,
                    _ => node.size.height,
                };
                node.size = Size::new(width, height).clamped_to(node.min_size);
            }
        }
    }

    /// Sample the resize at a new height
    pub fn resize_height_to(&mut self, height: f64) {
        if let Some(resize) = self.resize.as_mut() {
            if let Some(node) = self.graph.node_mut(&resize.node_id) {
                resize.resized = true;
                let width = match resize.ratio {
                    Some(ratio) => height * ratio,
                    None => node.size.width,
                };
                node.size = Size::new(width, height).clamped_to(node.min_size);
            }
        }
    }

    /// Finish the resize; returns the node id if anything changed
    pub fn end_resize(&mut self) -> Option<NodeId> {
        let resize = self.resize.take()?;
        if !resize.resized {
            return None;
        }
        self.touch();
        self.emit(BoardEvent::NodeUpdated {
            node_id: resize.node_id.clone(),
        });
        Some(resize.node_id)
    }

    /// Abandon the resize, restoring the starting size
    pub fn cancel_resize(&mut self) {
        if let Some(resize) = self.resize.take() {
            if let Some(node) = self.graph.node_mut(&resize.node_id) {
                node.size = resize.start_size;
            }
        }
    }

    // --- canvas ---

    /// Clear the whole canvas behind the typed confirmation gate
    ///
    /// `confirmation` must equal the clear-canvas token exactly; on a
    /// mismatch nothing changes, including the selection.
    pub fn clear_canvas(&mut self, confirmation: &str) -> Result<()> {
        let node_count = self.graph.node_count();
        let edge_count = self.graph.edge_count();
        self.graph.clear(confirmation)?;
        self.selection.clear();
        self.drag = None;
        self.resize = None;
        self.touch();
        self.emit(BoardEvent::CanvasCleared {
            node_count,
            edge_count,
        });
        Ok(())
    }

    // --- internals ---

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Drop transient references to a node that no longer exists
    fn forget_node(&mut self, id: &str) {
        self.selection.retain(|s| s != id);
        if let Some(drag) = self.drag.as_mut() {
            drag.anchors.retain(|(anchor_id, _)| anchor_id != id);
        }
        if self.resize.as_ref().map_or(false, |r| r.node_id == id) {
            self.resize = None;
        }
    }

    fn type_schema(&self, node_type: &str) -> Result<SettingsSchema> {
        let registry = self.registry.read();
        registry
            .descriptor(node_type)
            .map(|d| d.settings.clone())
            .ok_or_else(|| BoardError::unknown_type(node_type))
    }

    /// Deliver an event to every sink inside the containment boundary
    ///
    /// A panicking sink is reported and skipped; the mutation that
    /// produced the event has already committed and stays committed.
    fn emit(&self, event: BoardEvent) {
        for sink in &self.sinks {
            match containment::contained("event sink", || sink.send(event.clone())) {
                Some(Ok(())) => {}
                Some(Err(err)) => log::warn!("Event sink refused delivery: {}", err),
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{NodeCategory, NodeTypeDescriptor};
    use crate::events::{EventError, VecEventSink};
    use crate::registry::NodeTypeRegistry;
    use crate::schema::{RejectionReason, SchemaSection, SettingsField};
    use crate::types::GroupState;
    use serde_json::json;

    fn make_registry() -> SharedRegistry {
        let card_schema = SettingsSchema::new().with_section(
            SchemaSection::new("general", "General")
                .with_field(SettingsField::text("title", "Title"))
                .with_field(SettingsField::number("count", "Count").with_bounds(1.0, 10.0))
                .with_field(SettingsField::color("tint", "Tint"))
                .with_field(SettingsField::tags("keywords", "Keywords")),
        );
        NodeTypeRegistry::with_catalog([
            NodeTypeDescriptor::core("shape", "Shape").with_min_size(40.0, 40.0),
            NodeTypeDescriptor::core("image", "Image")
                .with_default_size(320.0, 240.0)
                .with_min_size(40.0, 40.0),
            NodeTypeDescriptor::core("card", "Card").with_settings(card_schema),
            NodeTypeDescriptor::new("router", "Router", NodeCategory::System)
                .preinstalled()
                .forbid_self_loops(),
            NodeTypeDescriptor::new("webhook", "Webhook", NodeCategory::Integrations),
        ])
        .into_shared()
    }

    fn make_editor() -> BoardEditor {
        BoardEditor::new(make_registry())
    }

    /// Sink that panics on every delivery
    struct PanickingSink;

    impl EventSink for PanickingSink {
        fn send(&self, _event: BoardEvent) -> std::result::Result<(), EventError> {
            panic!("sink exploded");
        }
    }

    #[test]
    fn test_add_node_uses_descriptor_defaults() {
        let mut editor = make_editor();

        let id = editor.add_node("image", Point::new(10.0, 20.0)).unwrap();

        let node = editor.graph().node(&id).unwrap();
        assert_eq!(node.node_type, "image");
        assert_eq!(node.position, Point::new(10.0, 20.0));
        assert_eq!(node.size, Size::new(320.0, 240.0));
        assert_eq!(node.min_size, Size::new(40.0, 40.0));
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn test_add_node_requires_installed_type() {
        let mut editor = make_editor();

        let err = editor.add_node("ghost", Point::default()).unwrap_err();
        assert!(matches!(err, BoardError::UnknownType(_)));

        // Registered but not installed fails the same way
        let err = editor.add_node("webhook", Point::default()).unwrap_err();
        assert!(matches!(err, BoardError::UnknownType(_)));

        editor.registry().write().install("webhook").unwrap();
        assert!(editor.add_node("webhook", Point::default()).is_ok());
    }

    #[test]
    fn test_selection_is_ordered_and_unique() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();

        assert!(editor.toggle_selected(&a).unwrap());
        assert!(editor.toggle_selected(&b).unwrap());
        assert_eq!(editor.selection(), &[a.clone(), b.clone()]);

        assert!(!editor.toggle_selected(&a).unwrap());
        assert_eq!(editor.selection(), &[b.clone()]);

        editor.select(&a).unwrap();
        assert_eq!(editor.selection(), &[a]);

        assert!(matches!(
            editor.select("ghost").unwrap_err(),
            BoardError::NodeNotFound(_)
        ));
    }

    #[test]
    fn test_deleting_node_prunes_selection() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        editor.select(&a).unwrap();

        editor.delete_node(&a).unwrap();

        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_drag_moves_selection_and_group_members() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();
        editor.toggle_selected(&a).unwrap();
        editor.toggle_selected(&b).unwrap();
        let group_id = editor.group_selection("Pair").unwrap();

        // Grouping selects the group; dragging it carries the members
        let count = editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(count, 3);

        editor.drag_to(Point::new(50.0, 30.0));
        let moved = editor.end_drag();

        assert_eq!(moved.len(), 3);
        assert_eq!(
            editor.graph().node(&a).unwrap().position,
            Point::new(50.0, 30.0)
        );
        assert_eq!(
            editor.graph().node(&b).unwrap().position,
            Point::new(150.0, 30.0)
        );
        assert_eq!(
            editor.graph().node(&group_id).unwrap().position,
            Point::new(26.0, 6.0)
        );
    }

    #[test]
    fn test_drag_skips_locked_nodes() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();
        editor.set_locked(&a, true).unwrap();
        editor.toggle_selected(&a).unwrap();
        editor.toggle_selected(&b).unwrap();

        let count = editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(count, 1);

        editor.drag_to(Point::new(25.0, 25.0));
        editor.end_drag();

        assert_eq!(editor.graph().node(&a).unwrap().position, Point::new(0.0, 0.0));
        assert_eq!(
            editor.graph().node(&b).unwrap().position,
            Point::new(125.0, 25.0)
        );
    }

    #[test]
    fn test_snap_applies_only_at_drag_end() {
        let mut editor = make_editor();
        editor.set_snap_to_grid(true);
        editor.set_grid_size(20.0);
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        editor.select(&a).unwrap();

        editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        editor.drag_to(Point::new(33.0, 9.0));

        // Mid-drag positions are raw
        assert_eq!(editor.graph().node(&a).unwrap().position, Point::new(33.0, 9.0));

        editor.end_drag();
        assert_eq!(editor.graph().node(&a).unwrap().position, Point::new(40.0, 0.0));
    }

    #[test]
    fn test_drag_without_motion_commits_nothing() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        editor.select(&a).unwrap();
        let revision = editor.revision();

        editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        let moved = editor.end_drag();

        assert!(moved.is_empty());
        assert_eq!(editor.revision(), revision);
    }

    #[test]
    fn test_cancel_drag_restores_positions() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(10.0, 10.0)).unwrap();
        editor.select(&a).unwrap();

        editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        editor.drag_to(Point::new(500.0, 500.0));
        editor.cancel_drag();

        assert_eq!(
            editor.graph().node(&a).unwrap().position,
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn test_ratio_locked_resize_preserves_start_ratio() {
        let mut editor = make_editor();
        let a = editor.add_node("image", Point::default()).unwrap();
        editor.update_node(&a, NodePatch::size(Size::new(200.0, 100.0))).unwrap();
        editor.set_ratio_locked(&a, true).unwrap();

        editor.begin_resize(&a, false).unwrap();
        editor.resize_width_to(400.0);
        assert_eq!(editor.graph().node(&a).unwrap().size, Size::new(400.0, 200.0));

        // The ratio comes from gesture start, not the previous sample
        editor.resize_width_to(401.0);
        assert_eq!(
            editor.graph().node(&a).unwrap().size,
            Size::new(401.0, 200.5)
        );

        editor.resize_height_to(50.0);
        assert_eq!(editor.graph().node(&a).unwrap().size, Size::new(100.0, 50.0));
        assert_eq!(editor.end_resize(), Some(a));
    }

    #[test]
    fn test_shift_held_locks_ratio_for_unlocked_node() {
        let mut editor = make_editor();
        let a = editor.add_node("image", Point::default()).unwrap();
        editor.update_node(&a, NodePatch::size(Size::new(200.0, 100.0))).unwrap();

        editor.begin_resize(&a, true).unwrap();
        editor.resize_width_to(400.0);

        assert_eq!(editor.graph().node(&a).unwrap().size, Size::new(400.0, 200.0));
    }

    #[test]
    fn test_free_resize_changes_one_dimension() {
        let mut editor = make_editor();
        let a = editor.add_node("image", Point::default()).unwrap();
        editor.update_node(&a, NodePatch::size(Size::new(200.0, 100.0))).unwrap();

        editor.begin_resize(&a, false).unwrap();
        editor.resize_width_to(400.0);
        editor.resize_height_to(50.0);

        assert_eq!(editor.graph().node(&a).unwrap().size, Size::new(400.0, 50.0));
    }

    #[test]
    fn test_resize_clamps_to_min_size() {
        let mut editor = make_editor();
        let a = editor.add_node("image", Point::default()).unwrap();

        editor.begin_resize(&a, false).unwrap();
        editor.resize_width_to(5.0);

        assert_eq!(editor.graph().node(&a).unwrap().size.width, 40.0);
    }

    #[test]
    fn test_locked_node_rejects_resize() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::default()).unwrap();
        editor.set_locked(&a, true).unwrap();

        assert!(matches!(
            editor.begin_resize(&a, false).unwrap_err(),
            BoardError::NodeLocked(_)
        ));

        // Unlocking is a flag change, not geometry, so it goes through
        editor.set_locked(&a, false).unwrap();
        assert!(editor.begin_resize(&a, false).is_ok());
    }

    #[test]
    fn test_cancel_resize_restores_size() {
        let mut editor = make_editor();
        let a = editor.add_node("image", Point::default()).unwrap();

        editor.begin_resize(&a, false).unwrap();
        editor.resize_width_to(900.0);
        editor.cancel_resize();

        assert_eq!(editor.graph().node(&a).unwrap().size, Size::new(320.0, 240.0));
    }

    #[test]
    fn test_self_loop_forbidden_by_type_policy() {
        let mut editor = make_editor();
        let router = editor.add_node("router", Point::default()).unwrap();
        let shape = editor.add_node("shape", Point::default()).unwrap();

        let err = editor.add_edge(&router, "out", &router, "in").unwrap_err();
        assert!(matches!(err, BoardError::SelfLoopForbidden(_)));
        assert_eq!(editor.graph().edge_count(), 0);

        // Types without the policy may loop onto themselves
        assert!(editor.add_edge(&shape, "out", &shape, "in").is_ok());
    }

    #[test]
    fn test_delete_selection_is_all_or_nothing() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();
        let c = editor.add_node("shape", Point::new(200.0, 0.0)).unwrap();
        editor.toggle_selected(&a).unwrap();
        editor.toggle_selected(&b).unwrap();

        let removed = editor.delete_selection().unwrap();

        assert_eq!(removed.len(), 2);
        assert!(editor.selection().is_empty());
        assert!(!editor.graph().contains_node(&a));
        assert!(editor.graph().contains_node(&c));

        assert!(matches!(
            editor.delete_selection().unwrap_err(),
            BoardError::EmptySelection
        ));
    }

    #[test]
    fn test_clear_canvas_confirmation_gate() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::default()).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();
        editor.add_edge(&a, "out", &b, "in").unwrap();
        editor.select(&a).unwrap();

        let err = editor.clear_canvas("delete").unwrap_err();
        assert!(matches!(err, BoardError::ConfirmationMismatch { .. }));
        assert_eq!(editor.graph().node_count(), 2);
        assert_eq!(editor.selection(), &[a]);

        editor.clear_canvas("DELETE").unwrap();
        assert!(editor.graph().is_empty());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_commit_settings_applies_valid_and_reports_invalid() {
        let mut editor = make_editor();
        let a = editor.add_node("card", Point::default()).unwrap();

        let mut edits = serde_json::Map::new();
        edits.insert("title".to_string(), json!("Launch plan"));
        edits.insert("count".to_string(), json!("lots"));
        edits.insert("undeclared".to_string(), json!(1));

        let rejections = editor.commit_settings(&a, &edits).unwrap();

        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].field, "count");
        assert_eq!(rejections[0].reason, RejectionReason::NotNumeric);

        let node = editor.graph().node(&a).unwrap();
        assert_eq!(node.node_settings["title"], json!("Launch plan"));
        assert!(node.node_settings.get("count").is_none());
        assert!(node.node_settings.get("undeclared").is_none());
    }

    #[test]
    fn test_commit_settings_color_last_writer_wins() {
        let mut editor = make_editor();
        let a = editor.add_node("card", Point::default()).unwrap();

        let mut first = serde_json::Map::new();
        first.insert("tint".to_string(), json!("#111111"));
        editor.commit_settings(&a, &first).unwrap();

        let mut second = serde_json::Map::new();
        second.insert("tint".to_string(), json!("#222222"));
        editor.commit_settings(&a, &second).unwrap();

        assert_eq!(
            editor.graph().node(&a).unwrap().node_settings["tint"],
            json!("#222222")
        );
    }

    #[test]
    fn test_commit_tag_appends_and_keeps_duplicates() {
        let mut editor = make_editor();
        let a = editor.add_node("card", Point::default()).unwrap();

        assert_eq!(editor.commit_tag(&a, "keywords", "summer").unwrap(), 1);
        assert_eq!(editor.commit_tag(&a, "keywords", "beach").unwrap(), 2);
        assert_eq!(editor.commit_tag(&a, "keywords", "summer").unwrap(), 3);

        assert_eq!(
            editor.graph().node(&a).unwrap().node_settings["keywords"],
            json!(["summer", "beach", "summer"])
        );
    }

    #[test]
    fn test_open_settings_resolves_defaults() {
        let mut editor = make_editor();
        let a = editor.add_node("card", Point::default()).unwrap();

        let (settings_schema, resolved) = editor.open_settings(&a).unwrap();

        assert_eq!(settings_schema.fields().count(), 4);
        assert_eq!(resolved["title"], json!(""));
        assert_eq!(resolved["count"], json!(1.0));
        assert_eq!(resolved["keywords"], json!([]));
    }

    #[test]
    fn test_events_reach_subscribed_sinks() {
        let mut editor = make_editor();
        let sink = Arc::new(VecEventSink::new());
        editor.subscribe(sink.clone());

        let a = editor.add_node("shape", Point::default()).unwrap();
        editor.delete_node(&a).unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BoardEvent::NodeAdded { .. }));
        assert!(matches!(events[1], BoardEvent::NodeRemoved { .. }));
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let mut editor = make_editor();
        let sink = Arc::new(VecEventSink::new());
        editor.subscribe(Arc::new(PanickingSink));
        editor.subscribe(sink.clone());

        let a = editor.add_node("shape", Point::default()).unwrap();

        // The mutation committed and later sinks still heard about it
        assert!(editor.graph().contains_node(&a));
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_revision_ignores_transient_state() {
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::default()).unwrap();
        let after_add = editor.revision();

        editor.select(&a).unwrap();
        editor.clear_selection();
        editor.select(&a).unwrap();
        assert_eq!(editor.revision(), after_add);

        editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
        editor.drag_to(Point::new(10.0, 0.0));
        assert_eq!(editor.revision(), after_add);

        editor.end_drag();
        assert_eq!(editor.revision(), after_add + 1);
    }

    #[test]
    fn test_merge_subgraph_is_additive() {
        let mut editor = make_editor();
        let existing = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let before = editor.revision();

        // Member declared before its group; membership is wired after
        let mut member = BoardNode::new(
            "merged-member",
            "shape",
            Point::new(40.0, 40.0),
            Size::new(200.0, 120.0),
        );
        member.group_id = Some("merged-group".to_string());
        let group = BoardNode::new(
            "merged-group",
            "group",
            Point::new(0.0, 0.0),
            Size::new(400.0, 300.0),
        )
        .with_group_state(GroupState::new("Merged"));
        let edge = BoardEdge::new("merged-edge", "merged-member", "out", &existing, "in");

        editor
            .merge_subgraph(vec![member, group], vec![edge])
            .unwrap();

        assert_eq!(editor.graph().node_count(), 3);
        assert_eq!(editor.graph().edge_count(), 1);
        assert_eq!(editor.graph().group_of("merged-member"), Some("merged-group"));
        assert_eq!(editor.revision(), before + 1);
    }

    #[test]
    fn test_merge_subgraph_rejects_id_collisions_atomically() {
        let mut editor = make_editor();
        let existing = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();

        let fresh = BoardNode::new("fresh", "shape", Point::default(), Size::new(10.0, 10.0));
        let clash = BoardNode::new(&existing, "shape", Point::default(), Size::new(10.0, 10.0));

        let err = editor.merge_subgraph(vec![fresh, clash], vec![]).unwrap_err();

        assert!(matches!(err, BoardError::DuplicateId(_)));
        assert_eq!(editor.graph().node_count(), 1);
    }

    #[test]
    fn test_merge_subgraph_rejects_dangling_edges_atomically() {
        let mut editor = make_editor();

        let node = BoardNode::new("fresh", "shape", Point::default(), Size::new(10.0, 10.0));
        let edge = BoardEdge::new("edge-1", "fresh", "out", "ghost", "in");

        let err = editor.merge_subgraph(vec![node], vec![edge]).unwrap_err();

        assert!(matches!(err, BoardError::DanglingReference(_)));
        assert!(editor.graph().is_empty());
    }
}
