//! Generator node execution seam
//!
//! Generator nodes carry schema settings and produce an output value
//! consumable by downstream edges. The board core knows nothing about
//! models; the actual invocation lives behind [`GenerationBackend`],
//! which receives the node's fully resolved settings plus the outputs
//! of its upstream nodes. Applying the result uses the same defensive
//! path as asset loading, since the node can be deleted while the
//! backend call is in flight.

use async_trait::async_trait;
use board_engine::{BoardEditor, NodeId, NodePatch};
use board_nodes::generators;
use serde_json::Value;

use crate::error::Result;

/// Pluggable model invocation
///
/// Implementations may call a local runtime, a remote API, or a canned
/// stub. Prompt construction and response parsing are the backend's
/// business; the workspace only routes resolved settings in and an
/// output value out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &'static str;

    /// Produce an output from resolved settings and upstream outputs
    async fn invoke(
        &self,
        settings: &serde_json::Map<String, Value>,
        upstream: &[Value],
    ) -> Result<Value>;
}

/// Captured inputs for one generator invocation
///
/// Prepared synchronously from the live graph so the editor borrow is
/// released before the backend call awaits.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Target generator node
    pub node_id: NodeId,
    /// The node's settings, resolved against its type's schema
    pub settings: serde_json::Map<String, Value>,
    /// Upstream outputs in incoming-edge order
    pub upstream: Vec<Value>,
}

impl GenerationRequest {
    /// Invoke a backend with this request's inputs
    pub async fn invoke(&self, backend: &dyn GenerationBackend) -> Result<Value> {
        log::debug!(
            "Invoking {} for node {} ({} upstream value(s))",
            backend.name(),
            self.node_id,
            self.upstream.len()
        );
        backend.invoke(&self.settings, &self.upstream).await
    }
}

/// Snapshot a generator node's inputs
///
/// Settings resolve through the node type's schema, so every field gets
/// a value. Upstream nodes contribute their `output` data entry when
/// they have one; nodes that have produced nothing yet are skipped.
pub fn prepare_generation(editor: &BoardEditor, node_id: &str) -> Result<GenerationRequest> {
    let (_, settings) = editor.open_settings(node_id)?;
    let graph = editor.graph();
    let upstream = graph
        .incoming_edges(node_id)
        .filter_map(|edge| graph.node(&edge.source))
        .filter_map(|source| source.data.get(generators::OUTPUT).cloned())
        .collect();
    Ok(GenerationRequest {
        node_id: node_id.to_string(),
        settings,
        upstream,
    })
}

/// Write a generator output back onto its node, tolerating deletion
///
/// A node deleted while its invocation ran gets a logged no-op, never
/// an error and never a write against a reused id.
pub fn apply_generator_output(
    editor: &mut BoardEditor,
    node_id: &str,
    output: Value,
) -> Result<()> {
    if editor.graph().node(node_id).is_none() {
        log::info!(
            "Discarding generator output: node {} no longer exists",
            node_id
        );
        return Ok(());
    }
    editor.update_node(node_id, NodePatch::data_entry(generators::OUTPUT, output))?;
    Ok(())
}

/// Run one generator node end to end
///
/// Convenience wrapper over prepare, invoke, and apply. Returns the
/// output so callers can surface it without re-reading the node.
pub async fn run_generator(
    editor: &mut BoardEditor,
    backend: &dyn GenerationBackend,
    node_id: &str,
) -> Result<Value> {
    let request = prepare_generation(editor, node_id)?;
    let output = request.invoke(backend).await?;
    apply_generator_output(editor, node_id, output.clone())?;
    Ok(output)
}
