//! Image asset loading
//!
//! Image nodes reference their content through a `src` data entry holding
//! a base64 data URL. Loading is asynchronous (file read plus MIME sniff)
//! and the result is applied back through the normal update path. The
//! node may have been deleted while the load was in flight, so the apply
//! step checks it still exists and silently discards the asset otherwise.
//! A stale asset must never error out and never resurrect a deleted id.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use board_engine::{BoardEditor, NodePatch};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// MIME type recorded when sniffing fails
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A loaded image ready to attach to an image node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    /// Base64 data URL for the node's `src` entry
    pub src: String,
    /// Sniffed MIME type
    pub mime: String,
    /// Raw file size in bytes
    pub byte_len: usize,
}

/// Read an image file and encode it as a data URL
///
/// The MIME type is sniffed from the file's magic bytes; unrecognized
/// content falls back to [`FALLBACK_MIME`] rather than failing.
pub async fn load_image_asset(path: impl AsRef<Path>) -> Result<ImageAsset> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let mime = infer::get(&bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());
    let src = format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(&bytes));
    log::debug!(
        "Loaded asset {:?} ({} byte(s), {})",
        path,
        bytes.len(),
        mime
    );
    Ok(ImageAsset {
        src,
        mime,
        byte_len: bytes.len(),
    })
}

/// Attach a loaded asset to a node, tolerating its deletion
///
/// If the node disappeared while the asset was loading the call is a
/// logged no-op. An existing node gets the asset merged into its data
/// entries; locked nodes accept data updates, so this cannot fail on a
/// node that exists.
pub fn apply_image_asset(
    editor: &mut BoardEditor,
    node_id: &str,
    asset: ImageAsset,
) -> Result<()> {
    if editor.graph().node(node_id).is_none() {
        log::info!(
            "Discarding loaded asset: node {} no longer exists",
            node_id
        );
        return Ok(());
    }

    let mut data = serde_json::Map::new();
    data.insert(
        board_nodes::primitives::IMAGE_SRC.to_string(),
        serde_json::Value::String(asset.src),
    );
    data.insert(
        board_nodes::primitives::IMAGE_MIME.to_string(),
        serde_json::Value::String(asset.mime),
    );
    editor.update_node(
        node_id,
        NodePatch {
            data: Some(data),
            ..Default::default()
        },
    )?;
    Ok(())
}
