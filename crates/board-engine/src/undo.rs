//! Undo/redo over compressed board snapshots
//!
//! Whole-graph snapshots, zstd-compressed, instead of a command pattern:
//! there is no inverse operation to maintain per mutation, and a board
//! full of base64 image payloads compresses well. The stack holds a
//! cursor into the snapshot list; undo and redo move the cursor and
//! decompress, pushes truncate the redo tail.

use std::collections::VecDeque;

use crate::constants;
use crate::error::{BoardError, Result};
use crate::graph::BoardGraph;

/// zstd level used for snapshot compression
const COMPRESSION_LEVEL: i32 = 3;

/// Undo/redo stack of compressed board snapshots
pub struct UndoStack {
    /// Compressed graph states, oldest first
    frames: VecDeque<Vec<u8>>,
    /// Cursor into `frames`
    cursor: usize,
    /// Maximum number of snapshots kept; oldest are trimmed
    capacity: usize,
}

impl UndoStack {
    /// Create a stack holding at most `capacity` snapshots
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Push a snapshot, truncating any redo tail
    pub fn push(&mut self, graph: &BoardGraph) -> Result<()> {
        let compressed = compress(graph)?;
        self.push_compressed(compressed);
        Ok(())
    }

    /// Push a snapshot only if the graph differs from the cursor frame
    ///
    /// Lets callers checkpoint after every interaction event without
    /// flooding the stack with identical states. Returns whether a
    /// snapshot was recorded.
    pub fn push_if_changed(&mut self, graph: &BoardGraph) -> Result<bool> {
        let compressed = compress(graph)?;
        // zstd is deterministic for a given input and level, so equal
        // frames mean equal graphs
        if let Some(current) = self.frames.get(self.cursor) {
            if *current == compressed {
                return Ok(false);
            }
        }
        self.push_compressed(compressed);
        Ok(true)
    }

    fn push_compressed(&mut self, compressed: Vec<u8>) {
        while self.frames.len() > self.cursor + 1 {
            self.frames.pop_back();
        }

        self.frames.push_back(compressed);
        self.cursor = self.frames.len() - 1;

        while self.frames.len() > self.capacity {
            self.frames.pop_front();
            if self.cursor > 0 {
                self.cursor -= 1;
            }
        }
    }

    /// Move back one snapshot and return it, or None at the beginning
    pub fn undo(&mut self) -> Option<Result<BoardGraph>> {
        if self.cursor > 0 {
            self.cursor -= 1;
            Some(self.decompress(self.cursor))
        } else {
            None
        }
    }

    /// Move forward one snapshot and return it, or None at the end
    pub fn redo(&mut self) -> Option<Result<BoardGraph>> {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
            Some(self.decompress(self.cursor))
        } else {
            None
        }
    }

    /// The snapshot under the cursor, without moving it
    pub fn current(&self) -> Option<Result<BoardGraph>> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.decompress(self.cursor))
        }
    }

    /// Whether undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.frames.len()
    }

    /// Number of snapshots held
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack holds no snapshots
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every snapshot
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }

    /// Total compressed bytes held
    pub fn compressed_size(&self) -> usize {
        self.frames.iter().map(|f| f.len()).sum()
    }

    fn decompress(&self, index: usize) -> Result<BoardGraph> {
        let compressed = &self.frames[index];
        let json = zstd::decode_all(&compressed[..])
            .map_err(|e| BoardError::Compression(e.to_string()))?;
        let graph: BoardGraph = serde_json::from_slice(&json)?;
        Ok(graph)
    }
}

fn compress(graph: &BoardGraph) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(graph)?;
    zstd::encode_all(&json[..], COMPRESSION_LEVEL)
        .map_err(|e| BoardError::Compression(e.to_string()))
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(constants::history::DEFAULT_CAPACITY)
    }
}
