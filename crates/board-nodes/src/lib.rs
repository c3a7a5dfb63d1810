//! Board Nodes
//!
//! Node type descriptors for the MoodBoard canvas. Each descriptor
//! declares one palette entry: identity, category, sizing, dispatch
//! behavior and the settings schema its nodes expose.
//!
//! # Categories
//!
//! - **Primitives**: Core visual elements (shapes, text, images, groups)
//! - **Generators**: Content and image generation
//! - **Signals**: Trigger and schedule sources
//! - **System**: Routing and merging between nodes
//! - **Refinement**: Filters and tone adjustment
//! - **Extras**: Preinstalled niceties like sticky notes
//! - **Marketplace**: Optional types that start uninstalled

pub mod catalog;
pub mod extras;
pub mod generators;
pub mod marketplace;
pub mod primitives;
pub mod refinement;
pub mod signals;
pub mod system;

// Re-export all descriptors for convenience
pub use catalog::{builtin_descriptors, builtin_registry};
pub use extras::*;
pub use generators::*;
pub use marketplace::*;
pub use primitives::*;
pub use refinement::*;
pub use signals::*;
pub use system::*;
