//! Built-in catalog assembly
//!
//! The palette order lives here, explicitly. `from_inventory` discovers
//! the same descriptors at link time but in whatever order the linker
//! produced, so hosts that care about ordering build from this catalog.

use board_engine::{NodeTypeDescriptor, NodeTypeRegistry};

use crate::{extras, generators, marketplace, primitives, refinement, signals, system};

/// Every built-in descriptor, in palette order
pub fn builtin_descriptors() -> Vec<NodeTypeDescriptor> {
    vec![
        primitives::shape_descriptor(),
        primitives::text_descriptor(),
        primitives::image_descriptor(),
        primitives::group_descriptor(),
        generators::content_generator_descriptor(),
        generators::image_generator_descriptor(),
        signals::trigger_descriptor(),
        signals::schedule_descriptor(),
        system::router_descriptor(),
        system::merge_descriptor(),
        refinement::image_filter_descriptor(),
        refinement::tone_refiner_descriptor(),
        extras::sticky_note_descriptor(),
        marketplace::summarizer_descriptor(),
        marketplace::translator_descriptor(),
        marketplace::social_post_descriptor(),
        marketplace::webhook_descriptor(),
        marketplace::email_digest_descriptor(),
    ]
}

/// A registry preloaded with the built-in catalog
pub fn builtin_registry() -> NodeTypeRegistry {
    NodeTypeRegistry::with_catalog(builtin_descriptors())
}
