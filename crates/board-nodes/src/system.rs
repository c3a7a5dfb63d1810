//! System node types
//!
//! Routing and merging infrastructure between pipeline stages.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, DispatchMode, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Round-robin router
///
/// Hands each produced value to one outgoing edge at a time, cycling in
/// connection order. Edges from a router back to itself are rejected.
pub fn router_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("router", "Router", NodeCategory::System)
        .with_description("Cycles output across outgoing connections")
        .with_icon("shuffle")
        .preinstalled()
        .with_default_size(160.0, 80.0)
        .with_min_size(120.0, 60.0)
        .with_dispatch(DispatchMode::RoundRobin)
        .forbid_self_loops()
}

/// Merge node combining several upstream values
pub fn merge_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("merge", "Merge", NodeCategory::System)
        .with_description("Combines upstream outputs into one value")
        .with_icon("git-merge")
        .preinstalled()
        .with_default_size(160.0, 80.0)
        .with_min_size(120.0, 60.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("merge", "Merge")
                    .with_field(
                        SettingsField::select(
                            "strategy",
                            "Strategy",
                            vec![
                                SelectOption::new("concat", "Concatenate"),
                                SelectOption::new("collect", "Collect as list"),
                            ],
                        )
                        .with_default(json!("concat")),
                    )
                    .with_field(
                        SettingsField::text("separator", "Separator").with_default(json!("\n")),
                    ),
            ),
        )
}

inventory::submit!(DescriptorFn(router_descriptor));
inventory::submit!(DescriptorFn(merge_descriptor));
