//! Extra convenience node types

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Sticky note annotation
pub fn sticky_note_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("sticky-note", "Sticky Note", NodeCategory::Extras)
        .with_description("Quick annotation pinned to the canvas")
        .with_icon("sticky-note")
        .preinstalled()
        .with_default_size(180.0, 180.0)
        .with_min_size(100.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("note", "Note")
                    .with_field(
                        SettingsField::textarea("body", "Note").with_placeholder("Jot it down"),
                    )
                    .with_field(
                        SettingsField::color("paper", "Paper color").with_default(json!("#fef08a")),
                    )
                    .with_field(
                        SettingsField::select(
                            "font",
                            "Handwriting",
                            vec![
                                SelectOption::new("casual", "Casual"),
                                SelectOption::new("marker", "Marker"),
                            ],
                        )
                        .with_default(json!("casual")),
                    ),
            ),
        )
}

inventory::submit!(DescriptorFn(sticky_note_descriptor));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_note_defaults() {
        let descriptor = sticky_note_descriptor();
        assert_eq!(descriptor.category, NodeCategory::Extras);

        let resolved = descriptor.settings.resolve(&serde_json::Map::new());
        assert_eq!(resolved["paper"], json!("#fef08a"));
        assert_eq!(resolved["body"], json!(""));
    }
}
