//! Refinement node types
//!
//! Post-processing stages applied to generated or imported content.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Visual filter applied to an upstream image
pub fn image_filter_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("image-filter", "Image Filter", NodeCategory::Refinement)
        .with_description("Applies a visual filter to an upstream image")
        .with_icon("sliders")
        .preinstalled()
        .with_default_size(220.0, 160.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("filter", "Filter")
                    .with_field(
                        SettingsField::select(
                            "filter",
                            "Filter",
                            vec![
                                SelectOption::new("none", "None"),
                                SelectOption::new("grayscale", "Grayscale"),
                                SelectOption::new("sepia", "Sepia"),
                                SelectOption::new("vivid", "Vivid"),
                            ],
                        )
                        .with_default(json!("none")),
                    )
                    .with_field(
                        SettingsField::range("intensity", "Intensity", 0.0, 1.0, 0.05)
                            .with_default(json!(1.0)),
                    ),
            ),
        )
}

/// Rewrites upstream copy in a target tone
pub fn tone_refiner_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("tone-refiner", "Tone Refiner", NodeCategory::Refinement)
        .with_description("Rewrites upstream copy in a chosen tone")
        .with_icon("feather")
        .preinstalled()
        .with_default_size(240.0, 160.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("tone", "Tone")
                    .with_field(
                        SettingsField::select(
                            "target",
                            "Target tone",
                            vec![
                                SelectOption::new("warm", "Warm"),
                                SelectOption::new("direct", "Direct"),
                                SelectOption::new("leisurely", "Leisurely"),
                            ],
                        )
                        .with_default(json!("warm")),
                    )
                    .with_field(
                        SettingsField::range("strength", "Strength", 0.0, 1.0, 0.1)
                            .with_default(json!(0.5)),
                    )
                    .with_field(SettingsField::toggle("keepLength", "Preserve length")),
            ),
        )
}

inventory::submit!(DescriptorFn(image_filter_descriptor));
inventory::submit!(DescriptorFn(tone_refiner_descriptor));
