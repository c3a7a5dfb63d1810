//! Core canvas primitives
//!
//! The four node types every board ships with: shapes, text, images,
//! and groups. All of them are core types, so they are preinstalled and
//! protected from uninstall.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeTypeDescriptor};
use serde_json::json;

/// Data key holding an image node's source (data URL or remote URL)
pub const IMAGE_SRC: &str = "src";
/// Data key holding an image node's MIME type
pub const IMAGE_MIME: &str = "mime";

/// Vector shape with fill and corner styling
pub fn shape_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::core("shape", "Shape")
        .with_description("Rectangle, ellipse, or diamond block")
        .with_icon("square")
        .with_default_size(200.0, 120.0)
        .with_min_size(40.0, 40.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("appearance", "Appearance")
                    .with_field(
                        SettingsField::select(
                            "kind",
                            "Kind",
                            vec![
                                SelectOption::new("rectangle", "Rectangle"),
                                SelectOption::new("ellipse", "Ellipse"),
                                SelectOption::new("diamond", "Diamond"),
                            ],
                        )
                        .with_default(json!("rectangle")),
                    )
                    .with_field(SettingsField::color("fill", "Fill").with_default(json!("#e2e8f0")))
                    .with_field(
                        SettingsField::range("cornerRadius", "Corner radius", 0.0, 48.0, 1.0)
                            .with_default(json!(8.0)),
                    )
                    .with_field(SettingsField::toggle("shadow", "Drop shadow")),
            ),
        )
}

/// Free-standing text block
pub fn text_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::core("text", "Text")
        .with_description("Editable text block")
        .with_icon("type")
        .with_default_size(240.0, 80.0)
        .with_min_size(60.0, 32.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("content", "Content")
                    .with_field(
                        SettingsField::textarea("body", "Body")
                            .with_placeholder("Write something..."),
                    )
                    .with_field(
                        SettingsField::number("fontSize", "Font size")
                            .with_bounds(8.0, 96.0)
                            .with_step(1.0)
                            .with_default(json!(16.0)),
                    )
                    .with_field(
                        SettingsField::select(
                            "align",
                            "Alignment",
                            vec![
                                SelectOption::new("left", "Left"),
                                SelectOption::new("center", "Center"),
                                SelectOption::new("right", "Right"),
                            ],
                        )
                        .with_default(json!("left")),
                    )
                    .with_field(
                        SettingsField::color("textColor", "Text color")
                            .with_default(json!("#0f172a")),
                    ),
            ),
        )
}

/// Image card; the source lands in node data once an asset loads
pub fn image_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::core("image", "Image")
        .with_description("Image card with fit and tagging options")
        .with_icon("image")
        .with_default_size(320.0, 240.0)
        .with_min_size(60.0, 60.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("display", "Display")
                    .with_field(
                        SettingsField::text("alt", "Alt text")
                            .with_placeholder("Describe the image"),
                    )
                    .with_field(SettingsField::toggle("cover", "Cover fit").with_default(json!(true)))
                    .with_field(
                        SettingsField::range("opacity", "Opacity", 0.0, 1.0, 0.05)
                            .with_default(json!(1.0)),
                    )
                    .with_field(SettingsField::tags("keywords", "Keywords")),
            ),
        )
}

/// Group container; label and color live in the group state, so the
/// settings panel has nothing to add
pub fn group_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::core("group", "Group")
        .with_description("Container that frames related nodes")
        .with_icon("folder")
        .with_default_size(400.0, 300.0)
        .with_min_size(120.0, 48.0)
}

inventory::submit!(DescriptorFn(shape_descriptor));
inventory::submit!(DescriptorFn(text_descriptor));
inventory::submit!(DescriptorFn(image_descriptor));
inventory::submit!(DescriptorFn(group_descriptor));
