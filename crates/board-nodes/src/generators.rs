//! AI generation node types
//!
//! Generator nodes carry prompts and style controls in their settings;
//! the actual model invocation happens behind the workspace's
//! generation backend, which resolves these schemas before calling out.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Settings key for a generator's prompt
pub const PROMPT: &str = "prompt";
/// Settings key for the content generator's tone
pub const TONE: &str = "tone";
/// Settings key for the content generator's creativity slider
pub const CREATIVITY: &str = "creativity";
/// Settings key for the content generator's word budget
pub const MAX_WORDS: &str = "maxWords";
/// Settings key for the image generator's aspect ratio
pub const ASPECT: &str = "aspect";
/// Data key holding a generator node's latest output
pub const OUTPUT: &str = "output";

/// Text/content generation node
pub fn content_generator_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("content-generator", "Content Generator", NodeCategory::AiGen)
        .with_description("Generates copy from a prompt and upstream context")
        .with_icon("sparkles")
        .preinstalled()
        .with_default_size(280.0, 200.0)
        .with_min_size(200.0, 120.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("generation", "Generation")
                    .with_field(
                        SettingsField::textarea(PROMPT, "Prompt")
                            .with_placeholder("What should this node write?"),
                    )
                    .with_field(
                        SettingsField::select(
                            TONE,
                            "Tone",
                            vec![
                                SelectOption::new("neutral", "Neutral"),
                                SelectOption::new("playful", "Playful"),
                                SelectOption::new("formal", "Formal"),
                            ],
                        )
                        .with_default(json!("neutral")),
                    )
                    .with_field(
                        SettingsField::range(CREATIVITY, "Creativity", 0.0, 1.0, 0.05)
                            .with_default(json!(0.7)),
                    )
                    .with_field(
                        SettingsField::number(MAX_WORDS, "Max words")
                            .with_bounds(10.0, 2000.0)
                            .with_step(10.0)
                            .with_default(json!(200.0)),
                    )
                    .with_field(SettingsField::tags("styleKeywords", "Style keywords")),
            ),
        )
}

/// Image generation node
pub fn image_generator_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("image-generator", "Image Generator", NodeCategory::AiGen)
        .with_description("Generates imagery from a prompt")
        .with_icon("wand")
        .preinstalled()
        .with_default_size(320.0, 280.0)
        .with_min_size(200.0, 160.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("generation", "Generation")
                    .with_field(
                        SettingsField::textarea(PROMPT, "Prompt")
                            .with_placeholder("Describe the image"),
                    )
                    .with_field(
                        SettingsField::select(
                            ASPECT,
                            "Aspect ratio",
                            vec![
                                SelectOption::new("1:1", "Square"),
                                SelectOption::new("16:9", "Wide"),
                                SelectOption::new("9:16", "Tall"),
                            ],
                        )
                        .with_default(json!("1:1")),
                    )
                    .with_field(
                        SettingsField::number("variants", "Variants")
                            .with_bounds(1.0, 4.0)
                            .with_step(1.0)
                            .with_default(json!(1.0)),
                    )
                    .with_field(SettingsField::toggle("highDetail", "High detail")),
            ),
        )
}

inventory::submit!(DescriptorFn(content_generator_descriptor));
inventory::submit!(DescriptorFn(image_generator_descriptor));
