//! Marketplace module node types
//!
//! None of these are installed out of the box; the module service
//! activates them at runtime. Uninstalling one later never touches
//! nodes already placed on a board.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Condenses upstream text to a target length
pub fn summarizer_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("summarizer", "Summarizer", NodeCategory::TextProcessing)
        .with_description("Condenses upstream text")
        .with_icon("align-left")
        .with_default_size(240.0, 160.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("summary", "Summary")
                    .with_field(
                        SettingsField::number("targetWords", "Target words")
                            .with_bounds(10.0, 500.0)
                            .with_step(10.0)
                            .with_default(json!(50.0)),
                    )
                    .with_field(
                        SettingsField::select(
                            "format",
                            "Format",
                            vec![
                                SelectOption::new("paragraph", "Paragraph"),
                                SelectOption::new("bullets", "Bullet points"),
                            ],
                        )
                        .with_default(json!("paragraph")),
                    ),
            ),
        )
}

/// Translates upstream text into a target language
pub fn translator_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("translator", "Translator", NodeCategory::TextProcessing)
        .with_description("Translates upstream text")
        .with_icon("languages")
        .with_default_size(240.0, 160.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("translation", "Translation")
                    .with_field(
                        SettingsField::select(
                            "language",
                            "Target language",
                            vec![
                                SelectOption::new("es", "Spanish"),
                                SelectOption::new("fr", "French"),
                                SelectOption::new("de", "German"),
                                SelectOption::new("ja", "Japanese"),
                            ],
                        )
                        .with_default(json!("es")),
                    )
                    .with_field(SettingsField::toggle("formal", "Formal register")),
            ),
        )
}

/// Drafts a social media post from upstream content
pub fn social_post_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("social-post", "Social Post", NodeCategory::SocialMedia)
        .with_description("Drafts a post for a target platform")
        .with_icon("megaphone")
        .with_default_size(260.0, 200.0)
        .with_min_size(180.0, 120.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("post", "Post")
                    .with_field(
                        SettingsField::select(
                            "platform",
                            "Platform",
                            vec![
                                SelectOption::new("instagram", "Instagram"),
                                SelectOption::new("x", "X"),
                                SelectOption::new("linkedin", "LinkedIn"),
                            ],
                        )
                        .with_default(json!("instagram")),
                    )
                    .with_field(SettingsField::tags("hashtags", "Hashtags"))
                    .with_field(
                        SettingsField::number("variants", "Variants")
                            .with_bounds(1.0, 5.0)
                            .with_step(1.0)
                            .with_default(json!(1.0)),
                    ),
            ),
        )
}

/// Posts pipeline output to an external HTTP endpoint
pub fn webhook_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("webhook", "Webhook", NodeCategory::Integrations)
        .with_description("Sends pipeline output to an HTTP endpoint")
        .with_icon("globe")
        .with_default_size(240.0, 180.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("request", "Request")
                    .with_field(
                        SettingsField::text("url", "URL")
                            .with_placeholder("https://example.com/hook"),
                    )
                    .with_field(
                        SettingsField::select(
                            "method",
                            "Method",
                            vec![
                                SelectOption::new("POST", "POST"),
                                SelectOption::new("PUT", "PUT"),
                            ],
                        )
                        .with_default(json!("POST")),
                    )
                    .with_field(SettingsField::key_value("headers", "Headers"))
                    .with_field(
                        SettingsField::code("template", "Payload template", "json")
                            .with_default(json!("{\"content\": \"{{output}}\"}")),
                    ),
            ),
        )
}

/// Collects pipeline output into a recurring email digest
pub fn email_digest_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("email-digest", "Email Digest", NodeCategory::Integrations)
        .with_description("Collects output into a recurring email")
        .with_icon("mail")
        .with_default_size(240.0, 180.0)
        .with_min_size(160.0, 100.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("digest", "Digest")
                    .with_field(
                        SettingsField::text("subject", "Subject")
                            .with_default(json!("Board digest")),
                    )
                    .with_field(SettingsField::textarea("intro", "Intro text"))
                    .with_field(
                        SettingsField::select(
                            "frequency",
                            "Frequency",
                            vec![
                                SelectOption::new("daily", "Daily"),
                                SelectOption::new("weekly", "Weekly"),
                            ],
                        )
                        .with_default(json!("weekly")),
                    )
                    .with_field(SettingsField::toggle("includeImages", "Include images")),
            ),
        )
}

inventory::submit!(DescriptorFn(summarizer_descriptor));
inventory::submit!(DescriptorFn(translator_descriptor));
inventory::submit!(DescriptorFn(social_post_descriptor));
inventory::submit!(DescriptorFn(webhook_descriptor));
inventory::submit!(DescriptorFn(email_digest_descriptor));
