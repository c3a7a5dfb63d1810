//! Signal node types
//!
//! Signals start pipelines: manual triggers and recurring schedules.

use board_engine::schema::{SchemaSection, SelectOption, SettingsField, SettingsSchema};
use board_engine::{DescriptorFn, NodeCategory, NodeTypeDescriptor};
use serde_json::json;

/// Manual trigger that kicks off downstream nodes
pub fn trigger_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("trigger", "Trigger", NodeCategory::Signal)
        .with_description("Fires downstream nodes on demand")
        .with_icon("zap")
        .preinstalled()
        .with_default_size(160.0, 80.0)
        .with_min_size(120.0, 60.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("behavior", "Behavior")
                    .with_field(
                        SettingsField::select(
                            "mode",
                            "Mode",
                            vec![
                                SelectOption::new("manual", "Manual"),
                                SelectOption::new("on-load", "On board load"),
                            ],
                        )
                        .with_default(json!("manual")),
                    )
                    .with_field(SettingsField::toggle("enabled", "Enabled").with_default(json!(true))),
            ),
        )
}

/// Recurring schedule trigger
pub fn schedule_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::new("schedule", "Schedule", NodeCategory::Signal)
        .with_description("Fires downstream nodes on a recurring schedule")
        .with_icon("clock")
        .preinstalled()
        .with_default_size(180.0, 100.0)
        .with_min_size(140.0, 70.0)
        .with_settings(
            SettingsSchema::new().with_section(
                SchemaSection::new("timing", "Timing")
                    .with_field(
                        SettingsField::text("cron", "Cron expression")
                            .with_placeholder("0 9 * * MON"),
                    )
                    .with_field(SettingsField::toggle("enabled", "Enabled").with_default(json!(true))),
            ),
        )
}

inventory::submit!(DescriptorFn(trigger_descriptor));
inventory::submit!(DescriptorFn(schedule_descriptor));
