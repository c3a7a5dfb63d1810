//! Declarative settings schemas for node types
//!
//! Every node type describes its settings panel as data: sections of
//! typed fields with defaults and constraints. The engine resolves a
//! node's sparse settings bag against the schema (absent keys fall back
//! to defaults) and validates individual edits. Validation failures are
//! ordinary values ([`FieldRejection`]), not errors; the caller feeds
//! them back to the form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One option of a select field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    /// The stored value
    pub value: String,
    /// Human-readable label
    pub label: String,
}

impl SelectOption {
    /// Create an option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The kind of a settings field, with per-kind constraints
///
/// Serialized with a `type` tag so the frontend can switch on it
/// exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line text
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Multi-line text
    Textarea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Free numeric input, optionally bounded
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// Bounded slider
    Range { min: f64, max: f64, step: f64 },
    /// One value out of a fixed option list
    Select { options: Vec<SelectOption> },
    /// Boolean switch
    Toggle,
    /// Color string; no format is enforced
    Color,
    /// Free-form string list; duplicates are allowed
    Tags,
    /// String-to-string map
    KeyValue,
    /// Code editor payload
    Code { language: String },
}

/// A single settings field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsField {
    /// Key in the node's settings bag
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Field kind and constraints
    pub kind: FieldKind,
    /// Declared default; when absent the kind's fallback applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl SettingsField {
    fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            default_value: None,
        }
    }

    /// Create a single-line text field
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Text { placeholder: None })
    }

    /// Create a multi-line text field
    pub fn textarea(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Textarea { placeholder: None })
    }

    /// Create an unbounded number field
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            key,
            label,
            FieldKind::Number {
                min: None,
                max: None,
                step: None,
            },
        )
    }

    /// Create a bounded slider field
    pub fn range(
        key: impl Into<String>,
        label: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self::new(key, label, FieldKind::Range { min, max, step })
    }

    /// Create a select field
    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(key, label, FieldKind::Select { options })
    }

    /// Create a toggle field
    pub fn toggle(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Toggle)
    }

    /// Create a color field
    pub fn color(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Color)
    }

    /// Create a tags field
    pub fn tags(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Tags)
    }

    /// Create a key/value map field
    pub fn key_value(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::KeyValue)
    }

    /// Create a code field
    pub fn code(
        key: impl Into<String>,
        label: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::new(
            key,
            label,
            FieldKind::Code {
                language: language.into(),
            },
        )
    }

    /// Declare the default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the placeholder on a text or textarea field
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            FieldKind::Text { placeholder } | FieldKind::Textarea { placeholder } => {
                *placeholder = Some(text.into());
            }
            _ => {}
        }
        self
    }

    /// Set the bounds on a number field
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        if let FieldKind::Number { min, max, .. } = &mut self.kind {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    /// Set the step on a number field
    pub fn with_step(mut self, value: f64) -> Self {
        if let FieldKind::Number { step, .. } = &mut self.kind {
            *step = Some(value);
        }
        self
    }

    /// The value this field resolves to when the bag has no entry
    pub fn effective_default(&self) -> Value {
        if let Some(default) = &self.default_value {
            return default.clone();
        }
        match &self.kind {
            FieldKind::Text { .. }
            | FieldKind::Textarea { .. }
            | FieldKind::Color
            | FieldKind::Code { .. } => Value::String(String::new()),
            FieldKind::Number { min, .. } => json_number(min.unwrap_or(0.0)),
            FieldKind::Range { min, .. } => json_number(*min),
            FieldKind::Select { options } => Value::String(
                options
                    .first()
                    .map(|o| o.value.clone())
                    .unwrap_or_default(),
            ),
            FieldKind::Toggle => Value::Bool(false),
            FieldKind::Tags => Value::Array(Vec::new()),
            FieldKind::KeyValue => Value::Object(serde_json::Map::new()),
        }
    }

    /// Validate a raw edit against this field
    ///
    /// Returns the value to store on acceptance. Numbers clamp to their
    /// declared bounds; numeric strings are parsed. A rejection is a
    /// value for the form to display, not an error.
    pub fn validate(&self, raw: &Value) -> Result<Value, FieldRejection> {
        match &self.kind {
            FieldKind::Text { .. }
            | FieldKind::Textarea { .. }
            | FieldKind::Color
            | FieldKind::Code { .. } => match raw {
                Value::String(_) => Ok(raw.clone()),
                _ => Err(self.reject(RejectionReason::NotText)),
            },
            FieldKind::Number { min, max, .. } => {
                let number = parse_numeric(raw)
                    .ok_or_else(|| self.reject(RejectionReason::NotNumeric))?;
                let clamped = match (min, max) {
                    (Some(lo), Some(hi)) => number.clamp(*lo, *hi),
                    _ => number,
                };
                Ok(json_number(clamped))
            }
            FieldKind::Range { min, max, .. } => {
                let number = parse_numeric(raw)
                    .ok_or_else(|| self.reject(RejectionReason::NotNumeric))?;
                Ok(json_number(number.clamp(*min, *max)))
            }
            FieldKind::Select { options } => match raw {
                Value::String(value) if options.iter().any(|o| &o.value == value) => {
                    Ok(raw.clone())
                }
                _ => Err(self.reject(RejectionReason::UnknownOption {
                    allowed: options.iter().map(|o| o.value.clone()).collect(),
                })),
            },
            FieldKind::Toggle => match raw {
                Value::Bool(_) => Ok(raw.clone()),
                _ => Err(self.reject(RejectionReason::NotBoolean)),
            },
            FieldKind::Tags => match raw {
                Value::Array(items) if items.iter().all(|i| i.is_string()) => Ok(raw.clone()),
                _ => Err(self.reject(RejectionReason::NotStringList)),
            },
            FieldKind::KeyValue => match raw {
                Value::Object(map) if map.values().all(|v| v.is_string()) => Ok(raw.clone()),
                _ => Err(self.reject(RejectionReason::NotStringMap)),
            },
        }
    }

    fn reject(&self, reason: RejectionReason) -> FieldRejection {
        FieldRejection {
            field: self.key.clone(),
            reason,
        }
    }
}

/// A titled group of fields in the settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSection {
    /// Section identifier
    pub id: String,
    /// Section title
    pub label: String,
    /// Fields in display order
    pub fields: Vec<SettingsField>,
}

impl SchemaSection {
    /// Create an empty section
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: SettingsField) -> Self {
        self.fields.push(field);
        self
    }
}

/// The full settings panel description for a node type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSchema {
    /// Sections in display order
    pub sections: Vec<SchemaSection>,
}

impl SettingsSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section
    pub fn with_section(mut self, section: SchemaSection) -> Self {
        self.sections.push(section);
        self
    }

    /// All fields across sections, in display order
    pub fn fields(&self) -> impl Iterator<Item = &SettingsField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Find a field by key
    pub fn field(&self, key: &str) -> Option<&SettingsField> {
        self.fields().find(|f| f.key == key)
    }

    /// Resolve a sparse settings bag into a complete value map
    ///
    /// Every schema field gets an entry: the stored value when present,
    /// the field's default otherwise. Unknown bag keys are ignored.
    pub fn resolve(
        &self,
        bag: &serde_json::Map<String, Value>,
    ) -> serde_json::Map<String, Value> {
        let mut resolved = serde_json::Map::new();
        for field in self.fields() {
            let value = bag
                .get(&field.key)
                .cloned()
                .unwrap_or_else(|| field.effective_default());
            resolved.insert(field.key.clone(), value);
        }
        resolved
    }
}

/// Append a tag to a tags field in the bag
///
/// Tags only land on explicit commit, and duplicates are kept: the list
/// is what the user built, element by element. Returns the new count.
pub fn commit_tag(
    bag: &mut serde_json::Map<String, Value>,
    field_key: &str,
    tag: impl Into<String>,
) -> usize {
    let entry = bag
        .entry(field_key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    if let Value::Array(items) = entry {
        items.push(Value::String(tag.into()));
        items.len()
    } else {
        0
    }
}

/// A rejected settings edit, fed back to the form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRejection {
    /// Key of the offending field
    pub field: String,
    /// Why the edit was rejected
    pub reason: RejectionReason,
}

impl fmt::Display for FieldRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.reason)
    }
}

/// Why a settings edit was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RejectionReason {
    /// Value could not be read as a number
    NotNumeric,
    /// Value must be a string
    NotText,
    /// Value must be a boolean
    NotBoolean,
    /// Value must be an array of strings
    NotStringList,
    /// Value must be an object with string values
    NotStringMap,
    /// Value is not one of the declared options
    UnknownOption { allowed: Vec<String> },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric => write!(f, "expected a number"),
            Self::NotText => write!(f, "expected text"),
            Self::NotBoolean => write!(f, "expected a boolean"),
            Self::NotStringList => write!(f, "expected a list of strings"),
            Self::NotStringMap => write!(f, "expected a map of strings"),
            Self::UnknownOption { allowed } => {
                write!(f, "expected one of: {}", allowed.join(", "))
            }
        }
    }
}

fn parse_numeric(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_schema() -> SettingsSchema {
        SettingsSchema::new().with_section(
            SchemaSection::new("general", "General")
                .with_field(SettingsField::text("title", "Title"))
                .with_field(SettingsField::textarea("notes", "Notes"))
                .with_field(SettingsField::number("count", "Count").with_bounds(1.0, 10.0))
                .with_field(SettingsField::range("opacity", "Opacity", 0.0, 1.0, 0.05))
                .with_field(SettingsField::select(
                    "mode",
                    "Mode",
                    vec![
                        SelectOption::new("fast", "Fast"),
                        SelectOption::new("quality", "Quality"),
                    ],
                ))
                .with_field(SettingsField::toggle("enabled", "Enabled"))
                .with_field(SettingsField::color("tint", "Tint"))
                .with_field(SettingsField::tags("keywords", "Keywords"))
                .with_field(SettingsField::key_value("headers", "Headers"))
                .with_field(SettingsField::code("script", "Script", "javascript")),
        )
    }

    #[test]
    fn test_resolve_fills_defaults_for_every_kind() {
        let schema = full_schema();
        let resolved = schema.resolve(&serde_json::Map::new());

        assert_eq!(resolved["title"], json!(""));
        assert_eq!(resolved["notes"], json!(""));
        assert_eq!(resolved["count"], json!(1.0));
        assert_eq!(resolved["opacity"], json!(0.0));
        assert_eq!(resolved["mode"], json!("fast"));
        assert_eq!(resolved["enabled"], json!(false));
        assert_eq!(resolved["tint"], json!(""));
        assert_eq!(resolved["keywords"], json!([]));
        assert_eq!(resolved["headers"], json!({}));
        assert_eq!(resolved["script"], json!(""));
    }

    #[test]
    fn test_resolve_prefers_stored_values() {
        let schema = full_schema();
        let mut bag = serde_json::Map::new();
        bag.insert("title".to_string(), json!("Campaign"));
        bag.insert("enabled".to_string(), json!(true));

        let resolved = schema.resolve(&bag);
        assert_eq!(resolved["title"], json!("Campaign"));
        assert_eq!(resolved["enabled"], json!(true));
        // Untouched fields still resolve to defaults
        assert_eq!(resolved["mode"], json!("fast"));
    }

    #[test]
    fn test_declared_default_wins_over_fallback() {
        let field = SettingsField::toggle("visible", "Visible").with_default(json!(true));
        assert_eq!(field.effective_default(), json!(true));
    }

    #[test]
    fn test_number_validation() {
        let field = SettingsField::number("count", "Count").with_bounds(1.0, 10.0);

        assert_eq!(field.validate(&json!(5)).unwrap(), json!(5.0));
        // Numeric strings parse
        assert_eq!(field.validate(&json!("7.5")).unwrap(), json!(7.5));
        // Out-of-bounds values clamp
        assert_eq!(field.validate(&json!(99)).unwrap(), json!(10.0));
        assert_eq!(field.validate(&json!(-3)).unwrap(), json!(1.0));

        let rejection = field.validate(&json!("lots")).unwrap_err();
        assert_eq!(rejection.field, "count");
        assert_eq!(rejection.reason, RejectionReason::NotNumeric);
    }

    #[test]
    fn test_unbounded_number_does_not_clamp() {
        let field = SettingsField::number("offset", "Offset");
        assert_eq!(field.validate(&json!(-5000)).unwrap(), json!(-5000.0));
    }

    #[test]
    fn test_range_clamps_to_declared_bounds() {
        let field = SettingsField::range("opacity", "Opacity", 0.0, 1.0, 0.05);
        assert_eq!(field.validate(&json!(1.7)).unwrap(), json!(1.0));
        assert_eq!(field.validate(&json!(-0.2)).unwrap(), json!(0.0));
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let field = SettingsField::select(
            "mode",
            "Mode",
            vec![SelectOption::new("fast", "Fast")],
        );

        assert!(field.validate(&json!("fast")).is_ok());
        let rejection = field.validate(&json!("turbo")).unwrap_err();
        assert!(matches!(
            rejection.reason,
            RejectionReason::UnknownOption { .. }
        ));
    }

    #[test]
    fn test_toggle_requires_boolean() {
        let field = SettingsField::toggle("enabled", "Enabled");
        assert!(field.validate(&json!(true)).is_ok());
        assert!(field.validate(&json!("true")).is_err());
    }

    #[test]
    fn test_tags_commit_keeps_duplicates() {
        let mut bag = serde_json::Map::new();
        commit_tag(&mut bag, "keywords", "summer");
        commit_tag(&mut bag, "keywords", "beach");
        let count = commit_tag(&mut bag, "keywords", "summer");

        assert_eq!(count, 3);
        assert_eq!(bag["keywords"], json!(["summer", "beach", "summer"]));
    }

    #[test]
    fn test_color_accepts_any_string() {
        let field = SettingsField::color("tint", "Tint");
        // No format enforcement; the last writer simply wins in the bag
        assert!(field.validate(&json!("#fff")).is_ok());
        assert!(field.validate(&json!("tomato")).is_ok());
        assert!(field.validate(&json!("not a color at all")).is_ok());
        assert!(field.validate(&json!(42)).is_err());
    }

    #[test]
    fn test_key_value_requires_string_map() {
        let field = SettingsField::key_value("headers", "Headers");
        assert!(field.validate(&json!({"a": "1"})).is_ok());
        assert!(field.validate(&json!({"a": 1})).is_err());
        assert!(field.validate(&json!(["a"])).is_err());
    }

    #[test]
    fn test_field_kind_serde_tagging() {
        let field = SettingsField::key_value("headers", "Headers");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"]["type"], "key-value");

        let range = SettingsField::range("opacity", "Opacity", 0.0, 1.0, 0.05);
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json["kind"]["type"], "range");
        assert_eq!(json["kind"]["min"], 0.0);
    }
}
