//! Block validator: pure checks of a block's configuration and content
//! against its registry entry and block-specific business rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use validator::ValidateUrl;

use crate::block_registry::{
    BlockRegistry, ContentBlockType, EditableField, FieldType, BLOCK_ACCORDION,
    BLOCK_CALL_TO_ACTION, BLOCK_HERO, BLOCK_IMAGE, BLOCK_MAP, BLOCK_STATISTICS, BLOCK_TEAM,
};
use crate::types::JsonMap;

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
});

/// A single problem found while validating a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockViolation {
    /// Content key the problem refers to; `None` for block-level rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub rule: &'static str,
    pub message: String,
}

/// Aggregated outcome of validating one block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<BlockViolation>,
    pub warnings: Vec<BlockViolation>,
}

impl ValidationResult {
    /// All error messages joined into one line, for action responses.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<BlockViolation>,
    warnings: Vec<BlockViolation>,
}

impl Collector {
    fn error(&mut self, field: Option<&str>, rule: &'static str, message: impl Into<String>) {
        self.errors.push(BlockViolation {
            field: field.map(str::to_string),
            rule,
            message: message.into(),
        });
    }

    fn warning(&mut self, field: Option<&str>, rule: &'static str, message: impl Into<String>) {
        self.warnings.push(BlockViolation {
            field: field.map(str::to_string),
            rule,
            message: message.into(),
        });
    }

    fn finish(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Validate a block's configuration and content.
///
/// Unknown block types fail immediately with a single error. Otherwise
/// required fields, per-type structural checks and block-specific semantic
/// rules are applied in that order; all problems are collected.
pub fn validate_block(
    registry: &BlockRegistry,
    block_type: &str,
    configuration: &JsonMap,
    content: &JsonMap,
) -> ValidationResult {
    let mut out = Collector::default();

    let Some(definition) = registry.get_block_type(block_type) else {
        out.error(
            None,
            "block_type",
            format!("Unknown block type: {block_type}"),
        );
        return out.finish();
    };

    for field in &definition.editable_fields {
        let value = content.get(&field.key);
        if !is_present(value) {
            if field.required {
                out.error(
                    Some(&field.key),
                    "required",
                    format!("{} is required", field.label),
                );
            }
            continue;
        }
        if let Some(value) = value {
            check_field(field, value, &mut out);
        }
    }

    check_configuration(definition, configuration, &mut out);
    check_block_rules(definition, content, &mut out);

    out.finish()
}

/// Check only a block's configuration, for updates that leave content alone.
pub fn validate_configuration(
    registry: &BlockRegistry,
    block_type: &str,
    configuration: &JsonMap,
) -> ValidationResult {
    let mut out = Collector::default();
    match registry.get_block_type(block_type) {
        Some(definition) => check_configuration(definition, configuration, &mut out),
        None => out.error(
            None,
            "block_type",
            format!("Unknown block type: {block_type}"),
        ),
    }
    out.finish()
}

/// Whether a content value counts as provided.
///
/// `null`, blank strings and empty arrays are treated as absent.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

fn text_of<'a>(content: &'a JsonMap, key: &str) -> Option<&'a str> {
    content
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_absolute_url(raw: &str) -> bool {
    let owned = raw.trim().to_string();
    owned.validate_url()
}

fn check_field(field: &EditableField, value: &Value, out: &mut Collector) {
    let key = Some(field.key.as_str());
    match field.field_type {
        FieldType::Text | FieldType::Richtext | FieldType::Textarea => {
            let Some(s) = value.as_str() else {
                out.error(key, "type", format!("{} must be text", field.label));
                return;
            };
            let len = s.chars().count();
            if let Some(min) = field.min_length {
                if len < min {
                    out.error(
                        key,
                        "min_length",
                        format!("{} must be at least {min} characters", field.label),
                    );
                }
            }
            if let Some(max) = field.max_length {
                if len > max {
                    out.error(
                        key,
                        "max_length",
                        format!("{} must be at most {max} characters", field.label),
                    );
                }
            }
        }
        FieldType::Image => {
            if !value.is_string() {
                out.error(key, "type", format!("{} must be an image path or URL", field.label));
            }
        }
        FieldType::Color => match value.as_str() {
            Some(s) if COLOR_RE.is_match(s.trim()) => {}
            _ => out.error(
                key,
                "color",
                format!("{} must be a hex color such as #1a2b3c", field.label),
            ),
        },
        FieldType::Number => {
            let Some(n) = as_number(value) else {
                out.error(key, "type", format!("{} must be a number", field.label));
                return;
            };
            if let Some(min) = field.min {
                if n < min {
                    out.error(
                        key,
                        "min_value",
                        format!("{} must be at least {min}", field.label),
                    );
                }
            }
            if let Some(max) = field.max {
                if n > max {
                    out.error(
                        key,
                        "max_value",
                        format!("{} must be at most {max}", field.label),
                    );
                }
            }
        }
        FieldType::Select => {
            let allowed = value
                .as_str()
                .map(|s| field.options.iter().any(|o| o == s))
                .unwrap_or(false);
            if !allowed {
                out.error(
                    key,
                    "enum_values",
                    format!(
                        "{} must be one of: {}",
                        field.label,
                        field.options.join(", ")
                    ),
                );
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                out.error(key, "type", format!("{} must be true or false", field.label));
            }
        }
        FieldType::Url => match value.as_str() {
            Some(s) if is_absolute_url(s) => {}
            _ => out.error(
                key,
                "url",
                format!("{} must be a valid absolute URL", field.label),
            ),
        },
        FieldType::AccordionItems | FieldType::StatisticsItems | FieldType::TeamMembers => {
            let well_formed = value
                .as_array()
                .map(|items| items.iter().all(Value::is_object))
                .unwrap_or(false);
            if !well_formed {
                out.error(
                    key,
                    "type",
                    format!("{} must be a list of entries", field.label),
                );
            }
        }
    }
}

fn check_configuration(definition: &ContentBlockType, configuration: &JsonMap, out: &mut Collector) {
    if definition.default_config.is_empty() {
        return;
    }
    for key in configuration.keys() {
        if !definition.default_config.contains_key(key) {
            out.warning(
                Some(key),
                "unknown_config",
                format!("Unknown configuration option '{key}' for {}", definition.name),
            );
        }
    }
}

/// Entries of a composite field, ignoring anything that is not an object.
fn entries<'a>(content: &'a JsonMap, key: &str) -> Vec<&'a JsonMap> {
    content
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn entry_has(entry: &JsonMap, key: &str) -> bool {
    match entry.get(key) {
        Some(Value::Number(_)) => true,
        other => is_present(other),
    }
}

fn check_button(
    content: &JsonMap,
    label_key: &str,
    url_key: &str,
    name: &str,
    out: &mut Collector,
) {
    if text_of(content, label_key).is_some() && text_of(content, url_key).is_none() {
        out.error(
            Some(url_key),
            "button_url",
            format!("{name} requires a URL"),
        );
    }
}

fn check_block_rules(definition: &ContentBlockType, content: &JsonMap, out: &mut Collector) {
    match definition.id.as_str() {
        BLOCK_HERO => {
            check_button(content, "primaryButton", "primaryButtonUrl", "Primary button", out);
            check_button(
                content,
                "secondaryButton",
                "secondaryButtonUrl",
                "Secondary button",
                out,
            );
            if text_of(content, "primaryButton").is_none()
                && text_of(content, "secondaryButton").is_none()
            {
                out.warning(None, "cta", "Hero has no call-to-action buttons");
            }
        }
        BLOCK_STATISTICS => {
            let stats = entries(content, "stats");
            if stats.is_empty() {
                out.error(
                    Some("stats"),
                    "min_items",
                    "Statistics block must have at least one statistic",
                );
            }
            for (i, stat) in stats.iter().enumerate() {
                if !entry_has(stat, "value") || !entry_has(stat, "label") {
                    out.error(
                        Some("stats"),
                        "item_fields",
                        format!("Statistic {} must have both a value and a label", i + 1),
                    );
                }
            }
        }
        BLOCK_TEAM => {
            let members = entries(content, "members");
            if members.is_empty() {
                out.error(
                    Some("members"),
                    "min_items",
                    "Team block must have at least one member",
                );
            }
            for (i, member) in members.iter().enumerate() {
                if !entry_has(member, "name") {
                    out.error(
                        Some("members"),
                        "item_fields",
                        format!("Team member {} must have a name", i + 1),
                    );
                }
            }
        }
        BLOCK_ACCORDION => {
            let items = entries(content, "items");
            if items.is_empty() {
                out.error(
                    Some("items"),
                    "min_items",
                    "Accordion block must have at least one item",
                );
            }
            for (i, item) in items.iter().enumerate() {
                if !entry_has(item, "title") || !entry_has(item, "content") {
                    out.error(
                        Some("items"),
                        "item_fields",
                        format!("Accordion item {} must have a title and content", i + 1),
                    );
                }
            }
        }
        BLOCK_MAP => {
            let has_address = text_of(content, "address").is_some();
            let has_coordinates = is_present(content.get("latitude"))
                && is_present(content.get("longitude"));
            if !has_address && !has_coordinates {
                out.error(
                    None,
                    "location",
                    "Map block requires an address or both latitude and longitude",
                );
            }
        }
        BLOCK_IMAGE => {
            if text_of(content, "altText").is_none() {
                out.warning(
                    Some("altText"),
                    "accessibility",
                    "Image has no alt text",
                );
            }
        }
        BLOCK_CALL_TO_ACTION => {
            check_button(content, "buttonText", "buttonUrl", "Button", out);
        }
        _ => {}
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
