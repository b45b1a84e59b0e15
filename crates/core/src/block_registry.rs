//! Content block type registry.
//!
//! Describes every kind of content block the page builder knows about: its
//! editable fields, which page types it may be placed on, how many instances
//! a page may hold, and its default configuration. Page types are part of the
//! registry because block allow-lists fall back to them.
//!
//! The registry is an immutable value built once at startup
//! ([`BlockRegistry::builtin`]) and shared behind an `Arc`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::JsonMap;

/* --------------------------------------------------------------------------
   Block type ids
   -------------------------------------------------------------------------- */

pub const BLOCK_HERO: &str = "hero";
pub const BLOCK_TEXT: &str = "text";
pub const BLOCK_IMAGE: &str = "image";
pub const BLOCK_ACCORDION: &str = "accordion";
pub const BLOCK_STATISTICS: &str = "statistics";
pub const BLOCK_TEAM: &str = "team";
pub const BLOCK_MAP: &str = "map";
pub const BLOCK_CALL_TO_ACTION: &str = "call_to_action";
pub const BLOCK_CONTACT_FORM: &str = "contact_form";

/* --------------------------------------------------------------------------
   Page type ids
   -------------------------------------------------------------------------- */

pub const PAGE_LANDING: &str = "landing";
pub const PAGE_ABOUT: &str = "about";
pub const PAGE_SERVICES: &str = "services";
pub const PAGE_CONTACT: &str = "contact";
pub const PAGE_CUSTOM: &str = "custom";

/* --------------------------------------------------------------------------
   Types
   -------------------------------------------------------------------------- */

/// The editor widget / value shape of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Richtext,
    Image,
    Color,
    Number,
    Select,
    Boolean,
    Url,
    Textarea,
    /// Array of `{ title, content }` objects.
    AccordionItems,
    /// Array of `{ value, label, icon? }` objects.
    StatisticsItems,
    /// Array of `{ name, position?, photo?, bio? }` objects.
    TeamMembers,
}

impl FieldType {
    /// Whether values of this type are arrays of objects.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::AccordionItems | Self::StatisticsItems | Self::TeamMembers
        )
    }

    /// Whether values of this type are free text.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Richtext | Self::Textarea)
    }
}

/// A single editable (translatable) field of a block's content.
#[derive(Debug, Clone, Serialize)]
pub struct EditableField {
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl EditableField {
    pub fn new(key: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn max_length(self, max: usize) -> Self {
        self.length(None, Some(max))
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }
}

/// A kind of content block.
#[derive(Debug, Clone, Serialize)]
pub struct ContentBlockType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub editable_fields: Vec<EditableField>,
    /// When set, this list alone decides which page types may hold the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_page_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_instances: Option<u32>,
    pub default_config: JsonMap,
}

impl ContentBlockType {
    /// Look up an editable field by key.
    pub fn field(&self, key: &str) -> Option<&EditableField> {
        self.editable_fields.iter().find(|f| f.key == key)
    }
}

/// A kind of page and the blocks it accepts by default.
#[derive(Debug, Clone, Serialize)]
pub struct PageType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub allowed_blocks: Vec<String>,
}

/// Result of [`BlockRegistry::can_add_more_blocks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockAllowance {
    pub can_add: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/* --------------------------------------------------------------------------
   Registry
   -------------------------------------------------------------------------- */

/// Immutable catalogue of block types and page types.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    block_types: Vec<ContentBlockType>,
    page_types: Vec<PageType>,
}

impl BlockRegistry {
    pub fn new(block_types: Vec<ContentBlockType>, page_types: Vec<PageType>) -> Self {
        Self {
            block_types,
            page_types,
        }
    }

    /// The registry shipped with the application.
    pub fn builtin() -> Self {
        Self::new(builtin_block_types(), builtin_page_types())
    }

    pub fn block_types(&self) -> &[ContentBlockType] {
        &self.block_types
    }

    pub fn page_types(&self) -> &[PageType] {
        &self.page_types
    }

    pub fn get_block_type(&self, id: &str) -> Option<&ContentBlockType> {
        self.block_types.iter().find(|b| b.id == id)
    }

    pub fn get_page_type(&self, id: &str) -> Option<&PageType> {
        self.page_types.iter().find(|p| p.id == id)
    }

    /// Whether a block type may be placed on a page type.
    ///
    /// A block's own `allowed_page_types` list is authoritative when present;
    /// otherwise the page type's `allowed_blocks` list decides.
    pub fn is_block_allowed_on_page(&self, block_type_id: &str, page_type_id: &str) -> bool {
        let Some(block) = self.get_block_type(block_type_id) else {
            return false;
        };
        if let Some(ref allowed) = block.allowed_page_types {
            return allowed.iter().any(|p| p == page_type_id);
        }
        self.get_page_type(page_type_id)
            .map(|page| page.allowed_blocks.iter().any(|b| b == block_type_id))
            .unwrap_or(false)
    }

    /// All block types that may be placed on the given page type, in
    /// registry order.
    pub fn get_allowed_block_types(&self, page_type_id: &str) -> Vec<&ContentBlockType> {
        self.block_types
            .iter()
            .filter(|b| self.is_block_allowed_on_page(&b.id, page_type_id))
            .collect()
    }

    /// Whether a page already holding `current_count` blocks of this type may
    /// receive another one.
    pub fn can_add_more_blocks(&self, block_type_id: &str, current_count: u32) -> BlockAllowance {
        let Some(block) = self.get_block_type(block_type_id) else {
            return BlockAllowance {
                can_add: false,
                reason: Some("Unknown block type".to_string()),
            };
        };
        match block.max_instances {
            Some(max) if current_count >= max => BlockAllowance {
                can_add: false,
                reason: Some(format!(
                    "Maximum of {max} {} block(s) allowed per page",
                    block.name
                )),
            },
            _ => BlockAllowance {
                can_add: true,
                reason: None,
            },
        }
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/* --------------------------------------------------------------------------
   Built-in catalogue
   -------------------------------------------------------------------------- */

fn object(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

fn block(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    editable_fields: Vec<EditableField>,
    default_config: Value,
) -> ContentBlockType {
    ContentBlockType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        editable_fields,
        allowed_page_types: None,
        max_instances: None,
        default_config: object(default_config),
    }
}

fn builtin_block_types() -> Vec<ContentBlockType> {
    use FieldType::*;

    let mut hero = block(
        BLOCK_HERO,
        "Hero Banner",
        "Full-width banner with headline, background image and call-to-action buttons",
        "layout",
        vec![
            EditableField::new("title", "Title", Text).required().max_length(120),
            EditableField::new("subtitle", "Subtitle", Textarea).max_length(300),
            EditableField::new("backgroundImage", "Background Image", Image),
            EditableField::new("primaryButton", "Primary Button Label", Text).max_length(40),
            EditableField::new("primaryButtonUrl", "Primary Button URL", Url),
            EditableField::new("secondaryButton", "Secondary Button Label", Text).max_length(40),
            EditableField::new("secondaryButtonUrl", "Secondary Button URL", Url),
        ],
        json!({
            "height": "large",
            "alignment": "center",
            "overlayColor": "#000000",
            "overlayOpacity": 0.4
        }),
    );
    hero.max_instances = Some(1);

    let text = block(
        BLOCK_TEXT,
        "Rich Text",
        "Heading and formatted body text",
        "content",
        vec![
            EditableField::new("title", "Title", Text).max_length(150),
            EditableField::new("body", "Body", Richtext).required().max_length(20_000),
            EditableField::new("alignment", "Alignment", Select)
                .options(&["left", "center", "right", "justify"]),
        ],
        json!({ "width": "normal", "backgroundColor": "#ffffff" }),
    );

    let image = block(
        BLOCK_IMAGE,
        "Image",
        "Single image with caption and optional link",
        "media",
        vec![
            EditableField::new("image", "Image", Image).required(),
            EditableField::new("altText", "Alt Text", Text).max_length(200),
            EditableField::new("caption", "Caption", Text).max_length(300),
            EditableField::new("link", "Link", Url),
        ],
        json!({ "size": "medium", "rounded": false }),
    );

    let accordion = block(
        BLOCK_ACCORDION,
        "Accordion",
        "Collapsible question and answer list",
        "content",
        vec![
            EditableField::new("title", "Title", Text).max_length(150),
            EditableField::new("items", "Items", AccordionItems).required(),
        ],
        json!({ "allowMultipleOpen": false, "defaultOpenIndex": null }),
    );

    let statistics = block(
        BLOCK_STATISTICS,
        "Statistics",
        "Row of highlighted figures with labels",
        "content",
        vec![
            EditableField::new("title", "Title", Text).max_length(150),
            EditableField::new("stats", "Statistics", StatisticsItems).required(),
        ],
        json!({ "columns": 4, "animateNumbers": true }),
    );

    let mut team = block(
        BLOCK_TEAM,
        "Team Members",
        "Grid of people with photo, position and short bio",
        "content",
        vec![
            EditableField::new("title", "Title", Text).max_length(150),
            EditableField::new("description", "Description", Textarea).max_length(500),
            EditableField::new("members", "Members", TeamMembers).required(),
        ],
        json!({ "columns": 3, "showBio": true }),
    );
    team.allowed_page_types = Some(vec![PAGE_ABOUT.to_string(), PAGE_CUSTOM.to_string()]);

    let map = block(
        BLOCK_MAP,
        "Map",
        "Embedded map pinned to an address or coordinates",
        "media",
        vec![
            EditableField::new("title", "Title", Text).max_length(150),
            EditableField::new("address", "Address", Textarea).max_length(500),
            EditableField::new("latitude", "Latitude", Number).range(-90.0, 90.0),
            EditableField::new("longitude", "Longitude", Number).range(-180.0, 180.0),
            EditableField::new("zoom", "Zoom", Number).range(1.0, 20.0),
            EditableField::new("showDirections", "Show Directions Link", Boolean),
        ],
        json!({ "height": 400, "mapStyle": "roadmap" }),
    );

    let call_to_action = block(
        BLOCK_CALL_TO_ACTION,
        "Call to Action",
        "Highlighted prompt with a single action button",
        "layout",
        vec![
            EditableField::new("title", "Title", Text).required().max_length(150),
            EditableField::new("description", "Description", Textarea).max_length(500),
            EditableField::new("buttonText", "Button Text", Text).max_length(40),
            EditableField::new("buttonUrl", "Button URL", Url),
            EditableField::new("backgroundColor", "Background Color", Color),
        ],
        json!({ "style": "primary", "fullWidth": true }),
    );

    let mut contact_form = block(
        BLOCK_CONTACT_FORM,
        "Contact Form",
        "Enquiry form delivered to the constituency office",
        "forms",
        vec![
            EditableField::new("title", "Title", Text).required().max_length(150),
            EditableField::new("description", "Description", Textarea).max_length(500),
            EditableField::new("submitLabel", "Submit Button Label", Text).max_length(40),
            EditableField::new("successMessage", "Success Message", Textarea).max_length(300),
        ],
        json!({ "recipientEmail": null, "showPhoneField": true }),
    );
    contact_form.allowed_page_types =
        Some(vec![PAGE_CONTACT.to_string(), PAGE_CUSTOM.to_string()]);
    contact_form.max_instances = Some(1);

    vec![
        hero,
        text,
        image,
        accordion,
        statistics,
        team,
        map,
        call_to_action,
        contact_form,
    ]
}

fn page_type(id: &str, name: &str, description: &str, allowed: &[&str]) -> PageType {
    PageType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        allowed_blocks: allowed.iter().map(|b| b.to_string()).collect(),
    }
}

fn builtin_page_types() -> Vec<PageType> {
    vec![
        page_type(
            PAGE_LANDING,
            "Landing Page",
            "Public home page of the constituency",
            &[
                BLOCK_HERO,
                BLOCK_TEXT,
                BLOCK_IMAGE,
                BLOCK_STATISTICS,
                BLOCK_CALL_TO_ACTION,
                BLOCK_ACCORDION,
            ],
        ),
        page_type(
            PAGE_ABOUT,
            "About Page",
            "Background of the representative and the office",
            &[BLOCK_HERO, BLOCK_TEXT, BLOCK_IMAGE, BLOCK_STATISTICS],
        ),
        page_type(
            PAGE_SERVICES,
            "Services Page",
            "Programmes and aid offered to residents",
            &[
                BLOCK_HERO,
                BLOCK_TEXT,
                BLOCK_IMAGE,
                BLOCK_ACCORDION,
                BLOCK_CALL_TO_ACTION,
            ],
        ),
        page_type(
            PAGE_CONTACT,
            "Contact Page",
            "Office location and enquiry channels",
            &[BLOCK_HERO, BLOCK_TEXT, BLOCK_MAP],
        ),
        page_type(
            PAGE_CUSTOM,
            "Custom Page",
            "Free-form page accepting every block type",
            &[
                BLOCK_HERO,
                BLOCK_TEXT,
                BLOCK_IMAGE,
                BLOCK_ACCORDION,
                BLOCK_STATISTICS,
                BLOCK_MAP,
                BLOCK_CALL_TO_ACTION,
            ],
        ),
    ]
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_by_id() {
        let registry = BlockRegistry::builtin();
        let hero = registry.get_block_type(BLOCK_HERO).unwrap();
        assert_eq!(hero.name, "Hero Banner");
        assert!(hero.field("title").unwrap().required);
        assert!(registry.get_block_type("carousel").is_none());
    }

    #[test]
    fn page_type_allow_list_is_used_without_block_override() {
        let registry = BlockRegistry::builtin();
        assert!(registry.is_block_allowed_on_page(BLOCK_MAP, PAGE_CONTACT));
        assert!(!registry.is_block_allowed_on_page(BLOCK_MAP, PAGE_LANDING));
    }

    #[test]
    fn block_allow_list_overrides_page_type() {
        let registry = BlockRegistry::builtin();
        // `team` is not in the custom page's allowed_blocks but declares it.
        assert!(registry.is_block_allowed_on_page(BLOCK_TEAM, PAGE_CUSTOM));
        assert!(registry.is_block_allowed_on_page(BLOCK_TEAM, PAGE_ABOUT));
        // The landing page does not list team, and team does not list landing.
        assert!(!registry.is_block_allowed_on_page(BLOCK_TEAM, PAGE_LANDING));
        // Contact form opts out of services even though it is not listed there.
        assert!(!registry.is_block_allowed_on_page(BLOCK_CONTACT_FORM, PAGE_SERVICES));
    }

    #[test]
    fn unknown_ids_are_not_allowed() {
        let registry = BlockRegistry::builtin();
        assert!(!registry.is_block_allowed_on_page("carousel", PAGE_CUSTOM));
        assert!(!registry.is_block_allowed_on_page(BLOCK_TEXT, "blog"));
    }

    #[test]
    fn allowed_block_types_for_contact_page() {
        let registry = BlockRegistry::builtin();
        let ids: Vec<&str> = registry
            .get_allowed_block_types(PAGE_CONTACT)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec![BLOCK_HERO, BLOCK_TEXT, BLOCK_MAP, BLOCK_CONTACT_FORM]);
    }

    #[test]
    fn max_instances_limits_additions() {
        let registry = BlockRegistry::builtin();
        assert!(registry.can_add_more_blocks(BLOCK_HERO, 0).can_add);

        let blocked = registry.can_add_more_blocks(BLOCK_HERO, 1);
        assert!(!blocked.can_add);
        assert!(blocked.reason.unwrap().contains("Maximum of 1"));

        // No cap on text blocks.
        assert!(registry.can_add_more_blocks(BLOCK_TEXT, 50).can_add);
    }

    #[test]
    fn unknown_block_cannot_be_added() {
        let registry = BlockRegistry::builtin();
        let result = registry.can_add_more_blocks("carousel", 0);
        assert!(!result.can_add);
        assert_eq!(result.reason.as_deref(), Some("Unknown block type"));
    }

    #[test]
    fn every_page_type_lists_known_blocks() {
        let registry = BlockRegistry::builtin();
        for page in registry.page_types() {
            for block_id in &page.allowed_blocks {
                assert!(
                    registry.get_block_type(block_id).is_some(),
                    "page type {} lists unknown block {block_id}",
                    page.id
                );
            }
        }
    }

    #[test]
    fn field_type_serializes_snake_case() {
        let json = serde_json::to_string(&FieldType::StatisticsItems).unwrap();
        assert_eq!(json, "\"statistics_items\"");
    }
}
