//! Block template catalogue (named configuration/content/styling presets).
//!
//! Templates are read-only reference data. Applying a template copies its
//! maps; customizing shallow-merges caller overrides on top.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::block_registry::{
    BLOCK_ACCORDION, BLOCK_CALL_TO_ACTION, BLOCK_CONTACT_FORM, BLOCK_HERO, BLOCK_IMAGE, BLOCK_MAP,
    BLOCK_STATISTICS, BLOCK_TEAM, BLOCK_TEXT,
};
use crate::types::JsonMap;

/// Category preferred by [`TemplateCatalog::get_default_template`].
pub const CATEGORY_BASIC: &str = "basic";
pub const CATEGORY_MODERN: &str = "modern";
pub const CATEGORY_MINIMAL: &str = "minimal";
pub const CATEGORY_CORPORATE: &str = "corporate";

/// A named preset for one block type.
#[derive(Debug, Clone, Serialize)]
pub struct BlockTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub block_type: String,
    pub category: String,
    pub configuration: JsonMap,
    pub content: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<JsonMap>,
}

/// The maps produced by applying (and optionally customizing) a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedTemplate {
    pub configuration: JsonMap,
    pub content: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<JsonMap>,
}

/// Caller-supplied overrides for [`TemplateCatalog::customize_template`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateOverrides {
    pub configuration: Option<JsonMap>,
    pub content: Option<JsonMap>,
    pub styling: Option<JsonMap>,
}

/// Shallow merge: every key of `overrides` replaces the same key of `base`.
fn shallow_merge(base: &JsonMap, overrides: Option<&JsonMap>) -> JsonMap {
    let mut merged = base.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Immutable catalogue of block templates.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<BlockTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<BlockTemplate>) -> Self {
        Self { templates }
    }

    /// The catalogue shipped with the application.
    pub fn builtin() -> Self {
        Self::new(builtin_templates())
    }

    pub fn templates(&self) -> &[BlockTemplate] {
        &self.templates
    }

    pub fn get_template(&self, id: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn get_templates_for_block_type(&self, block_type: &str) -> Vec<&BlockTemplate> {
        self.templates
            .iter()
            .filter(|t| t.block_type == block_type)
            .collect()
    }

    pub fn get_templates_by_category(&self, category: &str) -> Vec<&BlockTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Copy a template's maps, or `None` for an unknown id.
    pub fn apply_template(&self, id: &str) -> Option<AppliedTemplate> {
        self.get_template(id).map(|t| AppliedTemplate {
            configuration: t.configuration.clone(),
            content: t.content.clone(),
            styling: t.styling.clone(),
        })
    }

    /// Apply a template with overrides shallow-merged onto each map.
    ///
    /// Nested objects in overrides replace the base value wholesale.
    pub fn customize_template(
        &self,
        id: &str,
        overrides: &TemplateOverrides,
    ) -> Option<AppliedTemplate> {
        let template = self.get_template(id)?;
        let styling = match (&template.styling, &overrides.styling) {
            (Some(base), over) => Some(shallow_merge(base, over.as_ref())),
            (None, Some(over)) => Some(over.clone()),
            (None, None) => None,
        };
        Some(AppliedTemplate {
            configuration: shallow_merge(&template.configuration, overrides.configuration.as_ref()),
            content: shallow_merge(&template.content, overrides.content.as_ref()),
            styling,
        })
    }

    /// The `basic` template for a block type, else its first template.
    pub fn get_default_template(&self, block_type: &str) -> Option<&BlockTemplate> {
        let candidates = self.get_templates_for_block_type(block_type);
        candidates
            .iter()
            .find(|t| t.category == CATEGORY_BASIC)
            .or_else(|| candidates.first())
            .copied()
    }
}

impl Default for TemplateCatalog {
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

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    description: &str,
    block_type: &str,
    category: &str,
    configuration: Value,
    content: Value,
    styling: Option<Value>,
) -> BlockTemplate {
    BlockTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        block_type: block_type.to_string(),
        category: category.to_string(),
        configuration: object(configuration),
        content: object(content),
        styling: styling.map(object),
    }
}

fn builtin_templates() -> Vec<BlockTemplate> {
    vec![
        template(
            "hero-basic",
            "Basic Hero",
            "Centered headline with a single action button",
            BLOCK_HERO,
            CATEGORY_BASIC,
            json!({ "height": "large", "alignment": "center", "overlayOpacity": 0.4 }),
            json!({
                "title": "Welcome to Our Constituency",
                "subtitle": "Serving the community together",
                "primaryButton": "Learn More",
                "primaryButtonUrl": "https://example.gov.my/about"
            }),
            None,
        ),
        template(
            "hero-split-image",
            "Split Hero",
            "Headline on the left, image on the right, two buttons",
            BLOCK_HERO,
            CATEGORY_MODERN,
            json!({ "height": "medium", "alignment": "left", "overlayOpacity": 0.0 }),
            json!({
                "title": "Building a Better Future",
                "subtitle": "Programmes and aid for every household",
                "backgroundImage": "/images/hero/community.jpg",
                "primaryButton": "Apply for Aid",
                "primaryButtonUrl": "https://example.gov.my/aid",
                "secondaryButton": "Contact Us",
                "secondaryButtonUrl": "https://example.gov.my/contact"
            }),
            Some(json!({
                "titleColor": "#ffffff",
                "buttonStyle": { "radius": "lg", "variant": "solid" }
            })),
        ),
        template(
            "text-basic",
            "Basic Text",
            "Heading with a paragraph of body text",
            BLOCK_TEXT,
            CATEGORY_BASIC,
            json!({ "width": "normal" }),
            json!({
                "title": "About the Office",
                "body": "<p>The constituency office serves residents every weekday.</p>",
                "alignment": "left"
            }),
            None,
        ),
        template(
            "text-centered-minimal",
            "Centered Statement",
            "Short centered statement without a heading",
            BLOCK_TEXT,
            CATEGORY_MINIMAL,
            json!({ "width": "narrow", "backgroundColor": "#f8fafc" }),
            json!({
                "body": "<p>Together we build a caring community.</p>",
                "alignment": "center"
            }),
            Some(json!({ "fontSize": "xl" })),
        ),
        template(
            "image-captioned",
            "Captioned Image",
            "Medium image with caption and alt text",
            BLOCK_IMAGE,
            CATEGORY_BASIC,
            json!({ "size": "medium", "rounded": true }),
            json!({
                "image": "/images/placeholder.jpg",
                "altText": "Community event",
                "caption": "Community gathering"
            }),
            None,
        ),
        template(
            "faq-basic",
            "Frequently Asked Questions",
            "Accordion with common resident questions",
            BLOCK_ACCORDION,
            CATEGORY_BASIC,
            json!({ "allowMultipleOpen": false }),
            json!({
                "title": "Frequently Asked Questions",
                "items": [
                    { "title": "How do I apply for aid?", "content": "Submit an application at the office or online." },
                    { "title": "What are the office hours?", "content": "Monday to Friday, 9am to 5pm." }
                ]
            }),
            None,
        ),
        template(
            "stats-basic",
            "Key Figures",
            "Four headline statistics",
            BLOCK_STATISTICS,
            CATEGORY_BASIC,
            json!({ "columns": 4, "animateNumbers": true }),
            json!({
                "title": "Our Impact",
                "stats": [
                    { "value": "12,000+", "label": "Registered Households" },
                    { "value": "3,500", "label": "Aid Recipients" },
                    { "value": "45", "label": "Community Programmes" },
                    { "value": "98%", "label": "Cases Resolved" }
                ]
            }),
            None,
        ),
        template(
            "stats-corporate",
            "Annual Report Figures",
            "Three statistics with icons on a dark band",
            BLOCK_STATISTICS,
            CATEGORY_CORPORATE,
            json!({ "columns": 3, "animateNumbers": false }),
            json!({
                "stats": [
                    { "value": "RM 2.4M", "label": "Aid Distributed", "icon": "hand-coins" },
                    { "value": "18", "label": "Villages Covered", "icon": "map" },
                    { "value": "60", "label": "Volunteers", "icon": "users" }
                ]
            }),
            Some(json!({ "background": "#0f172a", "textColor": "#f8fafc" })),
        ),
        template(
            "team-grid",
            "Team Grid",
            "Three-column grid of office staff",
            BLOCK_TEAM,
            CATEGORY_BASIC,
            json!({ "columns": 3, "showBio": true }),
            json!({
                "title": "Our Team",
                "members": [
                    { "name": "Team Member", "position": "Constituency Officer", "photo": "/images/avatar.png" }
                ]
            }),
            None,
        ),
        template(
            "map-office",
            "Office Location",
            "Map pinned to the service centre address",
            BLOCK_MAP,
            CATEGORY_BASIC,
            json!({ "height": 400, "mapStyle": "roadmap" }),
            json!({
                "title": "Visit Us",
                "address": "Pusat Khidmat Masyarakat",
                "zoom": 15,
                "showDirections": true
            }),
            None,
        ),
        template(
            "cta-banner",
            "Action Banner",
            "Full-width colored band with one button",
            BLOCK_CALL_TO_ACTION,
            CATEGORY_BASIC,
            json!({ "style": "primary", "fullWidth": true }),
            json!({
                "title": "Need Assistance?",
                "description": "Our officers are ready to help.",
                "buttonText": "Get in Touch",
                "buttonUrl": "https://example.gov.my/contact",
                "backgroundColor": "#1d4ed8"
            }),
            None,
        ),
        template(
            "contact-simple",
            "Simple Enquiry Form",
            "Contact form with a short introduction",
            BLOCK_CONTACT_FORM,
            CATEGORY_BASIC,
            json!({ "showPhoneField": true }),
            json!({
                "title": "Send Us a Message",
                "description": "We reply within two working days.",
                "submitLabel": "Send",
                "successMessage": "Thank you, your message has been received."
            }),
            None,
        ),
    ]
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_registry::BlockRegistry;
    use crate::block_validation::validate_block;

    fn map(value: Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn templates_for_block_type() {
        let catalog = TemplateCatalog::builtin();
        let ids: Vec<&str> = catalog
            .get_templates_for_block_type(BLOCK_HERO)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["hero-basic", "hero-split-image"]);
        assert!(catalog.get_templates_for_block_type("carousel").is_empty());
    }

    #[test]
    fn apply_unknown_template_returns_none() {
        let catalog = TemplateCatalog::builtin();
        assert!(catalog.apply_template("nope").is_none());
        assert!(catalog
            .customize_template("nope", &TemplateOverrides::default())
            .is_none());
    }

    #[test]
    fn apply_copies_all_maps() {
        let catalog = TemplateCatalog::builtin();
        let applied = catalog.apply_template("hero-split-image").unwrap();
        assert_eq!(applied.content["title"], "Building a Better Future");
        assert_eq!(applied.configuration["alignment"], "left");
        assert!(applied.styling.is_some());
    }

    #[test]
    fn customize_is_a_shallow_merge() {
        let catalog = TemplateCatalog::builtin();
        let overrides = TemplateOverrides {
            configuration: Some(map(json!({ "height": "small" }))),
            content: Some(map(json!({ "title": "Selamat Datang" }))),
            styling: Some(map(json!({ "buttonStyle": { "variant": "outline" } }))),
        };
        let result = catalog
            .customize_template("hero-split-image", &overrides)
            .unwrap();

        // Overridden keys replaced, others kept.
        assert_eq!(result.configuration["height"], "small");
        assert_eq!(result.configuration["alignment"], "left");
        assert_eq!(result.content["title"], "Selamat Datang");
        assert_eq!(result.content["primaryButton"], "Apply for Aid");

        // Nested override replaces the whole base object.
        let styling = result.styling.unwrap();
        assert_eq!(styling["buttonStyle"], json!({ "variant": "outline" }));
        assert_eq!(styling["titleColor"], "#ffffff");
    }

    #[test]
    fn customize_does_not_mutate_catalogue() {
        let catalog = TemplateCatalog::builtin();
        let overrides = TemplateOverrides {
            content: Some(map(json!({ "title": "Changed" }))),
            ..Default::default()
        };
        catalog.customize_template("hero-basic", &overrides).unwrap();
        let original = catalog.get_template("hero-basic").unwrap();
        assert_eq!(original.content["title"], "Welcome to Our Constituency");
    }

    #[test]
    fn styling_override_without_base_styling() {
        let catalog = TemplateCatalog::builtin();
        let overrides = TemplateOverrides {
            styling: Some(map(json!({ "padding": "lg" }))),
            ..Default::default()
        };
        let result = catalog.customize_template("hero-basic", &overrides).unwrap();
        assert_eq!(result.styling, Some(map(json!({ "padding": "lg" }))));

        let plain = catalog
            .customize_template("hero-basic", &TemplateOverrides::default())
            .unwrap();
        assert!(plain.styling.is_none());
    }

    #[test]
    fn default_template_prefers_basic() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(
            catalog.get_default_template(BLOCK_STATISTICS).unwrap().id,
            "stats-basic"
        );
        assert!(catalog.get_default_template("carousel").is_none());
    }

    #[test]
    fn default_template_falls_back_to_first() {
        let catalog = TemplateCatalog::new(vec![
            template("a", "A", "", BLOCK_TEXT, CATEGORY_MODERN, json!({}), json!({}), None),
            template("b", "B", "", BLOCK_TEXT, CATEGORY_MINIMAL, json!({}), json!({}), None),
        ]);
        assert_eq!(catalog.get_default_template(BLOCK_TEXT).unwrap().id, "a");
    }

    #[test]
    fn lookup_by_category() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.get_templates_by_category(CATEGORY_CORPORATE).len(), 1);
    }

    #[test]
    fn every_builtin_template_is_valid_for_its_block_type() {
        let registry = BlockRegistry::builtin();
        let catalog = TemplateCatalog::builtin();
        for t in catalog.templates() {
            let result = validate_block(&registry, &t.block_type, &t.configuration, &t.content);
            assert!(
                result.is_valid,
                "template {} is invalid: {:?}",
                t.id, result.errors
            );
            assert!(
                result.warnings.iter().all(|w| w.rule != "unknown_config"),
                "template {} uses unknown configuration: {:?}",
                t.id,
                result.warnings
            );
        }
    }
}
