//! Input validation for page layouts, content blocks and versions.
//!
//! These checks run before any database access so malformed requests are
//! rejected with a [`CoreError::Validation`].

use std::sync::LazyLock;

use regex::Regex;

use crate::block_registry::BlockRegistry;
use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Admin listing path revalidated after every page-builder mutation.
pub const ADMIN_PAGES_PATH: &str = "/admin/pages";

/// Default age after which unpublished versions are eligible for cleanup.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

pub const MAX_PAGE_NAME_LENGTH: usize = 200;
pub const MAX_ROUTE_LENGTH: usize = 255;
pub const MAX_BLOCK_KEY_LENGTH: usize = 100;

static BLOCK_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("block key regex is valid")
});

static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("locale regex is valid")
});

/* --------------------------------------------------------------------------
Validators
-------------------------------------------------------------------------- */

/// Reject non-positive identifiers, e.g. "Invalid page ID".
pub fn validate_id(id: DbId, entity: &str) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation(format!("Invalid {entity} ID")));
    }
    Ok(())
}

pub fn validate_page_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Page name is required".into()));
    }
    if name.chars().count() > MAX_PAGE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Page name must be at most {MAX_PAGE_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A route is an absolute path: leading `/`, no whitespace.
pub fn validate_route(route: &str) -> Result<(), CoreError> {
    if route.trim().is_empty() {
        return Err(CoreError::Validation("Route is required".into()));
    }
    if !route.starts_with('/') {
        return Err(CoreError::Validation("Route must start with \"/\"".into()));
    }
    if route.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Route must not contain whitespace".into(),
        ));
    }
    if route.len() > MAX_ROUTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Route must be at most {MAX_ROUTE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_page_type(registry: &BlockRegistry, page_type: &str) -> Result<(), CoreError> {
    if page_type.trim().is_empty() {
        return Err(CoreError::Validation("Page type is required".into()));
    }
    if registry.get_page_type(page_type).is_none() {
        return Err(CoreError::Validation(format!(
            "Invalid page type: {page_type}"
        )));
    }
    Ok(())
}

pub fn validate_block_key(block_key: &str) -> Result<(), CoreError> {
    if block_key.trim().is_empty() {
        return Err(CoreError::Validation("Block key is required".into()));
    }
    if block_key.len() > MAX_BLOCK_KEY_LENGTH || !BLOCK_KEY_RE.is_match(block_key) {
        return Err(CoreError::Validation(format!(
            "Invalid block key '{block_key}': use letters, digits, '-' or '_' \
             (at most {MAX_BLOCK_KEY_LENGTH} characters)"
        )));
    }
    Ok(())
}

/// Locale tags look like `en`, `ms` or `zh-Hans`.
pub fn validate_locale(locale: &str) -> Result<(), CoreError> {
    if !LOCALE_RE.is_match(locale) {
        return Err(CoreError::Validation(format!("Invalid locale: '{locale}'")));
    }
    Ok(())
}

pub fn validate_retention_days(days: i64) -> Result<(), CoreError> {
    if days < 1 {
        return Err(CoreError::Validation(
            "Retention period must be at least 1 day".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: CoreError) -> String {
        match err {
            CoreError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(validate_id(1, "page").is_ok());
        assert_eq!(message(validate_id(0, "page").unwrap_err()), "Invalid page ID");
        assert_eq!(
            message(validate_id(-4, "version").unwrap_err()),
            "Invalid version ID"
        );
    }

    #[test]
    fn page_name_rules() {
        assert!(validate_page_name("About us").is_ok());
        assert!(validate_page_name("   ").is_err());
        assert!(validate_page_name(&"x".repeat(201)).is_err());
        assert!(validate_page_name(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn route_rules() {
        assert!(validate_route("/").is_ok());
        assert!(validate_route("/about/team").is_ok());
        assert!(validate_route("").is_err());
        assert_eq!(
            message(validate_route("about").unwrap_err()),
            "Route must start with \"/\""
        );
        assert_eq!(
            message(validate_route("/about us").unwrap_err()),
            "Route must not contain whitespace"
        );
        assert!(validate_route(&format!("/{}", "a".repeat(255))).is_err());
    }

    #[test]
    fn page_type_must_be_registered() {
        let registry = BlockRegistry::builtin();
        assert!(validate_page_type(&registry, "landing").is_ok());
        assert!(validate_page_type(&registry, "").is_err());
        assert_eq!(
            message(validate_page_type(&registry, "blog").unwrap_err()),
            "Invalid page type: blog"
        );
    }

    #[test]
    fn block_key_rules() {
        assert!(validate_block_key("hero-1").is_ok());
        assert!(validate_block_key("intro_text").is_ok());
        assert!(validate_block_key("").is_err());
        assert!(validate_block_key("-hero").is_err());
        assert!(validate_block_key("hero 1").is_err());
        assert!(validate_block_key(&"k".repeat(101)).is_err());
    }

    #[test]
    fn locale_rules() {
        for ok in ["en", "ms", "zh", "zh-Hans", "en-GB"] {
            assert!(validate_locale(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "EN", "e", "en_GB", "english"] {
            assert!(validate_locale(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn retention_days_at_least_one() {
        assert!(validate_retention_days(DEFAULT_RETENTION_DAYS).is_ok());
        assert!(validate_retention_days(1).is_ok());
        assert!(validate_retention_days(0).is_err());
        assert!(validate_retention_days(-7).is_err());
    }
}
