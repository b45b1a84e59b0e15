//! Page layout model and DTOs.

use pagebuilder_core::snapshot::{ContentBlockWithTranslations, PageLayoutData};
use pagebuilder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `page_layouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageLayout {
    pub id: DbId,
    pub name: String,
    pub page_type: String,
    pub route: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PageLayout> for PageLayoutData {
    fn from(row: PageLayout) -> Self {
        Self {
            id: row.id,
            name: row.name,
            page_type: row.page_type,
            route: row.route,
            title: row.title,
            description: row.description,
            is_active: row.is_active,
            is_published: row.is_published,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for creating a page. New pages always start unpublished.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageLayout {
    pub name: String,
    pub page_type: String,
    pub route: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for a partial layout update. `None` leaves the column untouched.
///
/// `title` and `description` are nullable: `Some(None)` (JSON `null`) clears
/// them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePageLayout {
    pub name: Option<String>,
    pub page_type: Option<String>,
    pub route: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Map a field that is present in the body to `Some`, even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request body for duplicating a page under a new route.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicatePage {
    pub new_route: String,
    pub new_name: Option<String>,
}

/// A layout with its blocks in render order, as served to the editor and
/// the public site.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithBlocks {
    #[serde(flatten)]
    pub layout: PageLayout,
    pub blocks: Vec<ContentBlockWithTranslations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clears_and_absent_keeps_nullable_fields() {
        let body: UpdatePageLayout =
            serde_json::from_str(r#"{"title": null, "name": "About"}"#).unwrap();
        assert_eq!(body.title, Some(None));
        assert_eq!(body.description, None);
        assert_eq!(body.name.as_deref(), Some("About"));

        let body: UpdatePageLayout = serde_json::from_str(r#"{"description": "Hi"}"#).unwrap();
        assert_eq!(body.description, Some(Some("Hi".to_string())));
        assert_eq!(body.title, None);
    }
}
