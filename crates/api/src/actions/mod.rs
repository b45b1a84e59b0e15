//! Page builder actions.
//!
//! Each action checks access, validates input, performs its reads and
//! writes, emits revalidation signals and returns an [`ActionResponse`]. No
//! action fails any other way; handlers are thin wrappers around them and
//! tests call them directly.
//!
//! [`ActionResponse`]: crate::response::ActionResponse

pub mod blocks;
pub mod catalog;
pub mod pages;
pub mod versions;

use pagebuilder_core::error::CoreError;
use pagebuilder_core::types::DbId;
use pagebuilder_db::models::page_layout::PageLayout;
use pagebuilder_db::repositories::PageLayoutRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Load a layout or fail with "Page not found".
async fn require_layout(state: &AppState, id: DbId) -> AppResult<PageLayout> {
    PageLayoutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Page", id }.into())
}
