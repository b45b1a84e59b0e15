//! Route definitions for the registry, validator and templates, mounted at
//! `/admin/page-builder`.
//!
//! ```text
//! GET    /page-types                    list_page_types
//! GET    /block-types?page_type=        list_block_types
//! POST   /validate                      validate_block
//! GET    /templates?block_type=&category=  list_templates
//! GET    /templates/{id}                apply_template
//! POST   /templates/{id}/customize      customize_template
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::page_builder;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page-types", get(page_builder::list_page_types))
        .route("/block-types", get(page_builder::list_block_types))
        .route("/validate", post(page_builder::validate_block))
        .route("/templates", get(page_builder::list_templates))
        .route("/templates/{id}", get(page_builder::apply_template))
        .route(
            "/templates/{id}/customize",
            post(page_builder::customize_template),
        )
}
