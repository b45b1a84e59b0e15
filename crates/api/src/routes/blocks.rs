//! Route definitions for content blocks, mounted at `/admin/blocks`.
//!
//! ```text
//! GET    /{id}                      get_block
//! PUT    /{id}                      update_block
//! DELETE /{id}                      delete_block
//! POST   /{id}/toggle-visibility    toggle_visibility
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::blocks;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(blocks::get_block)
                .put(blocks::update_block)
                .delete(blocks::delete_block),
        )
        .route("/{id}/toggle-visibility", post(blocks::toggle_visibility))
}
