//! Route definitions for page versions, mounted at `/admin/versions`.
//!
//! ```text
//! GET    /compare?v1=&v2=    compare_versions
//! GET    /{id}               get_version
//! DELETE /{id}               delete_version
//! POST   /{id}/restore       restore_version
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compare", get(versions::compare_versions))
        .route(
            "/{id}",
            get(versions::get_version).delete(versions::delete_version),
        )
        .route("/{id}/restore", post(versions::restore_version))
}
