use std::sync::Arc;

use pagebuilder_core::block_registry::BlockRegistry;
use pagebuilder_core::block_templates::TemplateCatalog;
use pagebuilder_core::page::ADMIN_PAGES_PATH;
use pagebuilder_core::types::DbId;
use pagebuilder_events::RevalidationBus;

use crate::access::AccessProvider;
use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pagebuilder_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Block and page type catalogue.
    pub registry: Arc<BlockRegistry>,
    /// Block template catalogue.
    pub templates: Arc<TemplateCatalog>,
    /// Resolves the caller's access context from request headers.
    pub access_provider: Arc<dyn AccessProvider>,
    /// Cache revalidation signals.
    pub revalidation: Arc<RevalidationBus>,
}

impl AppState {
    /// Revalidate the admin listing and, when given, a page's public routes.
    pub fn revalidate_pages<S: AsRef<str>>(&self, layout_id: DbId, routes: &[S]) {
        self.revalidation.revalidate(layout_id, ADMIN_PAGES_PATH);
        for route in routes {
            self.revalidation.revalidate(layout_id, route.as_ref());
        }
    }
}
