#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use pagebuilder_core::access::{AccessContext, ROLE_ADUN, ROLE_STAFF, ROLE_SUPER_ADMIN};
use pagebuilder_core::block_registry::BlockRegistry;
use pagebuilder_core::block_templates::TemplateCatalog;
use pagebuilder_core::types::JsonMap;
use pagebuilder_db::models::content_block::{CreateContentBlock, TranslationMap};
use pagebuilder_db::models::page_layout::{CreatePageLayout, PageLayout};
use pagebuilder_events::RevalidationBus;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use pagebuilder_api::access::{AccessProvider, JwtAccessProvider};
use pagebuilder_api::actions::pages;
use pagebuilder_api::auth::jwt::{generate_access_token, JwtConfig};
use pagebuilder_api::config::ServerConfig;
use pagebuilder_api::routes;
use pagebuilder_api::state::AppState;

/// Access provider that ignores headers and always returns one context.
pub struct StaticAccessProvider(pub AccessContext);

#[async_trait]
impl AccessProvider for StaticAccessProvider {
    async fn current_access(&self, _headers: &HeaderMap) -> AccessContext {
        self.0.clone()
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        version_retention_days: 30,
        retention_interval_secs: 3600,
        revalidate_webhook_url: None,
        jwt: test_jwt_config(),
    }
}

pub fn super_admin() -> AccessContext {
    AccessContext::for_role(1, ROLE_SUPER_ADMIN)
}

pub fn adun() -> AccessContext {
    AccessContext::for_role(2, ROLE_ADUN)
}

pub fn staff() -> AccessContext {
    AccessContext::for_role(3, ROLE_STAFF)
}

pub fn token_for(staff_id: i64, role: &str) -> String {
    generate_access_token(staff_id, role, &test_jwt_config()).unwrap()
}

/// State wired like production except for the access provider.
pub fn test_state_with(pool: PgPool, provider: Arc<dyn AccessProvider>) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        registry: Arc::new(BlockRegistry::builtin()),
        templates: Arc::new(TemplateCatalog::builtin()),
        access_provider: provider,
        revalidation: Arc::new(RevalidationBus::default()),
    }
}

/// State for calling actions directly; the access context is passed per call.
pub fn test_state(pool: PgPool) -> AppState {
    test_state_with(pool, Arc::new(StaticAccessProvider(AccessContext::anonymous())))
}

/// A pool that never connects, for routes that must not touch the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://localhost/unused")
        .unwrap()
}

/// Build the application router with the production middleware stack and
/// bearer-token access.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = test_state_with(pool, Arc::new(JwtAccessProvider::new(test_jwt_config())));
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::DELETE, uri, token, None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn object(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn page_input(route: &str, page_type: &str) -> CreatePageLayout {
    CreatePageLayout {
        name: format!("Page {route}"),
        page_type: page_type.to_string(),
        route: route.to_string(),
        title: Some("Welcome".to_string()),
        description: None,
        is_active: None,
    }
}

/// Create a page through the action and return it.
pub async fn create_page(state: &AppState, route: &str, page_type: &str) -> PageLayout {
    let response = pages::create_page(state, &super_admin(), page_input(route, page_type)).await;
    assert!(response.success, "create_page failed: {:?}", response.error);
    response.data.unwrap()
}

/// A block input with one translation per `(locale, content)` pair.
pub fn block_input(block_type: &str, block_key: &str, translations: &[(&str, Value)]) -> CreateContentBlock {
    let translations: TranslationMap = translations
        .iter()
        .map(|(locale, content)| (locale.to_string(), object(content.clone())))
        .collect();
    CreateContentBlock {
        block_type: block_type.to_string(),
        block_key: block_key.to_string(),
        display_order: None,
        is_visible: None,
        configuration: JsonMap::new(),
        translations,
    }
}
