//! Access-control adapter.
//!
//! The page builder does not authenticate anyone itself. An
//! [`AccessProvider`] turns request headers into an [`AccessContext`], and
//! actions decide what that context may do. The production provider decodes
//! the admin application's HS256 bearer token.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use pagebuilder_core::access::AccessContext;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::state::AppState;

/// Source of the caller's access context.
#[async_trait]
pub trait AccessProvider: Send + Sync {
    /// Resolve the caller from request headers. Never fails: callers without
    /// usable credentials get an anonymous context.
    async fn current_access(&self, headers: &HeaderMap) -> AccessContext;
}

/// Resolves callers from an `Authorization: Bearer <jwt>` header.
pub struct JwtAccessProvider {
    config: JwtConfig,
}

impl JwtAccessProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AccessProvider for JwtAccessProvider {
    async fn current_access(&self, headers: &HeaderMap) -> AccessContext {
        let Some(token) = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
        else {
            return AccessContext::anonymous();
        };

        match validate_token(token.trim(), &self.config) {
            Ok(claims) => AccessContext::for_role(claims.sub, &claims.role),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                AccessContext::anonymous()
            }
        }
    }
}

/// Extractor yielding the caller's [`AccessContext`].
///
/// Extraction never rejects; policy checks happen inside the actions so the
/// failure is reported through the regular response envelope.
#[derive(Debug, Clone)]
pub struct CurrentAccess(pub AccessContext);

impl FromRequestParts<AppState> for CurrentAccess {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let access = state.access_provider.current_access(&parts.headers).await;
        Ok(CurrentAccess(access))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::auth::jwt::generate_access_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".into(),
            access_token_expiry_mins: 15,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn valid_token_yields_role_flags() {
        let provider = JwtAccessProvider::new(config());
        let token = generate_access_token(5, "adun", &config()).unwrap();

        let access = provider.current_access(&bearer(&token)).await;
        assert!(access.is_authenticated);
        assert!(access.is_adun);
        assert!(!access.is_super_admin);
        assert_eq!(access.staff_id, Some(5));
        assert!(access.can_manage_pages());
    }

    #[tokio::test]
    async fn staff_role_is_authenticated_but_not_admin() {
        let provider = JwtAccessProvider::new(config());
        let token = generate_access_token(6, "staff", &config()).unwrap();

        let access = provider.current_access(&bearer(&token)).await;
        assert!(access.is_authenticated);
        assert!(!access.can_manage_pages());
    }

    #[tokio::test]
    async fn missing_or_bad_credentials_are_anonymous() {
        let provider = JwtAccessProvider::new(config());

        assert_eq!(
            provider.current_access(&HeaderMap::new()).await,
            AccessContext::anonymous()
        );
        assert_eq!(
            provider.current_access(&bearer("not-a-jwt")).await,
            AccessContext::anonymous()
        );

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(
            provider.current_access(&basic).await,
            AccessContext::anonymous()
        );
    }
}
