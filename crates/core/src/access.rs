//! Caller access context and the page-admin access policy.
//!
//! The access context is produced by the external access-control provider;
//! this module only decides whether a given context may manage pages.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Well-known role names carried in access tokens.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADUN: &str = "adun";
pub const ROLE_STAFF: &str = "staff";

/// Message returned when no authenticated caller is present.
pub const MSG_AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Message returned when the caller lacks a page-admin role.
pub const MSG_ACCESS_DENIED: &str = "Access denied: Super Admin or ADUN role required";

/// What the access-control provider knows about the current caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub is_authenticated: bool,
    pub is_super_admin: bool,
    pub is_adun: bool,
    pub staff_id: Option<DbId>,
}

impl AccessContext {
    /// Context for a request that carried no valid credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build an authenticated context from a staff id and role name.
    pub fn for_role(staff_id: DbId, role: &str) -> Self {
        Self {
            is_authenticated: true,
            is_super_admin: role == ROLE_SUPER_ADMIN,
            is_adun: role == ROLE_ADUN,
            staff_id: Some(staff_id),
        }
    }

    /// Whether the caller may create, edit, publish and restore pages.
    pub fn can_manage_pages(&self) -> bool {
        self.is_authenticated && (self.is_super_admin || self.is_adun)
    }
}

/// Enforce the page-admin policy.
///
/// Unauthenticated callers get [`CoreError::Unauthorized`]; authenticated
/// callers without the Super Admin or ADUN role get [`CoreError::Forbidden`].
pub fn require_page_admin(access: &AccessContext) -> Result<(), CoreError> {
    if !access.is_authenticated {
        return Err(CoreError::Unauthorized(MSG_AUTHENTICATION_REQUIRED.into()));
    }
    if !(access.is_super_admin || access.is_adun) {
        return Err(CoreError::Forbidden(MSG_ACCESS_DENIED.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_rejected_as_unauthenticated() {
        let err = require_page_admin(&AccessContext::anonymous()).unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(ref m) if m == MSG_AUTHENTICATION_REQUIRED));
    }

    #[test]
    fn staff_role_is_forbidden() {
        let access = AccessContext::for_role(7, ROLE_STAFF);
        assert!(access.is_authenticated);
        let err = require_page_admin(&access).unwrap_err();
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn super_admin_and_adun_are_allowed() {
        assert!(require_page_admin(&AccessContext::for_role(1, ROLE_SUPER_ADMIN)).is_ok());
        assert!(require_page_admin(&AccessContext::for_role(2, ROLE_ADUN)).is_ok());
    }

    #[test]
    fn for_role_records_staff_id() {
        let access = AccessContext::for_role(42, ROLE_ADUN);
        assert_eq!(access.staff_id, Some(42));
        assert!(access.can_manage_pages());
        assert!(!AccessContext::anonymous().can_manage_pages());
    }
}
