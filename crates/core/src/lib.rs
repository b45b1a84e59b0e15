//! Page builder domain logic.
//!
//! Pure, synchronous building blocks shared by the database and API layers:
//!
//! - [`block_registry`]: block types, page types and allow-list rules.
//! - [`block_validation`]: field and business-rule checks for block content.
//! - [`block_templates`]: preset catalogue and override merging.
//! - [`snapshot`]: the self-contained page snapshot stored with each version.
//! - [`version_diff`]: structural comparison of two snapshots.
//! - [`page`]: request input validators.
//! - [`access`]: the page-admin access policy.

pub mod access;
pub mod block_registry;
pub mod block_templates;
pub mod block_validation;
pub mod error;
pub mod page;
pub mod snapshot;
pub mod types;
pub mod version_diff;
