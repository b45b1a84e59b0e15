//! Cache revalidation signalling for the page builder.
//!
//! - [`RevalidationBus`]: in-process publish/subscribe hub for
//!   [`RevalidationSignal`]s, backed by `tokio::sync::broadcast`.
//! - [`RevalidationWebhook`]: forwards a signal to the renderer's
//!   revalidation endpoint over HTTP.
//! - [`RevalidationDispatcher`]: background loop connecting the two.

pub mod bus;
pub mod dispatcher;
pub mod webhook;

pub use bus::{RevalidationBus, RevalidationSignal};
pub use dispatcher::RevalidationDispatcher;
pub use webhook::{RevalidationWebhook, WebhookError};
