//! Page builder API server library.
//!
//! Exposes configuration, state, the access adapter, actions, handlers and
//! routes so integration tests and the binary entrypoint share them.

pub mod access;
pub mod actions;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
