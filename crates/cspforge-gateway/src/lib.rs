//! cspforge gateway library entry.
//!
//! Wires the policy core into an HTTP stack: strict YAML config loading,
//! user-agent based header-name selection, and an axum middleware that sets
//! the compiled CSP headers on every response.

pub mod app_state;
pub mod config;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod router;
