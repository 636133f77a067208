//! cspforge core: CSP 1.0 grammar, policy model, and request-scoped compilation.
//!
//! This crate owns everything that decides whether a header value is correct:
//! the directive catalog, the `Policy` validation engine, the add/remove/reset
//! algebra on `Config`, and canonical header serialization. It carries no
//! HTTP or runtime dependencies so the gateway (or any other host) can wrap it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every invalid rule surfaces as `CspError`/`Result`, so a bad override fails
//! the request that carried it instead of taking the host process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod grammar;
pub mod overrides;
pub mod policy;
pub mod rules;

/// Shared result type.
pub use error::{CspError, ErrorKind, Result};

pub use config::{ClearTarget, Config, CspHeaders, PolicyKind, PolicyMap};
pub use grammar::Directive;
pub use overrides::{PolicyOverrides, RawOverrides};
pub use policy::{Policy, PolicyState, RuleOp};
pub use rules::Rules;
