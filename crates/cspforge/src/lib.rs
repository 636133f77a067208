//! Top-level facade crate for cspforge.
//!
//! Re-exports the policy core and the HTTP gateway so users can depend on a single crate.

pub mod core {
    pub use cspforge_core::*;
}

pub mod gateway {
    pub use cspforge_gateway::*;
}
