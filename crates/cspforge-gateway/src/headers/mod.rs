//! Header-name selection for CSP responses.
//!
//! Modern browsers understand `Content-Security-Policy`; older Gecko/Trident
//! builds only read the `X-` prefixed names and older WebKit builds the
//! `X-WebKit-` ones. The choice is a fixed table keyed on the user agent.

pub mod resolver;
pub mod user_agent;

pub use resolver::{HeaderNameResolver, HeaderNames};
pub use user_agent::{Browser, UserAgent};
