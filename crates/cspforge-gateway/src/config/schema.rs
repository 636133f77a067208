use std::net::SocketAddr;

use serde::Deserialize;

use cspforge_core::error::{CspError, Result};
use cspforge_core::{Config, PolicyMap, PolicyOverrides};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Startup rules for the `enforce` and `report` policies.
    #[serde(default)]
    pub policies: PolicyMap,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CspError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.gateway.validate()?;

        // Startup rules must compile on their own; per-request overrides are
        // checked again on every request.
        Config::from(self.policies.clone()).render(&PolicyOverrides::new())?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Pick `X-`/`X-WebKit-` header names for old browsers.
    #[serde(default = "default_legacy_header_names")]
    pub legacy_header_names: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            legacy_header_names: default_legacy_header_names(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            CspError::Config(format!(
                "gateway.listen must be a valid SocketAddr (got {})",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_legacy_header_names() -> bool {
    true
}
