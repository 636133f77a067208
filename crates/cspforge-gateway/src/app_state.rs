//! Shared application state for the cspforge gateway.
//!
//! Holds the startup `Config` as an immutable template. Requests never mutate
//! it; each one renders from its own copy.

use std::sync::Arc;

use cspforge_core::error::Result;
use cspforge_core::{Config, PolicyOverrides};

use crate::config::GatewayConfig;
use crate::headers::{HeaderNameResolver, HeaderNames};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    template: Config,
    resolver: HeaderNameResolver,
}

impl AppState {
    /// Build application state. Fails if the startup policies don't compile.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let template = Config::from(cfg.policies.clone());
        let headers = template.render(&PolicyOverrides::new())?;
        tracing::info!(
            enforce = %headers.enforce,
            report = %headers.report,
            "csp policies compiled"
        );

        let resolver = HeaderNameResolver::new(cfg.gateway.legacy_header_names);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                template,
                resolver,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn template(&self) -> &Config {
        &self.inner.template
    }

    pub fn header_names(&self, user_agent: Option<&str>) -> HeaderNames {
        self.inner.resolver.resolve(user_agent)
    }
}
