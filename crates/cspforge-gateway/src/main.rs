//! cspforge gateway binary.
//!
//! - Config: `CSPFORGE_CONFIG` (default `cspforge.yaml`), strict parsing + validation
//! - Policies compiled once at startup, then per request from the template
//! - Logging via `RUST_LOG`

use tracing_subscriber::{fmt, EnvFilter};

use cspforge_gateway::{app_state, config, error::Result, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "cspforge-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("CSPFORGE_CONFIG").unwrap_or_else(|_| "cspforge.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "cspforge-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
