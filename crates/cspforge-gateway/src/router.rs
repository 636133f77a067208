//! Axum router wiring.
//!
//! `with_csp` wraps any router with the CSP middleware; `build_router` is the
//! standalone gateway used by the binary.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, middleware::csp_headers};

pub fn with_csp(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, csp_headers))
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new().route("/healthz", get(healthz));
    with_csp(routes, state)
}

async fn healthz() -> &'static str {
    "ok"
}
