//! CSP response middleware.
//!
//! Runs the inner handler first, then compiles the per-request policy and sets
//! the headers. Handlers (or outer layers) steer the policy by attaching a
//! `PolicyOverrides` extension:
//! - response extension: set by the handler, wins
//! - request extension: set by an outer layer, used when the handler set none
//!
//! A compile failure replaces the response with a 500; a partially valid
//! policy is never written.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use cspforge_core::{CspHeaders, PolicyKind, PolicyOverrides};

use crate::app_state::AppState;
use crate::error::{GatewayError, Result};
use crate::headers::HeaderNames;

pub async fn csp_headers(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let request_overrides = req.extensions().get::<PolicyOverrides>().cloned();

    let mut response = next.run(req).await;

    let overrides = response
        .extensions_mut()
        .remove::<PolicyOverrides>()
        .or(request_overrides)
        .unwrap_or_default();

    let names = state.header_names(user_agent.as_deref());
    let result = render(&state, &overrides).and_then(|h| apply(response.headers_mut(), names, &h));
    match result {
        Ok(()) => response,
        Err(e) => {
            tracing::error!(code = e.client_code(), error = %e, "csp policy rejected");
            e.into_response()
        }
    }
}

fn render(state: &AppState, overrides: &PolicyOverrides) -> Result<CspHeaders> {
    let headers = state.template().render(overrides)?;
    tracing::debug!(
        overrides = !overrides.is_empty(),
        enforce = %headers.enforce,
        report = %headers.report,
        "csp policy compiled"
    );
    Ok(headers)
}

/// Write the non-empty header values onto `map`.
pub fn apply(map: &mut HeaderMap, names: HeaderNames, headers: &CspHeaders) -> Result<()> {
    let mut pending = Vec::with_capacity(2);
    for kind in [PolicyKind::Enforce, PolicyKind::Report] {
        let value = headers.get(kind);
        if value.is_empty() {
            continue;
        }
        let name = HeaderName::from_bytes(names.get(kind).as_bytes())
            .map_err(|e| GatewayError::InvalidHeader(format!("{}: {e}", names.get(kind))))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::InvalidHeader(format!("{kind} policy value: {e}")))?;
        pending.push((name, value));
    }
    for (name, value) in pending {
        map.insert(name, value);
    }
    Ok(())
}
