// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Axum middleware applying the route-authorization gate per request.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::routes::{authorize, Decision, ROUTE_ROLES};
use crate::state::GateState;

/// Per-request gate: extract the bearer token, check the prefix table, and
/// either forward the request or redirect to the login path.
///
/// `/healthz` skips the gate entirely.
pub async fn gate_layer(
    State(state): State<Arc<GateState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if path == "/healthz" {
        return next.run(req).await;
    }

    let token = bearer_token(req.headers(), &state.config.token_cookies);
    match authorize(ROUTE_ROLES, path, token.as_deref()) {
        Decision::Allow => next.run(req).await,
        Decision::Redirect => {
            tracing::debug!(path, "gate redirecting to login");
            Redirect::temporary(&state.config.login_path).into_response()
        }
    }
}

/// Bearer token from the `Authorization` header, falling back to the
/// configured cookie names in priority order.
pub fn bearer_token(headers: &HeaderMap, cookie_names: &[String]) -> Option<String> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_owned());
            }
        }
    }

    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    for name in cookie_names {
        for pair in cookies.split(';') {
            let value = pair
                .trim()
                .strip_prefix(name.as_str())
                .and_then(|rest| rest.strip_prefix('='));
            if let Some(value) = value {
                if !value.is_empty() {
                    return Some(value.to_owned());
                }
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "layer_tests.rs"]
mod tests;
