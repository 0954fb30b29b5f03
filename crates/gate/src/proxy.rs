// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Reverse proxy for requests the gate allows through.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::Client;

use crate::error::GateError;
use crate::state::GateState;

/// Request headers forwarded to the upstream app. Everything else is edge
/// plumbing the upstream has no use for.
const FORWARDED_HEADERS: &[&str] = &["authorization", "cookie", "content-type", "accept"];

/// Response headers passed back to the client, symmetric to
/// [`FORWARDED_HEADERS`]. `set-cookie` and `location` in particular must
/// survive the edge or upstream sign-in flows break.
const RETURNED_HEADERS: &[&str] = &["content-type", "set-cookie", "location", "cache-control"];

/// Cap on buffered request bodies.
const MAX_PROXY_BODY: usize = 2 * 1024 * 1024;

/// HTTP client wrapper for the upstream marketplace app.
pub struct AppClient {
    base_url: String,
    client: Client,
}

/// Upstream response, reduced to what the edge passes back.
pub struct UpstreamResponse {
    pub status: u16,
    /// Name/value pairs from [`RETURNED_HEADERS`], repeats preserved.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl AppClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        // Redirects pass through to the client; the edge must not chase
        // them itself.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default();
        Self { base_url, client }
    }

    /// Forward a request to the upstream app and buffer the response.
    pub async fn forward(
        &self,
        method: &str,
        path_and_query: &str,
        headers: &axum::http::HeaderMap,
        body: Vec<u8>,
    ) -> anyhow::Result<UpstreamResponse> {
        let method = reqwest::Method::from_bytes(method.as_bytes())?;
        let url = format!("{}{}", self.base_url, path_and_query);

        let mut req = self.client.request(method, url);
        for name in FORWARDED_HEADERS {
            if let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) {
                req = req.header(*name, value);
            }
        }
        if !body.is_empty() {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let mut headers = Vec::new();
        for name in RETURNED_HEADERS {
            for value in resp.headers().get_all(*name) {
                if let Ok(value) = value.to_str() {
                    headers.push(((*name).to_owned(), value.to_owned()));
                }
            }
        }
        let body = resp.bytes().await?.to_vec();
        Ok(UpstreamResponse { status, headers, body })
    }
}

/// Fallback handler: every gated request that is not served locally is
/// forwarded to the upstream app. Upstream failures map to 502.
pub async fn proxy_handler(
    State(state): State<Arc<GateState>>,
    req: Request<Body>,
) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_PROXY_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(err = %e, "failed to buffer request body");
            return GateError::Internal.to_http_response("request body unreadable").into_response();
        }
    };

    let path_and_query = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    match state
        .upstream
        .forward(parts.method.as_str(), path_and_query, &parts.headers, bytes.to_vec())
        .await
    {
        Ok(upstream) => {
            let mut builder = axum::http::Response::builder()
                .status(StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY));
            for (name, value) in &upstream.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.body(Body::from(upstream.body)).unwrap_or_default().into_response()
        }
        Err(e) => {
            tracing::debug!(path = path_and_query, err = %e, "upstream request failed");
            GateError::BadGateway.to_http_response("upstream unreachable").into_response()
        }
    }
}
