// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

/// Configuration for the staygate edge proxy.
#[derive(Debug, Clone, clap::Parser)]
pub struct GateConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "STAYGATE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8700, env = "STAYGATE_PORT")]
    pub port: u16,

    /// Base URL of the upstream marketplace app.
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "STAYGATE_UPSTREAM")]
    pub upstream_url: String,

    /// Path unauthenticated or unauthorized requests are redirected to.
    #[arg(long, default_value = "/login", env = "STAYGATE_LOGIN_PATH")]
    pub login_path: String,

    /// Cookie names probed for the bearer token, in priority order.
    #[arg(
        long,
        default_value = "access_token,token",
        env = "STAYGATE_TOKEN_COOKIES",
        value_delimiter = ','
    )]
    pub token_cookies: Vec<String>,

    /// Upstream request timeout in milliseconds.
    #[arg(long, default_value_t = 10000, env = "STAYGATE_UPSTREAM_TIMEOUT_MS")]
    pub upstream_timeout_ms: u64,
}

impl GateConfig {
    pub fn upstream_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.upstream_timeout_ms)
    }
}
