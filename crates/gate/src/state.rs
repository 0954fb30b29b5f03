// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use crate::config::GateConfig;
use crate::proxy::AppClient;

/// Shared gate state.
pub struct GateState {
    pub config: GateConfig,
    pub upstream: AppClient,
}

impl GateState {
    pub fn new(config: GateConfig) -> Self {
        let upstream = AppClient::new(config.upstream_url.clone(), config.upstream_timeout());
        Self { config, upstream }
    }
}
