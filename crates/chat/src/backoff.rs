// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use std::time::Duration;

/// Reconnect attempts before the connection is declared failed.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Base reconnect delay.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Delay before reconnect attempt number `attempt` (1-based, counted after
/// the increment): `base * 2^attempt`, so with the 2 s base the ladder is
/// 4 s, 8 s, 16 s, 32 s, 64 s. No jitter; the schedule is a contract.
pub fn reconnect_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
