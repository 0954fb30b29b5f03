// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Staychat: realtime messaging client for Stayline.
//!
//! The [`manager`] module owns the connection lifecycle: dial, authenticate,
//! flush queued sends, reconnect with exponential backoff, and surface server
//! frames as [`event::ChatEvent`]s.

pub mod backoff;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod queue;
pub mod transport;
