// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Bearer-credential claim decoding for the Stayline marketplace.
//!
//! The decode here is *advisory*: it reads the payload segment of a
//! JWT-shaped token so callers can branch on the role, without verifying the
//! signature or expiry. Anything security-sensitive re-verifies server-side;
//! a claim produced by this crate must never gate access to protected data
//! on its own.

pub mod provider;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Marketplace account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Landlord,
    Tenant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Landlord => "landlord",
            Self::Tenant => "tenant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded payload of a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub role: Role,
    pub user_id: String,
    /// Expiry, epoch seconds. Carried but not checked here.
    pub exp: i64,
    /// Issued-at, epoch seconds.
    pub iat: i64,
}

/// Decode the payload of a JWT-shaped bearer token.
///
/// Returns `None` for any missing, malformed, or wrong-shaped input — never
/// panics. Signature and expiry are deliberately not checked.
pub fn decode(token: Option<&str>) -> Option<Claim> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }

    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let _signature = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    // Some issuers pad the payload segment; strip before decoding.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
