// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Credential sources.
//!
//! Components that need a bearer token take a [`CredentialProvider`] at
//! construction time instead of reaching into an ambient store, so tests and
//! tools can swap in a fixed token and the production path can re-read
//! refreshed credentials from disk.

use std::path::PathBuf;

/// Source of the current bearer token, if any.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed token, set once at construction.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    /// Provider with no credential at all.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Token file on disk, re-read on every call so an externally refreshed
/// credential is picked up without restarting.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileCredentials {
    fn token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_owned())
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
