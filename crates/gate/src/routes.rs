// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Role-based route authorization.
//!
//! A static prefix table maps URL path prefixes to the roles allowed behind
//! them. Paths with no matching prefix are public. Listed paths fail closed:
//! a missing or undecodable credential always redirects to login.

use stayclaims::Role;

/// Path-prefix permission table, fixed at process start.
///
/// Every entry is intended to name exactly one role (except shared surfaces
/// like `/messages`); overlapping prefixes union their role sets, see
/// [`allowed_roles`].
pub const ROUTE_ROLES: &[(&str, &[Role])] = &[
    ("/admin", &[Role::Admin]),
    ("/landlord", &[Role::Landlord]),
    ("/tenant", &[Role::Tenant]),
    ("/property-management", &[Role::Landlord]),
    ("/messages", &[Role::Landlord, Role::Tenant]),
];

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect,
}

/// Roles permitted for `path`: the union of role sets over every entry whose
/// prefix matches.
///
/// Union semantics are the deployed policy and are pinned by a test. A path
/// matching both a landlord-only and a tenant-only prefix admits either
/// role; do not switch to most-specific-prefix without product sign-off.
/// The alternative would be:
///
/// ```ignore
/// table.iter()
///     .filter(|(prefix, _)| path.starts_with(prefix))
///     .max_by_key(|(prefix, _)| prefix.len())
///     .map(|(_, roles)| roles.to_vec())
///     .unwrap_or_default()
/// ```
pub fn allowed_roles(table: &[(&str, &[Role])], path: &str) -> Vec<Role> {
    let mut roles = Vec::new();
    for (prefix, allowed) in table {
        if path.starts_with(prefix) {
            for role in *allowed {
                if !roles.contains(role) {
                    roles.push(*role);
                }
            }
        }
    }
    roles
}

/// Decide whether `path` may be served to the holder of `token`.
///
/// Unlisted paths are public. Listed paths require a decodable credential
/// whose role is in the permitted union; every failure mode (absent token,
/// malformed token, wrong role) resolves to [`Decision::Redirect`] — this
/// function never errors.
pub fn authorize(table: &[(&str, &[Role])], path: &str, token: Option<&str>) -> Decision {
    let allowed = allowed_roles(table, path);
    if allowed.is_empty() {
        return Decision::Allow;
    }

    match stayclaims::decode(token) {
        Some(claim) if allowed.contains(&claim.role) => Decision::Allow,
        Some(claim) => {
            tracing::debug!(path, role = %claim.role, "role not permitted for path");
            Decision::Redirect
        }
        None => Decision::Redirect,
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
