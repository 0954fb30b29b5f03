// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::*;

fn token_with_payload(payload: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    format!("{header}.{body}.signature")
}

#[test]
fn decodes_well_formed_token() {
    let token = token_with_payload(
        r#"{"role":"landlord","userId":"user-42","exp":4102444800,"iat":1700000000}"#,
    );
    let claim = decode(Some(&token)).unwrap();
    assert_eq!(claim.role, Role::Landlord);
    assert_eq!(claim.user_id, "user-42");
    assert_eq!(claim.exp, 4102444800);
    assert_eq!(claim.iat, 1700000000);
}

#[test]
fn each_role_decodes() {
    for (raw, role) in
        [("admin", Role::Admin), ("landlord", Role::Landlord), ("tenant", Role::Tenant)]
    {
        let token = token_with_payload(&format!(
            r#"{{"role":"{raw}","userId":"u1","exp":0,"iat":0}}"#
        ));
        assert_eq!(decode(Some(&token)).map(|c| c.role), Some(role));
    }
}

#[test]
fn missing_token_is_none() {
    assert_eq!(decode(None), None);
}

#[test]
fn garbage_strings_are_none() {
    for raw in [
        "",
        "   ",
        "not-a-token",
        "only.two",
        "too.many.dots.here",
        "expired.looking.token",
        "a.%%%not-base64%%%.c",
    ] {
        assert_eq!(decode(Some(raw)), None, "input {raw:?} should not decode");
    }
}

#[test]
fn base64_but_not_json_is_none() {
    let header = URL_SAFE_NO_PAD.encode(b"{}");
    let body = URL_SAFE_NO_PAD.encode(b"definitely not json");
    assert_eq!(decode(Some(&format!("{header}.{body}.sig"))), None);
}

#[test]
fn wrong_shape_payload_is_none() {
    // Valid JSON, but no role/userId fields.
    let token = token_with_payload(r#"{"sub":"user-42","exp":0}"#);
    assert_eq!(decode(Some(&token)), None);
}

#[test]
fn unknown_role_is_none() {
    let token = token_with_payload(r#"{"role":"superuser","userId":"u1","exp":0,"iat":0}"#);
    assert_eq!(decode(Some(&token)), None);
}

#[test]
fn expired_timestamp_still_decodes() {
    // Expiry is advisory here: decode does not reject a past `exp`.
    let token = token_with_payload(r#"{"role":"tenant","userId":"u1","exp":1,"iat":0}"#);
    let claim = decode(Some(&token)).unwrap();
    assert_eq!(claim.role, Role::Tenant);
}

#[test]
fn padded_payload_segment_decodes() {
    let header = URL_SAFE_NO_PAD.encode(b"{}");
    let mut body =
        URL_SAFE_NO_PAD.encode(br#"{"role":"admin","userId":"u9","exp":0,"iat":0}"#);
    while body.len() % 4 != 0 {
        body.push('=');
    }
    let claim = decode(Some(&format!("{header}.{body}.sig"))).unwrap();
    assert_eq!(claim.role, Role::Admin);
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let token = token_with_payload(r#"{"role":"tenant","userId":"u1","exp":0,"iat":0}"#);
    let padded = format!("  {token}\n");
    assert!(decode(Some(&padded)).is_some());
}
