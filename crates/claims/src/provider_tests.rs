// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use super::*;

#[test]
fn static_credentials_return_token() {
    let provider = StaticCredentials::new("abc.def.ghi");
    assert_eq!(provider.token().as_deref(), Some("abc.def.ghi"));
}

#[test]
fn anonymous_credentials_return_none() {
    assert_eq!(StaticCredentials::anonymous().token(), None);
}

#[test]
fn file_credentials_read_and_trim() {
    let path = std::env::temp_dir()
        .join(format!("stayclaims-test-{}-token", std::process::id()));
    std::fs::write(&path, "  abc.def.ghi \n").unwrap();
    let provider = FileCredentials::new(&path);
    assert_eq!(provider.token().as_deref(), Some("abc.def.ghi"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_or_empty_file_is_none() {
    let missing = FileCredentials::new("/nonexistent/stayclaims-token");
    assert_eq!(missing.token(), None);

    let path = std::env::temp_dir()
        .join(format!("stayclaims-test-{}-empty", std::process::id()));
    std::fs::write(&path, "\n").unwrap();
    assert_eq!(FileCredentials::new(&path).token(), None);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_credentials_pick_up_rewrites() {
    let path = std::env::temp_dir()
        .join(format!("stayclaims-test-{}-rotate", std::process::id()));
    std::fs::write(&path, "first.token.sig").unwrap();
    let provider = FileCredentials::new(&path);
    assert_eq!(provider.token().as_deref(), Some("first.token.sig"));
    std::fs::write(&path, "second.token.sig").unwrap();
    assert_eq!(provider.token().as_deref(), Some("second.token.sig"));
    let _ = std::fs::remove_file(&path);
}
