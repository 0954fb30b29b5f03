// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use super::build_ws_url;

#[test]
fn http_endpoints_map_to_ws() {
    assert_eq!(build_ws_url("http://chat.example/ws"), "ws://chat.example/ws");
    assert_eq!(build_ws_url("https://chat.example/ws"), "wss://chat.example/ws");
}

#[test]
fn ws_endpoints_pass_through() {
    assert_eq!(build_ws_url("ws://127.0.0.1:8701/chat"), "ws://127.0.0.1:8701/chat");
    assert_eq!(build_ws_url("wss://chat.example/ws"), "wss://chat.example/ws");
}

#[test]
fn scheme_is_only_replaced_at_the_front() {
    assert_eq!(
        build_ws_url("https://chat.example/redirect?to=https://other"),
        "wss://chat.example/redirect?to=https://other"
    );
}
