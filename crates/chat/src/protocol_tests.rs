// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use super::*;

#[test]
fn authenticate_frame_shape() {
    let json = encode_frame(&ClientFrame::Authenticate { token: "abc".into() }).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["event"], "authenticate");
    assert_eq!(value["token"], "abc");
}

#[test]
fn message_frame_uses_camel_case_and_drops_empty_image() {
    let json = encode_frame(&ClientFrame::Message {
        receiver_id: "u2".into(),
        text: "hello".into(),
        image_url: None,
    })
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["event"], "message");
    assert_eq!(value["receiverId"], "u2");
    assert!(value.get("imageUrl").is_none());

    let json = encode_frame(&ClientFrame::Message {
        receiver_id: "u2".into(),
        text: "look".into(),
        image_url: Some("https://cdn.example/p.jpg".into()),
    })
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["imageUrl"], "https://cdn.example/p.jpg");
}

#[test]
fn fetch_chats_frame_shape() {
    let json = encode_frame(&ClientFrame::FetchChats { receiver_id: "u2".into() }).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["event"], "fetchChats");
    assert_eq!(value["receiverId"], "u2");
}

#[test]
fn inbound_message_parses() {
    let frame = parse_frame(
        r#"{"event":"message","data":{"id":"m1","senderId":"u2","receiverId":"u1","text":"hi","timestamp":1700000000000}}"#,
    )
    .unwrap();
    match frame {
        ServerFrame::Message(msg) => {
            assert_eq!(msg.id, "m1");
            assert_eq!(msg.sender_id, "u2");
            assert_eq!(msg.text, "hi");
            assert_eq!(msg.image_url, None);
        }
        other => panic!("expected message frame, got {other:?}"),
    }
}

#[test]
fn inbound_history_parses_as_batch() {
    let frame = parse_frame(
        r#"{"event":"fetchChats","data":[
            {"id":"m1","senderId":"u1","receiverId":"u2","text":"a"},
            {"id":"m2","senderId":"u2","receiverId":"u1","text":"b"}
        ]}"#,
    )
    .unwrap();
    match frame {
        ServerFrame::FetchChats(batch) => {
            assert_eq!(batch.len(), 2);
            assert_eq!(batch[0].id, "m1");
            assert_eq!(batch[1].id, "m2");
        }
        other => panic!("expected history frame, got {other:?}"),
    }
}

#[test]
fn inbound_typing_and_error_parse() {
    assert_eq!(
        parse_frame(r#"{"event":"typing","data":{"senderId":"u2"}}"#).unwrap(),
        ServerFrame::Typing(TypingNotice { sender_id: "u2".into() })
    );
    assert_eq!(
        parse_frame(r#"{"event":"error","data":{"message":"not allowed"}}"#).unwrap(),
        ServerFrame::Error(WireError { message: "not allowed".into() })
    );
}

#[test]
fn unrecognized_event_is_unknown_not_error() {
    // Whatever the payload shape: object, array, scalar, or absent.
    for raw in [
        r#"{"event":"presence","data":{"online":true}}"#,
        r#"{"event":"presence","data":{"online":true,"users":["u1","u2"]}}"#,
        r#"{"event":"readReceipts","data":["m1","m2"]}"#,
        r#"{"event":"pong","data":17}"#,
        r#"{"event":"ping"}"#,
    ] {
        assert_eq!(parse_frame(raw).unwrap(), ServerFrame::Unknown, "input {raw:?}");
    }
}

#[test]
fn malformed_frames_are_parse_errors() {
    for raw in ["not json", "{}", r#"{"event":"message"}"#, r#"{"data":{}}"#] {
        assert!(parse_frame(raw).is_err(), "input {raw:?} should not parse");
    }
}
