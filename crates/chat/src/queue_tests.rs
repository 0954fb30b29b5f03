// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

use crate::protocol::ClientFrame;

use super::*;

fn msg(text: &str) -> ClientFrame {
    ClientFrame::Message { receiver_id: "u2".into(), text: text.into(), image_url: None }
}

fn text_of(frame: &ClientFrame) -> &str {
    match frame {
        ClientFrame::Message { text, .. } => text,
        other => panic!("expected message frame, got {other:?}"),
    }
}

#[test]
fn pops_in_submission_order() {
    let mut queue = OutboundQueue::new(8);
    for text in ["one", "two", "three"] {
        assert!(queue.push(msg(text)));
    }
    let drained: Vec<String> =
        std::iter::from_fn(|| queue.pop()).map(|f| text_of(&f).to_owned()).collect();
    assert_eq!(drained, ["one", "two", "three"]);
    assert!(queue.is_empty());
}

#[test]
fn rejects_when_full() {
    let mut queue = OutboundQueue::new(2);
    assert!(queue.push(msg("one")));
    assert!(queue.push(msg("two")));
    assert!(!queue.push(msg("three")));
    assert_eq!(queue.len(), 2);
    // Rejection keeps the earlier submissions intact.
    assert_eq!(text_of(&queue.pop().unwrap()), "one");
}

#[test]
fn requeue_front_restores_order() {
    let mut queue = OutboundQueue::new(8);
    assert!(queue.push(msg("one")));
    assert!(queue.push(msg("two")));
    let head = queue.pop().unwrap();
    queue.requeue_front(head);
    assert_eq!(text_of(&queue.pop().unwrap()), "one");
    assert_eq!(text_of(&queue.pop().unwrap()), "two");
}

#[test]
fn clear_empties_and_frees_capacity() {
    let mut queue = OutboundQueue::new(1);
    assert!(queue.push(msg("one")));
    assert!(!queue.push(msg("two")));
    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.push(msg("three")));
}
