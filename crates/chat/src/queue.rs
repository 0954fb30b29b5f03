// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Bounded FIFO buffer for messages awaiting a connected transport.

use std::collections::VecDeque;

use crate::protocol::ClientFrame;

/// Outbound message queue with a hard capacity.
///
/// When full, new messages are rejected (never silently dropped from the
/// front — that would reorder conversation history under the caller).
#[derive(Debug)]
pub struct OutboundQueue {
    items: VecDeque<ClientFrame>,
    capacity: usize,
}

impl OutboundQueue {
    pub fn new(capacity: usize) -> Self {
        Self { items: VecDeque::new(), capacity }
    }

    /// Append a frame. Returns `false` when the queue is at capacity and the
    /// frame was rejected.
    #[must_use]
    pub fn push(&mut self, frame: ClientFrame) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push_back(frame);
        true
    }

    /// Oldest queued frame, in submission order.
    pub fn pop(&mut self) -> Option<ClientFrame> {
        self.items.pop_front()
    }

    /// Put a frame back at the head after a failed flush.
    pub fn requeue_front(&mut self, frame: ClientFrame) {
        self.items.push_front(frame);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
