// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Events the connection manager emits to its consumer, and the domain types
//! they carry.

use std::fmt;

use crate::protocol::WireMessage;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnStatus {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Failed,
}

impl ConnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the conversation a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Own,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Delivered,
    Failed,
}

/// A chat message as handed to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub sender: Sender,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub delivery: DeliveryStatus,
}

impl ChatMessage {
    /// Attribute a wire message against the locally resolved user id.
    pub fn from_wire(wire: WireMessage, local_user_id: &str) -> Self {
        let sender =
            if wire.sender_id == local_user_id { Sender::Own } else { Sender::Other };
        Self {
            id: wire.id,
            text: wire.text,
            image_url: wire.image_url,
            sender,
            timestamp: wire.timestamp,
            delivery: DeliveryStatus::Delivered,
        }
    }
}

/// Errors surfaced to the consumer. All are terminal at the manager
/// boundary: none of them propagates as a panic or task failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No resolvable identity; `connect()` did not touch the network.
    NotAuthenticated,
    /// Outbound queue at capacity; the message was rejected, not queued.
    QueueFull,
    /// Transport-level failure on an established connection.
    Transport(String),
    /// An `error` frame from the server. Connection state is unchanged.
    Server(String),
    /// Inbound frame that did not parse. Connection state is unchanged.
    BadFrame(String),
    /// Retry budget exhausted; reconnection requires an explicit `connect()`.
    ReconnectExhausted(u32),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => f.write_str("no signed-in user"),
            Self::QueueFull => f.write_str("outbound queue full, message dropped"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Server(e) => write!(f, "server error: {e}"),
            Self::BadFrame(e) => write!(f, "malformed frame: {e}"),
            Self::ReconnectExhausted(n) => {
                write!(f, "connection failed after {n} reconnect attempts")
            }
        }
    }
}

/// Events emitted by the connection manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// Lifecycle change; emitted once per transition.
    Status(ConnStatus),
    Message(ChatMessage),
    /// Full history batch for the configured conversation partner.
    History(Vec<ChatMessage>),
    /// Remote party typing indicator; auto-expires after the debounce window.
    Typing(bool),
    Error(ChatError),
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
