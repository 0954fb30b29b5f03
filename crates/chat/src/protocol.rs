// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Wire protocol for the messaging endpoint: JSON text frames discriminated
//! by an `event` field.
//!
//! Frames are modeled as tagged enums so an unrecognized inbound tag lands in
//! a checked [`ServerFrame::Unknown`] branch instead of a silent runtime
//! default, and a malformed frame is a parse error the caller can surface.
//! Inbound parsing is two-stage (tag first, payload second) so an unknown
//! tag is `Unknown` whatever its payload carries; only known tags have
//! their payload shape enforced.

use serde::{Deserialize, Serialize};

/// Frames sent to the messaging endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientFrame {
    Authenticate {
        token: String,
    },
    #[serde(rename_all = "camelCase")]
    FetchChats {
        receiver_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Message {
        receiver_id: String,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Typing {
        receiver_id: String,
    },
}

/// Frames received from the messaging endpoint: `{event, data}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Message(WireMessage),
    FetchChats(Vec<WireMessage>),
    Typing(TypingNotice),
    Error(WireError),
    /// Any event tag this client does not understand. Logged and ignored;
    /// never an error.
    Unknown,
}

/// First parse stage: tag plus still-opaque payload.
#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A chat message as carried on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub sender_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireError {
    pub message: String,
}

/// Parse one inbound text frame.
pub fn parse_frame(text: &str) -> Result<ServerFrame, serde_json::Error> {
    let raw: RawFrame = serde_json::from_str(text)?;
    Ok(match raw.event.as_str() {
        "message" => ServerFrame::Message(serde_json::from_value(raw.data)?),
        "fetchChats" => ServerFrame::FetchChats(serde_json::from_value(raw.data)?),
        "typing" => ServerFrame::Typing(serde_json::from_value(raw.data)?),
        "error" => ServerFrame::Error(serde_json::from_value(raw.data)?),
        _ => ServerFrame::Unknown,
    })
}

/// Encode one outbound frame.
pub fn encode_frame(frame: &ClientFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
