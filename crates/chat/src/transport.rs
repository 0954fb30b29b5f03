// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Transport abstraction over the realtime socket.
//!
//! The manager owns exactly one transport at a time and only ever talks to it
//! through these traits, so tests can substitute a scripted in-memory
//! transport for the tungstenite one.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// What the transport reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One inbound text frame.
    Frame(String),
    /// The connection closed. `clean` is true only for a normal-closure code.
    Closed { clean: bool },
    /// A transport-level error on an established connection.
    Failed(String),
}

/// An established realtime connection.
pub trait Transport: Send + 'static {
    fn send(&mut self, text: String) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn recv(&mut self) -> impl Future<Output = TransportEvent> + Send;
    /// Close with a normal-closure code. Best effort; never errors.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Dials new connections.
pub trait Connector: Send + Sync + 'static {
    type Transport: Transport;
    fn connect(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = anyhow::Result<Self::Transport>> + Send;
}

/// Production connector: tokio-tungstenite over TCP/TLS.
pub struct WsConnector;

pub struct WsTransport {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connector for WsConnector {
    type Transport = WsTransport;

    fn connect(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = anyhow::Result<Self::Transport>> + Send {
        let url = build_ws_url(endpoint);
        async move {
            let (stream, _) = tokio_tungstenite::connect_async(&url).await?;
            Ok(WsTransport { inner: stream })
        }
    }
}

impl Transport for WsTransport {
    fn send(&mut self, text: String) -> impl Future<Output = anyhow::Result<()>> + Send {
        async move {
            self.inner.send(Message::Text(text.into())).await?;
            Ok(())
        }
    }

    fn recv(&mut self) -> impl Future<Output = TransportEvent> + Send {
        async move {
            loop {
                match self.inner.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return TransportEvent::Frame(text.to_string());
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let clean =
                            frame.map(|f| f.code == CloseCode::Normal).unwrap_or(false);
                        return TransportEvent::Closed { clean };
                    }
                    None => return TransportEvent::Closed { clean: false },
                    Some(Err(e)) => return TransportEvent::Failed(e.to_string()),
                    Some(Ok(_)) => {} // ping/pong/binary ignored
                }
            }
        }
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            let frame = CloseFrame { code: CloseCode::Normal, reason: "".into() };
            let _ = self.inner.close(Some(frame)).await;
        }
    }
}

/// Accept an http(s) endpoint and map it to ws(s); ws(s) passes through.
pub fn build_ws_url(endpoint: &str) -> String {
    if endpoint.starts_with("https://") {
        endpoint.replacen("https://", "wss://", 1)
    } else if endpoint.starts_with("http://") {
        endpoint.replacen("http://", "ws://", 1)
    } else {
        endpoint.to_owned()
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
