// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Realtime connection manager.
//!
//! One tokio task owns the transport, the outbound queue, the reconnect
//! ladder, and the typing-expiry timer. Consumers drive it through a
//! [`ChatHandle`] and read [`ChatEvent`]s from the paired receiver. All
//! mutation happens inside the task, one event at a time; dropping the
//! handle closes the command channel and the task exits, taking every
//! pending timer with it.

use std::sync::Arc;
use std::time::Duration;

use stayclaims::provider::CredentialProvider;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::backoff::{reconnect_delay, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY};
use crate::event::{ChatError, ChatEvent, ChatMessage, ConnStatus};
use crate::protocol::{encode_frame, parse_frame, ClientFrame, ServerFrame};
use crate::queue::OutboundQueue;
use crate::transport::{Connector, Transport, TransportEvent};

/// How long the remote typing indicator stays on after the last event.
pub const TYPING_EXPIRY: Duration = Duration::from_secs(3);

const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Connection manager configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    /// Conversation partner; when set, history is requested on connect.
    pub peer_id: Option<String>,
    pub max_reconnect_attempts: u32,
    pub reconnect_delay: Duration,
    pub typing_expiry: Duration,
    pub queue_capacity: usize,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            peer_id: None,
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            reconnect_delay: RECONNECT_DELAY,
            typing_expiry: TYPING_EXPIRY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_peer(mut self, peer_id: impl Into<String>) -> Self {
        self.peer_id = Some(peer_id.into());
        self
    }
}

#[derive(Debug)]
enum Command {
    Connect,
    Disconnect,
    Message { receiver_id: String, text: String, image_url: Option<String> },
    Typing { receiver_id: String },
}

/// Handle to a running connection manager.
#[derive(Clone)]
pub struct ChatHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl ChatHandle {
    pub fn connect(&self) -> anyhow::Result<()> {
        self.send_cmd(Command::Connect)
    }

    pub fn disconnect(&self) -> anyhow::Result<()> {
        self.send_cmd(Command::Disconnect)
    }

    /// Fire-and-forget send. Queued while not connected; see the manager's
    /// queue policy for what happens when the queue is full.
    pub fn send_message(
        &self,
        receiver_id: impl Into<String>,
        text: impl Into<String>,
        image_url: Option<String>,
    ) -> anyhow::Result<()> {
        self.send_cmd(Command::Message {
            receiver_id: receiver_id.into(),
            text: text.into(),
            image_url,
        })
    }

    /// Notify the peer that the local user is typing. Dropped (not queued)
    /// when there is no live connection.
    pub fn send_typing(&self, receiver_id: impl Into<String>) -> anyhow::Result<()> {
        self.send_cmd(Command::Typing { receiver_id: receiver_id.into() })
    }

    fn send_cmd(&self, cmd: Command) -> anyhow::Result<()> {
        self.cmd_tx.send(cmd).map_err(|_| anyhow::anyhow!("chat task is not running"))
    }
}

/// Start a connection manager task.
///
/// The manager begins `Disconnected`; call [`ChatHandle::connect`] or send a
/// message to bring the connection up.
pub fn spawn<C: Connector>(
    config: ChatConfig,
    connector: C,
    provider: Arc<dyn CredentialProvider>,
) -> (ChatHandle, mpsc::UnboundedReceiver<ChatEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let queue = OutboundQueue::new(config.queue_capacity);
    let manager = Manager {
        cfg: config,
        connector,
        provider,
        event_tx,
        queue,
        attempts: 0,
        status: ConnStatus::Disconnected,
        user_id: None,
        typing_deadline: None,
    };
    tokio::spawn(manager.run(cmd_rx));
    (ChatHandle { cmd_tx }, event_rx)
}

enum Phase<T> {
    Idle,
    Backoff(Instant),
    Live(T),
    Stopped,
}

struct Manager<C: Connector> {
    cfg: ChatConfig,
    connector: C,
    provider: Arc<dyn CredentialProvider>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
    queue: OutboundQueue,
    attempts: u32,
    status: ConnStatus,
    user_id: Option<String>,
    typing_deadline: Option<Instant>,
}

enum LiveStep {
    Cmd(Option<Command>),
    Net(TransportEvent),
    TypingExpired,
}

impl<C: Connector> Manager<C> {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        let mut phase = Phase::Idle;
        loop {
            phase = match phase {
                Phase::Idle => self.idle(&mut cmd_rx).await,
                Phase::Backoff(deadline) => self.backoff(&mut cmd_rx, deadline).await,
                Phase::Live(transport) => self.live(&mut cmd_rx, transport).await,
                Phase::Stopped => break,
            };
        }
        tracing::debug!("chat manager stopped");
    }

    /// No transport and no pending reconnect: `Disconnected` or `Failed`.
    async fn idle(
        &mut self,
        cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
    ) -> Phase<C::Transport> {
        loop {
            let Some(cmd) = cmd_rx.recv().await else { return Phase::Stopped };
            match cmd {
                Command::Connect => {
                    self.attempts = 0;
                    return self.dial().await;
                }
                Command::Disconnect => self.reset(),
                Command::Message { receiver_id, text, image_url } => {
                    // Auto-connect only from fully Disconnected; Failed
                    // stays down until an explicit connect().
                    let auto_connect = self.status == ConnStatus::Disconnected;
                    self.enqueue(ClientFrame::Message { receiver_id, text, image_url });
                    if auto_connect {
                        return self.dial().await;
                    }
                }
                Command::Typing { .. } => {}
            }
        }
    }

    /// Reconnect scheduled; waiting out the backoff delay.
    async fn backoff(
        &mut self,
        cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
        deadline: Instant,
    ) -> Phase<C::Transport> {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    None => return Phase::Stopped,
                    Some(Command::Connect) => {
                        // Explicit connect re-arms the retry budget and
                        // dials immediately.
                        self.attempts = 0;
                        return self.dial().await;
                    }
                    Some(Command::Disconnect) => {
                        self.reset();
                        return Phase::Idle;
                    }
                    Some(Command::Message { receiver_id, text, image_url }) => {
                        self.enqueue(ClientFrame::Message { receiver_id, text, image_url });
                    }
                    Some(Command::Typing { .. }) => {}
                },
                _ = time::sleep_until(deadline) => return self.dial().await,
            }
        }
    }

    /// Established connection.
    async fn live(
        &mut self,
        cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
        mut transport: C::Transport,
    ) -> Phase<C::Transport> {
        loop {
            let step = tokio::select! {
                cmd = cmd_rx.recv() => LiveStep::Cmd(cmd),
                event = transport.recv() => LiveStep::Net(event),
                _ = maybe_deadline(self.typing_deadline) => LiveStep::TypingExpired,
            };

            match step {
                LiveStep::Cmd(None) => {
                    transport.close().await;
                    return Phase::Stopped;
                }
                LiveStep::Cmd(Some(Command::Disconnect)) => {
                    transport.close().await;
                    self.reset();
                    return Phase::Idle;
                }
                LiveStep::Cmd(Some(Command::Connect)) => {
                    tracing::debug!("connect ignored, already connected");
                }
                LiveStep::Cmd(Some(Command::Message { receiver_id, text, image_url })) => {
                    let frame = ClientFrame::Message { receiver_id, text, image_url };
                    if let Err(e) = self.transmit(&mut transport, &frame).await {
                        return self.transport_failed(e);
                    }
                }
                LiveStep::Cmd(Some(Command::Typing { receiver_id })) => {
                    let frame = ClientFrame::Typing { receiver_id };
                    if let Err(e) = self.transmit(&mut transport, &frame).await {
                        return self.transport_failed(e);
                    }
                }
                LiveStep::Net(TransportEvent::Frame(text)) => self.on_frame(&text),
                LiveStep::Net(TransportEvent::Closed { clean: true }) => {
                    tracing::debug!("connection closed cleanly");
                    self.clear_typing();
                    self.set_status(ConnStatus::Disconnected);
                    return Phase::Idle;
                }
                LiveStep::Net(TransportEvent::Closed { clean: false }) => {
                    return self.schedule_reconnect();
                }
                LiveStep::Net(TransportEvent::Failed(e)) => return self.transport_failed(e),
                LiveStep::TypingExpired => {
                    self.typing_deadline = None;
                    self.emit(ChatEvent::Typing(false));
                }
            }
        }
    }

    /// Resolve identity, dial, and run the post-open handshake.
    async fn dial(&mut self) -> Phase<C::Transport> {
        let Some(token) = self.provider.token() else {
            return self.no_identity();
        };
        let Some(claim) = stayclaims::decode(Some(&token)) else {
            return self.no_identity();
        };
        self.user_id = Some(claim.user_id);

        self.set_status(ConnStatus::Connecting);
        let mut transport = match self.connector.connect(&self.cfg.endpoint).await {
            Ok(transport) => transport,
            Err(e) => {
                // A failed dial has no separate close event; it takes the
                // unclean-close retry path.
                tracing::debug!(err = %e, "dial failed");
                return self.schedule_reconnect();
            }
        };

        if self.handshake(&mut transport, token).await.is_err() {
            return self.schedule_reconnect();
        }

        self.attempts = 0;
        self.set_status(ConnStatus::Connected);
        Phase::Live(transport)
    }

    /// Authenticate, flush the queue FIFO, then request history.
    async fn handshake(
        &mut self,
        transport: &mut C::Transport,
        token: String,
    ) -> Result<(), String> {
        self.transmit(transport, &ClientFrame::Authenticate { token }).await?;

        while let Some(frame) = self.queue.pop() {
            if let Err(e) = self.transmit(transport, &frame).await {
                self.queue.requeue_front(frame);
                return Err(e);
            }
        }

        if let Some(peer) = self.cfg.peer_id.clone() {
            self.transmit(transport, &ClientFrame::FetchChats { receiver_id: peer }).await?;
        }
        Ok(())
    }

    fn no_identity(&mut self) -> Phase<C::Transport> {
        self.emit(ChatEvent::Error(ChatError::NotAuthenticated));
        self.set_status(ConnStatus::Disconnected);
        Phase::Idle
    }

    fn enqueue(&mut self, frame: ClientFrame) {
        if !self.queue.push(frame) {
            tracing::debug!(queued = self.queue.len(), "outbound queue full");
            self.emit(ChatEvent::Error(ChatError::QueueFull));
        }
    }

    async fn transmit(
        &mut self,
        transport: &mut C::Transport,
        frame: &ClientFrame,
    ) -> Result<(), String> {
        let text = match encode_frame(frame) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(err = %e, "failed to encode frame, dropping");
                return Ok(());
            }
        };
        transport.send(text).await.map_err(|e| e.to_string())
    }

    fn on_frame(&mut self, text: &str) {
        // Identity is resolved before any dial, so a live frame never
        // observes a missing user id.
        let Some(local) = self.user_id.clone() else {
            tracing::warn!("inbound frame without a resolved identity, dropping");
            return;
        };
        match parse_frame(text) {
            Ok(ServerFrame::Message(wire)) => {
                self.emit(ChatEvent::Message(ChatMessage::from_wire(wire, &local)));
            }
            Ok(ServerFrame::FetchChats(batch)) => {
                let history =
                    batch.into_iter().map(|w| ChatMessage::from_wire(w, &local)).collect();
                self.emit(ChatEvent::History(history));
            }
            Ok(ServerFrame::Typing(notice)) => {
                if notice.sender_id != local {
                    // Debounce: each event restarts the window.
                    if self.typing_deadline.is_none() {
                        self.emit(ChatEvent::Typing(true));
                    }
                    self.typing_deadline = Some(Instant::now() + self.cfg.typing_expiry);
                }
            }
            Ok(ServerFrame::Error(err)) => {
                self.emit(ChatEvent::Error(ChatError::Server(err.message)));
            }
            Ok(ServerFrame::Unknown) => {
                tracing::debug!(frame = text, "ignoring unrecognized event");
            }
            Err(e) => self.emit(ChatEvent::Error(ChatError::BadFrame(e.to_string()))),
        }
    }

    fn schedule_reconnect(&mut self) -> Phase<C::Transport> {
        self.clear_typing();
        if self.attempts < self.cfg.max_reconnect_attempts {
            self.attempts += 1;
            let delay = reconnect_delay(self.cfg.reconnect_delay, self.attempts);
            tracing::debug!(
                attempt = self.attempts,
                delay_ms = delay.as_millis() as u64,
                "scheduling reconnect"
            );
            self.set_status(ConnStatus::Reconnecting);
            Phase::Backoff(Instant::now() + delay)
        } else {
            self.emit(ChatEvent::Error(ChatError::ReconnectExhausted(self.attempts)));
            self.set_status(ConnStatus::Failed);
            Phase::Idle
        }
    }

    fn transport_failed(&mut self, err: String) -> Phase<C::Transport> {
        // Errors on an established connection do not take the retry path;
        // recovery needs an explicit connect().
        self.clear_typing();
        self.emit(ChatEvent::Error(ChatError::Transport(err)));
        self.set_status(ConnStatus::Failed);
        Phase::Idle
    }

    /// The disconnect contract: queue cleared, counters reset, timers
    /// cancelled. Safe to call in any state.
    fn reset(&mut self) {
        self.queue.clear();
        self.attempts = 0;
        self.clear_typing();
        self.set_status(ConnStatus::Disconnected);
    }

    fn clear_typing(&mut self) {
        if self.typing_deadline.take().is_some() {
            self.emit(ChatEvent::Typing(false));
        }
    }

    fn set_status(&mut self, status: ConnStatus) {
        if self.status != status {
            tracing::debug!(from = %self.status, to = %status, "status change");
            self.status = status;
            self.emit(ChatEvent::Status(status));
        }
    }

    fn emit(&self, event: ChatEvent) {
        // Consumer may have gone away; nothing to do about it here.
        let _ = self.event_tx.send(event);
    }
}

async fn maybe_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
