// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Terminal chat client. Lines typed on stdin go to the configured peer;
//! events from the connection manager are printed as they arrive.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use stayclaims::provider::{CredentialProvider, FileCredentials, StaticCredentials};
use staychat::event::{ChatEvent, Sender};
use staychat::manager::{self, ChatConfig};
use staychat::transport::WsConnector;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "staychat", about = "Terminal client for Stayline messaging")]
struct ChatArgs {
    /// Messaging endpoint; http(s) URLs are mapped to ws(s).
    #[arg(long, env = "STAYCHAT_ENDPOINT", default_value = "ws://127.0.0.1:8701/chat")]
    endpoint: String,

    /// Conversation partner user id.
    #[arg(long, env = "STAYCHAT_PEER")]
    peer: String,

    /// Bearer token value.
    #[arg(long, env = "STAYCHAT_TOKEN", conflicts_with = "token_file")]
    token: Option<String>,

    /// File holding the bearer token; re-read on every reconnect so a
    /// refreshed credential is picked up without restarting.
    #[arg(long, env = "STAYCHAT_TOKEN_FILE")]
    token_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = ChatArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let provider: Arc<dyn CredentialProvider> = match (&args.token, &args.token_file) {
        (_, Some(path)) => Arc::new(FileCredentials::new(path)),
        (Some(token), None) => Arc::new(StaticCredentials::new(token)),
        (None, None) => Arc::new(StaticCredentials::anonymous()),
    };

    let config = ChatConfig::new(&args.endpoint).with_peer(&args.peer);
    let peer = args.peer;
    let (handle, mut events) = manager::spawn(config, WsConnector, provider);
    handle.connect()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                None => break,
                Some(event) => print_event(&peer, event),
            },
            line = lines.next_line() => match line? {
                None => break,
                Some(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line {
                        "/quit" => break,
                        "/connect" => handle.connect()?,
                        "/disconnect" => handle.disconnect()?,
                        "/typing" => handle.send_typing(&peer)?,
                        _ => handle.send_message(&peer, line, None)?,
                    }
                }
            },
        }
    }

    handle.disconnect()?;
    Ok(())
}

fn print_event(peer: &str, event: ChatEvent) {
    match event {
        ChatEvent::Status(status) => println!("* {status}"),
        ChatEvent::Message(msg) => {
            let who = match msg.sender {
                Sender::Own => "me",
                Sender::Other => peer,
            };
            println!("<{who}> {}", msg.text);
        }
        ChatEvent::History(batch) => {
            println!("* {} messages in history", batch.len());
            for msg in batch {
                let who = match msg.sender {
                    Sender::Own => "me",
                    Sender::Other => peer,
                };
                println!("  <{who}> {}", msg.text);
            }
        }
        ChatEvent::Typing(true) => println!("* {peer} is typing"),
        ChatEvent::Typing(false) => println!("* {peer} stopped typing"),
        ChatEvent::Error(err) => println!("! {err}"),
    }
}
