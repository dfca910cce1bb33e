//! WebSocket connection to a chat session
//!
//! Provides the single socket connection to one backend chat session with
//! JSON frame decoding and async dispatch.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};

use atelier_protocol::{InboundEvent, TurnRequest};
use atelier_utils::{AtelierError, Result};

/// Deadline for the WebSocket handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One WebSocket connection to a chat session endpoint.
///
/// The handle owns the inbound channel; whoever owns the handle is the single
/// consumer of inbound events. When the transport closes (locally or
/// remotely), [`SocketHandle::recv`] yields `None` exactly once as the close
/// notification.
pub struct SocketHandle {
    /// Session endpoint URL (ws:// or wss://)
    url: String,
    /// Handshake deadline
    connect_timeout: Duration,
    /// Current state
    state: ConnectionState,
    /// Channel for outgoing turn requests
    tx: mpsc::Sender<TurnRequest>,
    /// Channel for receiving decoded events
    rx: mpsc::Receiver<InboundEvent>,
    /// Handle to the connection task
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SocketHandle {
    /// Create a new handle (not yet connected)
    pub fn new(url: impl Into<String>) -> Self {
        let (tx, _) = mpsc::channel(64);
        let (_, rx) = mpsc::channel(64);

        Self {
            url: url.into(),
            connect_timeout: CONNECT_TIMEOUT,
            state: ConnectionState::Disconnected,
            tx,
            rx,
            task_handle: None,
        }
    }

    /// Override the handshake deadline (used by tests)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Get current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connect to the session endpoint.
    ///
    /// Resolves once the WebSocket handshake completes, fails with
    /// `Connection` if the transport errors first, and with
    /// `ConnectionTimeout` if neither happens within the deadline.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;

        let (ws, _response) = match tokio::time::timeout(
            self.connect_timeout,
            connect_async(&self.url),
        )
        .await
        {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                self.state = ConnectionState::Disconnected;
                return Err(AtelierError::connection(format!(
                    "Failed to connect to {}: {}",
                    self.url, e
                )));
            }
            Err(_) => {
                self.state = ConnectionState::Disconnected;
                return Err(AtelierError::ConnectionTimeout {
                    seconds: self.connect_timeout.as_secs(),
                });
            }
        };

        // Set up channels
        let (outgoing_tx, outgoing_rx) = mpsc::channel::<TurnRequest>(64);
        let (incoming_tx, incoming_rx) = mpsc::channel::<InboundEvent>(64);

        self.tx = outgoing_tx;
        self.rx = incoming_rx;

        // Spawn connection task
        let handle = tokio::spawn(Self::connection_task(ws, outgoing_rx, incoming_tx));
        self.task_handle = Some(handle);

        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Send a turn request to the backend.
    ///
    /// Fails with `NotConnected` if called before `connect()` has resolved;
    /// frames are never silently dropped.
    pub async fn send(&self, request: TurnRequest) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(AtelierError::NotConnected);
        }

        self.tx
            .send(request)
            .await
            .map_err(|_| AtelierError::ConnectionClosed)?;

        Ok(())
    }

    /// Receive the next inbound event (blocking).
    ///
    /// Yields `None` once the transport has closed, whether the close was
    /// initiated locally or remotely.
    pub async fn recv(&mut self) -> Option<InboundEvent> {
        self.rx.recv().await
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Option<InboundEvent> {
        self.rx.try_recv().ok()
    }

    /// Close the transport. Idempotent: closing an already-closed handle is
    /// a no-op.
    pub fn disconnect(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Background task that handles the actual socket I/O
    async fn connection_task(
        ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
        mut outgoing: mpsc::Receiver<TurnRequest>,
        incoming: mpsc::Sender<InboundEvent>,
    ) {
        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                // Handle outgoing turn requests
                Some(request) = outgoing.recv() => {
                    let text = match serde_json::to_string(&request) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode turn request: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        tracing::error!("Failed to send frame: {}", e);
                        break;
                    }
                }

                // Handle incoming frames
                result = stream.next() => {
                    match result {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<InboundEvent>(&text) {
                                Ok(event) => {
                                    tracing::debug!(
                                        event_type = event.type_name(),
                                        "Received event from session socket"
                                    );
                                    if incoming.send(event).await.is_err() {
                                        // Receiver dropped
                                        tracing::debug!("Incoming channel closed, receiver dropped");
                                        break;
                                    }
                                }
                                // One bad frame must not tear down the session
                                Err(e) => {
                                    tracing::warn!("Skipping undecodable frame: {}", e);
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Server closed connection");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ping/pong/binary frames carry no session events
                        }
                        Some(Err(e)) => {
                            tracing::error!("WebSocket error: {}", e);
                            break;
                        }
                        None => {
                            tracing::info!("Connection stream ended");
                            break;
                        }
                    }
                }
            }
        }
        // Dropping `incoming` here ends the inbound channel, which is the
        // close notification the consumer sees exactly once.
    }
}
