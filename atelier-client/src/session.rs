//! Session coordination
//!
//! Owns the lifecycle of one chat session: the socket handle, the session
//! status machine, and the derived workspace state. Inbound events are pulled
//! with [`SessionCoordinator::recv_event`] and folded in with
//! [`SessionCoordinator::apply`], which keeps the caller free to render the
//! event (print a fragment, update a status line) before the fold mutates
//! the model.

use atelier_protocol::{
    ChatMessage, InboundEvent, SandboxStatus, TurnRequest, DEFAULT_APP_PORT,
};
use atelier_utils::{AtelierError, Result};

use crate::socket::SocketHandle;
use crate::workspace::WorkspaceModel;

/// Lifecycle status of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No socket, or the socket has closed
    Disconnected,
    /// WebSocket handshake in flight
    Connecting,
    /// Connected, sandbox not yet serving the app
    SettingUp,
    /// Sandbox is serving; the preview URL is live
    Ready,
}

/// Coordinator for one live chat session.
///
/// Holds at most one socket handle at a time: opening a session closes any
/// previous one first, so stale transports can never feed events into the
/// current session.
pub struct SessionCoordinator {
    socket: Option<SocketHandle>,
    status: SessionStatus,
    preview_url: Option<String>,
    model: WorkspaceModel,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self {
            socket: None,
            status: SessionStatus::Disconnected,
            preview_url: None,
            model: WorkspaceModel::new(),
        }
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Preview URL of the running app, if the sandbox has reported one
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Derived workspace state
    pub fn model(&self) -> &WorkspaceModel {
        &self.model
    }

    /// True once a session is open (connected, setting up or ready)
    pub fn is_open(&self) -> bool {
        matches!(self.status, SessionStatus::SettingUp | SessionStatus::Ready)
    }

    /// Seed the transcript from fetched chat history.
    pub fn seed_transcript(&mut self, messages: Vec<ChatMessage>) {
        self.model.seed_transcript(messages);
    }

    /// Record an outgoing user message in the transcript.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.model.push_user(content);
    }

    /// Open a session to the given endpoint.
    ///
    /// Any previously open session is closed first; at most one socket is
    /// live at a time. On success the session enters `SettingUp` and stays
    /// there until a status event reports the sandbox up.
    pub async fn open(&mut self, url: impl Into<String>) -> Result<()> {
        self.close();

        let mut socket = SocketHandle::new(url);
        self.status = SessionStatus::Connecting;

        if let Err(e) = socket.connect().await {
            self.status = SessionStatus::Disconnected;
            return Err(e);
        }

        self.socket = Some(socket);
        self.status = SessionStatus::SettingUp;
        Ok(())
    }

    /// Close the session. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            socket.disconnect();
        }
        self.status = SessionStatus::Disconnected;
        self.preview_url = None;
    }

    /// Receive the next inbound event.
    ///
    /// Yields `None` exactly once when the transport closes, after which the
    /// session is back in `Disconnected`.
    pub async fn recv_event(&mut self) -> Option<InboundEvent> {
        let socket = self.socket.as_mut()?;
        match socket.recv().await {
            Some(event) => Some(event),
            None => {
                self.close();
                None
            }
        }
    }

    /// Fold one inbound event into the session.
    pub fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::SandboxStatus {
                status,
                tunnels,
                file_paths,
            } => {
                self.status = if status.is_up() {
                    SessionStatus::Ready
                } else {
                    SessionStatus::SettingUp
                };
                // Latest report wins; an absent tunnel keeps the last URL so
                // a rebuild does not blank the preview pane
                if let Some(url) = tunnels.get(&DEFAULT_APP_PORT) {
                    self.preview_url = Some(url.clone());
                }
                if let Some(paths) = file_paths {
                    self.model.replace_file_tree(paths);
                }
                tracing::debug!(?status, "Sandbox status updated");
            }
            InboundEvent::ChatChunk {
                content,
                complete,
                suggested_follow_ups,
            } => {
                self.model.apply_chunk(&content, complete, suggested_follow_ups);
            }
            InboundEvent::SandboxFileTree { paths } => {
                self.model.replace_file_tree(paths);
            }
            InboundEvent::Unknown => {
                tracing::trace!("Ignoring event with unrecognized tag");
            }
        }
    }

    /// Send a user turn over the open session.
    ///
    /// Fails with `NotConnected` before the session is open; the request is
    /// never buffered for later.
    pub async fn send_turn(&self, messages: Vec<ChatMessage>) -> Result<()> {
        let socket = match (&self.socket, self.is_open()) {
            (Some(socket), true) => socket,
            _ => return Err(AtelierError::NotConnected),
        };
        socket.send(TurnRequest::new(messages)).await
    }
}

impl Default for SessionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
