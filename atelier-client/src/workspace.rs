//! Derived workspace state
//!
//! Pure fold of inbound session events into the UI-visible model: the chat
//! transcript, sandbox file tree, suggested follow-ups, and the preview
//! cache-busting revision. Never touches the transport.

use atelier_protocol::{ChatMessage, Role};

use crate::session::SessionStatus;

/// Color class for the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Gray,
    Yellow,
    Green,
}

/// Presentation tuple for a session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub color: StatusColor,
}

/// Map a session status to its presentation.
pub fn status_presentation(status: SessionStatus) -> StatusPresentation {
    match status {
        SessionStatus::Disconnected => StatusPresentation {
            label: "Disconnected",
            color: StatusColor::Gray,
        },
        SessionStatus::Connecting | SessionStatus::SettingUp => StatusPresentation {
            label: "Setting up (~3m)",
            color: StatusColor::Yellow,
        },
        SessionStatus::Ready => StatusPresentation {
            label: "Ready",
            color: StatusColor::Green,
        },
    }
}

/// Derived UI state for one chat workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceModel {
    /// Ordered chat transcript
    pub transcript: Vec<ChatMessage>,
    /// Sandbox file listing, replaced wholesale on update
    pub file_tree: Vec<String>,
    /// Suggested follow-up prompts from the last completed turn
    pub follow_ups: Vec<String>,
    /// Bumped each time a turn completes; the preview pane re-fetches when
    /// it changes
    pub preview_revision: u64,
    /// True while an assistant turn is streaming
    awaiting_reply: bool,
}

impl WorkspaceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an assistant turn is streaming.
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Seed the transcript from a fetched chat history.
    pub fn seed_transcript(&mut self, messages: Vec<ChatMessage>) {
        self.transcript = messages;
        self.awaiting_reply = false;
    }

    /// Record an outgoing user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::user(content));
    }

    /// Fold one streamed chunk into the transcript.
    ///
    /// A fragment extends the last entry only when that entry is an
    /// assistant message of a still-open turn; otherwise it starts a new
    /// assistant entry. Applied exactly once per chunk, so a turn's message
    /// is the in-order concatenation of every fragment received for it.
    pub fn apply_chunk(
        &mut self,
        content: &str,
        complete: bool,
        follow_ups: Option<Vec<String>>,
    ) {
        match self.transcript.last_mut() {
            Some(last) if last.role == Role::Assistant && self.awaiting_reply => {
                last.content.push_str(content);
            }
            _ => self.transcript.push(ChatMessage::assistant(content)),
        }

        self.awaiting_reply = !complete;
        if complete {
            self.preview_revision += 1;
        }
        if let Some(follow_ups) = follow_ups {
            self.follow_ups = follow_ups;
        }
    }

    /// Replace the sandbox file listing atomically.
    pub fn replace_file_tree(&mut self, paths: Vec<String>) {
        self.file_tree = paths;
    }
}
