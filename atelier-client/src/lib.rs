//! atelier-client: client for chat-driven workspace sessions
//!
//! Talks to the atelier backend over REST (auth, chats, teams, stacks) and a
//! per-chat WebSocket (streamed assistant turns, sandbox status, file tree).
//! The session layer is a small state machine: a [`socket::SocketHandle`]
//! owns the transport, the [`session::SessionCoordinator`] owns the handle
//! and dispatches inbound events, and the [`workspace::WorkspaceModel`] is
//! the pure fold of those events into UI-visible state.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod session;
pub mod socket;
pub mod workspace;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use session::{SessionCoordinator, SessionStatus};
pub use socket::{ConnectionState, SocketHandle};
pub use workspace::{StatusColor, StatusPresentation, WorkspaceModel};
