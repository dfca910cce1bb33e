//! atelier-protocol: Shared wire definitions for client-backend communication
//!
//! This crate defines the event types exchanged over the per-chat WebSocket
//! and the DTOs for the REST API. Pure data: serde in, serde out.

pub mod events;
pub mod types;

// Re-export main types at crate root
pub use events::{InboundEvent, SandboxStatus, TurnRequest, DEFAULT_APP_PORT};
pub use types::{
    AuthResponse, Chat, ChatCreate, ChatMessage, ChatUpdate, Project, Role, Stack, Team, User,
    UserCreate,
};
