//! Data types shared between the socket events and the REST API

mod chat;
mod rest;

pub use chat::{ChatMessage, Role};
pub use rest::{
    AuthResponse, Chat, ChatCreate, ChatUpdate, Project, Stack, Team, User, UserCreate,
};
