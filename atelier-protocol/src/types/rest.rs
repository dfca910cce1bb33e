//! REST API request/response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChatMessage;

/// An authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Body for `POST /api/auth/create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserCreate {
    pub username: String,
}

/// Response from `POST /api/auth/create`: the user plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// A team the user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A generated project (one sandboxed starter app).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A chat workspace. `messages` is populated only when fetching a single
/// chat; list endpoints return summaries without it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub project: Option<Project>,
}

/// Body for `POST /api/chats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_prompt: Option<String>,
}

/// Body for `PATCH /api/chats/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A starter template (Next.js, p5.js, pixi.js, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stack {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub from_registry: String,
    pub sandbox_init_cmd: String,
    pub sandbox_start_cmd: String,
}
