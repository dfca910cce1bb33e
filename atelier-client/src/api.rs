//! REST client for the atelier backend
//!
//! Covers auth, chats, teams, projects, and stacks. Every authenticated call
//! takes the credentials explicitly so the caller decides when a rejected
//! token gets cleared.

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use atelier_protocol::{
    AuthResponse, Chat, ChatCreate, ChatUpdate, Project, Stack, Team, User, UserCreate,
};
use atelier_utils::{AtelierError, Result};

use crate::credentials::Credentials;

/// HTTP client for the atelier backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| AtelierError::config(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Create an account and receive a bearer token.
    pub async fn create_user(&self, username: &str) -> Result<AuthResponse> {
        let url = self.endpoint("/api/auth/create")?;
        let response = self
            .http
            .post(url)
            .json(&UserCreate {
                username: username.to_string(),
            })
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Fetch the authenticated user.
    pub async fn me(&self, creds: &Credentials) -> Result<User> {
        let url = self.endpoint("/api/auth/me")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// List the user's chats (summaries, no messages).
    pub async fn list_chats(&self, creds: &Credentials) -> Result<Vec<Chat>> {
        let url = self.endpoint("/api/chats")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Create a chat, optionally seeded from a stack.
    pub async fn create_chat(&self, creds: &Credentials, body: &ChatCreate) -> Result<Chat> {
        let url = self.endpoint("/api/chats")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(creds.token())
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Fetch one chat with its full message history.
    pub async fn get_chat(&self, creds: &Credentials, chat_id: i64) -> Result<Chat> {
        let url = self.endpoint(&format!("/api/chats/{}", chat_id))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Rename or re-describe a chat.
    pub async fn update_chat(
        &self,
        creds: &Credentials,
        chat_id: i64,
        body: &ChatUpdate,
    ) -> Result<Chat> {
        let url = self.endpoint(&format!("/api/chats/{}", chat_id))?;
        let response = self
            .http
            .patch(url)
            .bearer_auth(creds.token())
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Delete a chat.
    pub async fn delete_chat(&self, creds: &Credentials, chat_id: i64) -> Result<()> {
        let url = self.endpoint(&format!("/api/chats/{}", chat_id))?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).await?;
        Ok(())
    }

    /// List the user's teams.
    pub async fn list_teams(&self, creds: &Credentials) -> Result<Vec<Team>> {
        let url = self.endpoint("/api/teams")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// List a team's projects.
    pub async fn team_projects(&self, creds: &Credentials, team_id: i64) -> Result<Vec<Project>> {
        let url = self.endpoint(&format!("/api/teams/{}/projects", team_id))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Fetch one project.
    pub async fn get_project(
        &self,
        creds: &Credentials,
        team_id: i64,
        project_id: i64,
    ) -> Result<Project> {
        let url = self.endpoint(&format!("/api/teams/{}/projects/{}", team_id, project_id))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// List the available starter stacks.
    pub async fn list_stacks(&self, creds: &Credentials) -> Result<Vec<Stack>> {
        let url = self.endpoint("/api/stacks")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(creds.token())
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }
}

fn request_error(e: reqwest::Error) -> AtelierError {
    AtelierError::connection(format!("Request failed: {}", e))
}

/// Pass through a successful response, otherwise map the status and body to
/// an API error (401 becomes `Unauthorized`).
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        message
    };
    Err(AtelierError::api(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| AtelierError::invalid_message(format!("Invalid API response: {}", e)))
}
