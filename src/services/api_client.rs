//! REST client for the notes backend.
//!
//! [`NotesBackend`] mirrors the backend's endpoints one method per route;
//! [`HttpBackend`] implements it over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::config::AppConfig;
use crate::types::errors::ApiError;
use crate::types::note::{NotePositionUpdate, StickyNote};
use crate::types::notebook::Notebook;
use crate::types::session::{VerifyTokenRequest, VerifyTokenResponse};
use crate::types::user::UserInfo;

/// Operations offered by the notes backend.
#[async_trait]
pub trait NotesBackend: Send + Sync {
    /// Returns the profile for a valid identity token, `None` when the backend rejects it.
    async fn verify_token(&self, token: &str) -> Result<Option<UserInfo>, ApiError>;
    async fn list_notebooks(&self, user_id: &str) -> Result<Vec<Notebook>, ApiError>;
    async fn create_notebook(&self, id: &str, user_id: &str, name: &str) -> Result<(), ApiError>;
    async fn rename_notebook(&self, id: &str, name: &str) -> Result<(), ApiError>;
    async fn delete_notebook(&self, id: &str, user_id: &str) -> Result<(), ApiError>;
    async fn list_notes(&self, notebook_id: &str, user_id: &str) -> Result<Vec<StickyNote>, ApiError>;
    async fn create_note(&self, notebook_id: &str, user_id: &str, note: &StickyNote) -> Result<(), ApiError>;
    async fn update_note_position(&self, id: &str, position: NotePositionUpdate) -> Result<(), ApiError>;
    async fn delete_note(&self, id: &str, user_id: &str) -> Result<(), ApiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateNotebookBody<'a> {
    id: &'a str,
    user_id: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct RenameNotebookBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnerBody<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteBody<'a> {
    user_id: &'a str,
    id: &'a str,
    x_percent: f64,
    y_percent: f64,
    content: &'a str,
}

#[derive(Deserialize)]
struct NotebooksResponse {
    notebooks: Vec<Notebook>,
}

#[derive(Deserialize)]
struct NotesResponse {
    notes: Vec<StickyNote>,
}

/// `NotesBackend` implementation that talks HTTP to the configured server.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds a client for `config.server_url` with the configured request timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.server_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Network(format!("invalid server url {}: {}", config.server_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Network(format!("invalid server url {}", config.server_url)));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Absolute URL for a backend route. Each segment is percent-encoded, so
    /// ids cannot escape their path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("invalid server url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let reason = status.canonical_reason().unwrap_or("unknown status").to_string();
        Err(ApiError::Status(status.as_u16(), reason))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

#[async_trait]
impl NotesBackend for HttpBackend {
    async fn verify_token(&self, token: &str) -> Result<Option<UserInfo>, ApiError> {
        debug!("POST /auth/verify-token");
        let body = VerifyTokenRequest {
            google_token: token.to_string(),
        };
        let request = self.client.post(self.endpoint(&["auth", "verify-token"])?).json(&body);
        let response: VerifyTokenResponse = Self::send_json(request).await?;
        Ok(response.user)
    }

    async fn list_notebooks(&self, user_id: &str) -> Result<Vec<Notebook>, ApiError> {
        debug!("GET /notebooks userId={}", user_id);
        let request = self
            .client
            .get(self.endpoint(&["notebooks"])?)
            .query(&[("userId", user_id)]);
        let response: NotebooksResponse = Self::send_json(request).await?;
        Ok(response.notebooks)
    }

    async fn create_notebook(&self, id: &str, user_id: &str, name: &str) -> Result<(), ApiError> {
        debug!("POST /notebooks id={}", id);
        let body = CreateNotebookBody { id, user_id, name };
        Self::send(self.client.post(self.endpoint(&["notebooks"])?).json(&body)).await?;
        Ok(())
    }

    async fn rename_notebook(&self, id: &str, name: &str) -> Result<(), ApiError> {
        debug!("PATCH /notebooks/{}", id);
        let body = RenameNotebookBody { name };
        let url = self.endpoint(&["notebooks", id])?;
        Self::send(self.client.patch(url).json(&body)).await?;
        Ok(())
    }

    async fn delete_notebook(&self, id: &str, user_id: &str) -> Result<(), ApiError> {
        debug!("DELETE /notebooks/{}", id);
        let url = self.endpoint(&["notebooks", id])?;
        Self::send(self.client.delete(url).json(&OwnerBody { user_id })).await?;
        Ok(())
    }

    async fn list_notes(&self, notebook_id: &str, user_id: &str) -> Result<Vec<StickyNote>, ApiError> {
        debug!("GET /notes/{}", notebook_id);
        let request = self
            .client
            .get(self.endpoint(&["notes", notebook_id])?)
            .query(&[("userId", user_id)]);
        let response: NotesResponse = Self::send_json(request).await?;
        Ok(response.notes)
    }

    async fn create_note(&self, notebook_id: &str, user_id: &str, note: &StickyNote) -> Result<(), ApiError> {
        debug!("POST /notes/{} id={}", notebook_id, note.id);
        let body = CreateNoteBody {
            user_id,
            id: &note.id,
            x_percent: note.x_percent,
            y_percent: note.y_percent,
            content: &note.content,
        };
        let url = self.endpoint(&["notes", notebook_id])?;
        Self::send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn update_note_position(&self, id: &str, position: NotePositionUpdate) -> Result<(), ApiError> {
        debug!("PATCH /notes/{}", id);
        let url = self.endpoint(&["notes", id])?;
        Self::send(self.client.patch(url).json(&position)).await?;
        Ok(())
    }

    async fn delete_note(&self, id: &str, user_id: &str) -> Result<(), ApiError> {
        debug!("DELETE /notes/{}", id);
        let url = self.endpoint(&["notes", id])?;
        Self::send(self.client.delete(url).json(&OwnerBody { user_id })).await?;
        Ok(())
    }
}
