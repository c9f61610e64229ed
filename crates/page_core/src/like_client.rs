use async_trait::async_trait;
use reqwest::{header, Client};
use shared::{
    domain::{LikeStatus, ProjectId, UserId},
    error::ApiError,
    protocol::{like_route, LikeResponse},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("like request could not be completed: {0}")]
    Transport(String),
    #[error("like request rejected with HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("like response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LikeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Toggles a project's like on the server.
#[async_trait]
pub trait LikeClient: Send + Sync {
    async fn toggle_like(&self, project_id: ProjectId) -> Result<LikeStatus, LikeError>;
}

/// `POST /projects/{project_id}/like` over HTTP.
#[derive(Clone)]
pub struct HttpLikeClient {
    http: Client,
    server_url: Url,
    user_id: Option<UserId>,
}

impl HttpLikeClient {
    pub fn new(server_url: &str) -> Result<Self, LikeError> {
        Ok(Self {
            http: Client::new(),
            server_url: Url::parse(server_url)?,
            user_id: None,
        })
    }

    /// Identifies the liking user; the server answers 401 without one.
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn endpoint(&self, project_id: ProjectId) -> Result<Url, LikeError> {
        let mut url = self.server_url.join(&like_route(project_id))?;
        if let Some(user_id) = self.user_id {
            url.query_pairs_mut()
                .append_pair("user_id", &user_id.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl LikeClient for HttpLikeClient {
    async fn toggle_like(&self, project_id: ProjectId) -> Result<LikeStatus, LikeError> {
        let url = self.endpoint(project_id)?;
        let response = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiError>(&body) {
                Ok(api_error) => api_error.message,
                Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
            };
            return Err(LikeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: LikeResponse = serde_json::from_slice(&body)?;
        debug!(project_id = project_id.0, status = %parsed.status, "like response received");
        Ok(parsed.like_status())
    }
}

#[cfg(test)]
#[path = "tests/like_client_tests.rs"]
mod tests;
