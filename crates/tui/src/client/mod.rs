use reqwest::Url;
use serde::Deserialize;

use api_types::{
    category::CategoryListResponse,
    comment::{CommentCreated, CommentNew},
    complaint::{ComplaintCreated, ComplaintListResponse, ComplaintNew, ComplaintView},
    location::LocationListResponse,
    stats::Statistics,
    support::{SupportCheck, SupportState, SupportToggle},
};

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

impl ClientError {
    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "Not found.".to_string(),
            Self::Conflict(message) => format!("Conflict: {message}"),
            Self::Validation(message) => format!("Validation error: {message}"),
            Self::Server(message) => format!("Server error: {message}"),
            Self::Transport(err) => format!("Server unreachable: {err}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    /// Map a non-success response onto the client error taxonomy, pulling the
    /// human-readable message out of the JSON error body when there is one.
    async fn error_for(res: reqwest::Response) -> ClientError {
        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        match status.as_u16() {
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            400 | 422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        }
    }

    pub async fn complaints(&self) -> std::result::Result<Vec<ComplaintView>, ClientError> {
        let res = self
            .http
            .get(self.endpoint("api/complaints")?)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let body: ComplaintListResponse = res.json().await.map_err(ClientError::Transport)?;
        Ok(body.complaints)
    }

    pub async fn submit_complaint(
        &self,
        payload: &ComplaintNew,
    ) -> std::result::Result<String, ClientError> {
        let res = self
            .http
            .post(self.endpoint("api/complaints")?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let created: ComplaintCreated = res.json().await.map_err(ClientError::Transport)?;
        Ok(created.id)
    }

    pub async fn toggle_support(
        &self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> std::result::Result<SupportState, ClientError> {
        let res = self
            .http
            .post(self.endpoint(&format!("api/complaints/{complaint_id}/support"))?)
            .json(&SupportToggle {
                user_identifier: user_identifier.to_string(),
            })
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        res.json().await.map_err(ClientError::Transport)
    }

    pub async fn has_supported(
        &self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> std::result::Result<bool, ClientError> {
        let res = self
            .http
            .get(self.endpoint(&format!(
                "api/complaints/{complaint_id}/support/{user_identifier}"
            ))?)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let body: SupportCheck = res.json().await.map_err(ClientError::Transport)?;
        Ok(body.supported)
    }

    pub async fn add_comment(
        &self,
        complaint_id: &str,
        payload: &CommentNew,
    ) -> std::result::Result<String, ClientError> {
        let res = self
            .http
            .post(self.endpoint(&format!("api/complaints/{complaint_id}/comments"))?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let created: CommentCreated = res.json().await.map_err(ClientError::Transport)?;
        Ok(created.id)
    }

    pub async fn categories(&self) -> std::result::Result<Vec<String>, ClientError> {
        let res = self
            .http
            .get(self.endpoint("api/categories")?)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let body: CategoryListResponse = res.json().await.map_err(ClientError::Transport)?;
        Ok(body.categories)
    }

    pub async fn locations(&self) -> std::result::Result<Vec<String>, ClientError> {
        let res = self
            .http
            .get(self.endpoint("api/locations")?)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        let body: LocationListResponse = res.json().await.map_err(ClientError::Transport)?;
        Ok(body.locations)
    }

    pub async fn stats(&self) -> std::result::Result<Statistics, ClientError> {
        let res = self
            .http
            .get(self.endpoint("api/stats")?)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !res.status().is_success() {
            return Err(Self::error_for(res).await);
        }
        res.json().await.map_err(ClientError::Transport)
    }
}
