//! HTTP client for the weather/auth backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, ReqwestErrorExt};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`. `timeout` of `None` leaves the
    /// transport default in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("skygate/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.effective_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// GET `path` and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.header("Authorization", Self::bearer(token));
        }

        let response = request.send().await.map_err(ReqwestErrorExt::into_api_error)?;
        let body = Self::handle_response(response).await?;
        Self::decode(&body)?.ok_or(ApiError::EmptyResponse)
    }

    /// POST `body` as JSON to `path` and decode a JSON body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_json_optional(path, body, token)
            .await?
            .ok_or(ApiError::EmptyResponse)
    }

    /// Like [`post_json`](Self::post_json) but an empty or `null` body
    /// yields `Ok(None)` instead of an error.
    pub async fn post_json_optional<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_post(path, body, token).await?;
        let text = Self::handle_response(response).await?;
        Self::decode(&text)
    }

    /// POST and only check the status; the response body is discarded.
    pub async fn post_discard<B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send_post(path, body, token).await?;
        Self::handle_response(response).await.map(|_| ())
    }

    async fn send_post<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.header("Authorization", Self::bearer(token));
        }
        request.send().await.map_err(ReqwestErrorExt::into_api_error)
    }

    /// Map non-2xx statuses to errors and return the raw body text.
    async fn handle_response(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();

        if status.is_success() {
            response.text().await.map_err(ReqwestErrorExt::into_api_error)
        } else if status.as_u16() == 401 {
            Err(ApiError::Unauthorized)
        } else {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!("Request failed with status {}: {}", status, text);
            Err(ApiError::Status {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<Option<T>, ApiError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
