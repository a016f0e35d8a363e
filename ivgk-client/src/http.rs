//! HTTP transport
//!
//! [`HttpClient`] is the seam the per-resource APIs are written against.
//! [`ApiClient`] is the network implementation: it attaches the bearer
//! token from the [`SessionStore`] and, on a 401, refreshes the access token
//! once and replays the request once.

use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use ivgk_editor::AssetUpload;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{RefreshRequest, RefreshResponse};
use shared::response::extract_error_message;
use std::sync::Arc;

pub const REFRESH_PATH: &str = "auth/refresh";

/// Multipart body: text fields plus one file part
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file: AssetUpload,
}

impl MultipartBody {
    pub fn new(file: AssetUpload) -> Self {
        Self {
            fields: Vec::new(),
            file_field: "file".to_string(),
            file,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Build a fresh form; a form is consumed by each send
    fn to_form(&self) -> ClientResult<Form> {
        let mut part = Part::bytes(self.file.bytes.clone()).file_name(self.file.file_name.clone());
        if let Some(content_type) = &self.file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = self
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part(self.file_field.clone(), part);
        Ok(form)
    }
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;

    async fn get_query<T: DeserializeOwned + Send, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;

    async fn post_multipart<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &MultipartBody,
    ) -> ClientResult<T>;

    /// Session backing the bearer token
    fn session(&self) -> &dyn SessionStore;
}

/// Network HTTP client for the IVGK backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Exchange the refresh token for a new access token and store it
    pub async fn refresh_access_token(&self, refresh_token: &str) -> ClientResult<String> {
        tracing::debug!("Refreshing access token");
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;
        let RefreshResponse { access_token } = handle_response(response).await?;
        self.session.update_access_token(&access_token)?;
        Ok(access_token)
    }

    /// Send with the stored bearer token; on 401 refresh once and replay once
    async fn execute<T, F>(&self, build: F) -> ClientResult<T>
    where
        T: DeserializeOwned + Send,
        F: Fn() -> ClientResult<RequestBuilder> + Send + Sync,
    {
        let session = self.session.load();
        let response = with_bearer(build()?, session.access_token.as_deref())
            .send()
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return handle_response(response).await;
        }

        let Some(refresh_token) = session.refresh_token.filter(|t| !t.is_empty()) else {
            tracing::debug!(url = %response.url(), "Unauthorized without refresh token, clearing session");
            self.session.clear();
            return Err(api_error(response).await);
        };

        let access_token = match self.refresh_access_token(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                self.session.clear();
                return Err(e);
            }
        };

        let response = with_bearer(build()?, Some(&access_token)).send().await?;
        tracing::debug!(url = %response.url(), status = %response.status(), "Replayed request after refresh");
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "Still unauthorized after refresh, clearing session");
            self.session.clear();
            return Err(api_error(response).await);
        }
        handle_response(response).await
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::Api {
        status,
        message: extract_error_message(&body),
    }
}

/// Non-success statuses become [`ClientError::Api`]; an empty success body
/// reads as JSON `null`
async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        let err = api_error(response).await;
        tracing::debug!(url = %url, status = %status, code = %err.code(), "Request rejected");
        return Err(err);
    }
    let text = response.text().await?;
    let body = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl HttpClient for ApiClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.get(&url))).await
    }

    async fn get_query<T: DeserializeOwned + Send, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.get(&url).query(query))).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.post(&url).json(body))).await
    }

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.patch(&url).json(body))).await
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.delete(&url))).await
    }

    async fn post_multipart<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &MultipartBody,
    ) -> ClientResult<T> {
        let url = self.url(path);
        self.execute(|| Ok(self.client.post(&url).multipart(body.to_form()?)))
            .await
    }

    fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }
}
