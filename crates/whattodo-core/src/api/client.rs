//! HTTP client for the WhatToDo REST API.
//!
//! `ApiClient` owns the transport: it joins request paths onto
//! `<base>/api/v1`, attaches the bearer token read from the token store, and
//! turns non-2xx responses into [`ApiError::Http`] with the body preserved.
//! Typed endpoint wrappers (`TasksClient` and friends) are built on top; this
//! layer never interprets payloads or statuses.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::config::ClientConfig;

use super::ApiError;

/// Every endpoint lives under this prefix on the backend
const API_PREFIX: &str = "/api/v1";

/// API client for the WhatToDo backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client from an explicit configuration and token store.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let base_url = format!("{}{}", config.base_url.trim_end_matches('/'), API_PREFIX);
        Ok(Self {
            client,
            base_url,
            store,
        })
    }

    /// The token store backing this client's Authorization header.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when the store holds a token.
    /// A store read failure counts as "no token": the request goes out
    /// unauthenticated and the backend decides.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.get() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "Token store read failed, sending request unauthenticated");
                request
            }
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, body))
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = self.authorize(request).send().await?;
        debug!(status = %response.status(), url = %response.url(), "Response received");
        Self::check_response(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    /// POST with no payload; the like/follow action endpoints take none.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.post(self.url(path))).await?;
        Ok(response.json().await?)
    }

    /// DELETE for endpoints that answer with no content.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    /// DELETE for endpoints that answer with a JSON body.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        Ok(response.json().await?)
    }

    /// POST a multipart form; the credential exchange uses this shape.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.client.post(self.url(path)).multipart(form))
            .await?;
        Ok(response.json().await?)
    }
}
