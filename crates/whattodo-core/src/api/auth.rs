//! Authentication endpoints: credential exchange, registration, and the
//! current-user profile.

use reqwest::multipart::Form;
use serde::Deserialize;

use crate::models::{User, UserCreate};

use super::{ApiClient, ApiError};

/// Response from the credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    /// Exchange credentials for a bearer token. The backend accepts either a
    /// username or an email in the `username` field of the multipart form.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let form = Form::new()
            .text("username", username.to_string())
            .text("password", password.to_string());
        self.api.post_form("/login/access-token", form).await
    }

    /// Create an account. Does not log the new user in.
    pub async fn register(&self, user: &UserCreate) -> Result<User, ApiError> {
        self.api.post("/users/", user).await
    }

    /// Profile of the user the current token belongs to.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.api.get("/users/me").await
    }
}
