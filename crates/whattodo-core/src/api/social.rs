//! Social graph endpoints: likes on tasks and follow relationships.

use serde::Deserialize;

use crate::models::User;

use super::{ApiClient, ApiError};

/// `{"message": ...}` acknowledgement the action endpoints answer with.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Clone)]
pub struct SocialClient {
    api: ApiClient,
}

impl SocialClient {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn like(&self, task_id: i64) -> Result<Message, ApiError> {
        self.api.post_empty(&format!("/tasks/{task_id}/like")).await
    }

    pub async fn unlike(&self, task_id: i64) -> Result<Message, ApiError> {
        self.api.delete_json(&format!("/tasks/{task_id}/like")).await
    }

    pub async fn likes_count(&self, task_id: i64) -> Result<i64, ApiError> {
        self.api.get(&format!("/tasks/{task_id}/likes")).await
    }

    /// Ids of the users who liked a task.
    pub async fn liked_user_ids(&self, task_id: i64) -> Result<Vec<i64>, ApiError> {
        self.api.get(&format!("/tasks/{task_id}/likes/users")).await
    }

    pub async fn follow(&self, user_id: i64) -> Result<Message, ApiError> {
        self.api.post_empty(&format!("/users/{user_id}/follow")).await
    }

    pub async fn unfollow(&self, user_id: i64) -> Result<Message, ApiError> {
        self.api.delete_json(&format!("/users/{user_id}/follow")).await
    }

    /// Users following the current user.
    pub async fn followers(&self) -> Result<Vec<User>, ApiError> {
        self.api.get("/users/followers").await
    }

    /// Users the current user follows.
    pub async fn following(&self) -> Result<Vec<User>, ApiError> {
        self.api.get("/users/following").await
    }
}
