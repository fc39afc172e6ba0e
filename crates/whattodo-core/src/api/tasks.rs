//! Task CRUD endpoints.
//!
//! A thin, stateless layer: fixed path templates over [`ApiClient`], no
//! caching and no payload interpretation. Errors pass through unchanged.

use crate::models::{Task, TaskCreate, TaskUpdate};

use super::{ApiClient, ApiError};

#[derive(Clone)]
pub struct TasksClient {
    api: ApiClient,
}

impl TasksClient {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    /// All tasks owned by the current user.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.api.get("/tasks/").await
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        self.api.get(&format!("/tasks/{id}")).await
    }

    pub async fn create(&self, task: &TaskCreate) -> Result<Task, ApiError> {
        self.api.post("/tasks/", task).await
    }

    /// Partial update; only the fields set in `update` are sent.
    pub async fn update(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.api.put(&format!("/tasks/{id}"), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/tasks/{id}")).await
    }
}
