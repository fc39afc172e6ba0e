//! Timeline feeds: the user's own feed and public discovery.

use crate::models::TimelineItem;

use super::{ApiClient, ApiError};

#[derive(Clone)]
pub struct TimelineClient {
    api: ApiClient,
}

impl TimelineClient {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    /// Tasks from the current user and everyone they follow.
    pub async fn timeline(&self) -> Result<Vec<TimelineItem>, ApiError> {
        self.api.get("/timeline/").await
    }

    /// Public tasks from across the service.
    pub async fn explore(&self) -> Result<Vec<TimelineItem>, ApiError> {
        self.api.get("/timeline/explore").await
    }
}
