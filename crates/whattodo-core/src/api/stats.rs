//! Completion statistics endpoints.

use crate::models::{OverallStats, StreakInfo};

use super::{ApiClient, ApiError};

#[derive(Clone)]
pub struct StatsClient {
    api: ApiClient,
}

impl StatsClient {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    /// Totals, streaks, and per-day/week/month completion rates.
    pub async fn overview(&self) -> Result<OverallStats, ApiError> {
        self.api.get("/stats/overview").await
    }

    pub async fn streak(&self) -> Result<StreakInfo, ApiError> {
        self.api.get("/stats/streak").await
    }
}
