use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::PrivacyLevel;
use super::user::User;

/// A task as it appears in the social timeline: the task itself joined with
/// its owner and like information for the requesting user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub privacy_level: PrivacyLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: i64,
    pub owner: User,
    pub likes_count: i64,
    pub liked_by_me: bool,
}
