use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completion counts for a single day. Rates are percentages (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
}

/// Completion counts for a week ("2023-W01") or month ("2023-01").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: String,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: i64,
    pub longest_streak: i64,
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
    pub streak_info: StreakInfo,
    pub daily_stats: Vec<DailyStats>,
    pub weekly_stats: Vec<PeriodStats>,
    pub monthly_stats: Vec<PeriodStats>,
}
