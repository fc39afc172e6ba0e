//! Data models for WhatToDo entities.
//!
//! These mirror the backend's wire schemas:
//!
//! - `Task`, `TaskCreate`, `TaskUpdate`, `PrivacyLevel`: tasks and their
//!   create/partial-update payloads
//! - `User`, `UserCreate`: accounts and registration
//! - `TimelineItem`: a task joined with its owner and like info
//! - `OverallStats`, `DailyStats`, `PeriodStats`, `StreakInfo`: completion
//!   statistics

pub mod stats;
pub mod task;
pub mod timeline;
pub mod user;

pub use stats::{DailyStats, OverallStats, PeriodStats, StreakInfo};
pub use task::{PrivacyLevel, Task, TaskCreate, TaskUpdate};
pub use timeline::TimelineItem;
pub use user::{User, UserCreate};
