//! Client core for the WhatToDo task service.
//!
//! # Overview
//! Everything a front-end needs short of rendering: an authenticated HTTP
//! client, durable token storage, the session lifecycle, and typed wrappers
//! for every backend endpoint (tasks, timeline, likes/follows, stats).
//!
//! # Design
//! - [`ApiClient`] owns the transport: `<base>/api/v1` path joining, bearer
//!   injection read from the [`TokenStore`] on every request, and the
//!   [`ApiError`] mapping. It is cheap to clone.
//! - [`AuthSession`] is the only stateful piece. It resolves the startup
//!   `Restoring` state, runs login/register/logout, and broadcasts
//!   [`SessionState`] transitions to subscribers.
//! - Resource clients are stateless; they never retry, cache, or interpret
//!   responses beyond typed deserialization.
//!
//! ```no_run
//! use std::sync::Arc;
//! use whattodo_core::{ApiClient, AuthSession, ClientConfig, FileTokenStore, TasksClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FileTokenStore::in_data_dir("whattodo")?);
//! let api = ApiClient::new(ClientConfig::from_env(), store)?;
//!
//! let session = AuthSession::new(&api);
//! session.restore().await;
//! if session.login("alice", "hunter2").await {
//!     let tasks = TasksClient::new(&api).list().await?;
//!     println!("{} open tasks", tasks.iter().filter(|t| !t.is_completed).count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{
    ApiClient, ApiError, AuthClient, Message, SocialClient, StatsClient, TasksClient,
    TimelineClient, Token,
};
pub use auth::{
    AuthSession, FileTokenStore, KeyringTokenStore, MemoryTokenStore, SessionState, StoreError,
    TokenStore,
};
pub use config::{ClientConfig, Config};
pub use models::{
    DailyStats, OverallStats, PeriodStats, PrivacyLevel, StreakInfo, Task, TaskCreate, TaskUpdate,
    TimelineItem, User, UserCreate,
};
