//! REST API clients for the WhatToDo backend.
//!
//! `ApiClient` is the transport layer: base URL joining, bearer injection,
//! error mapping. The per-resource clients (`AuthClient`, `TasksClient`,
//! `TimelineClient`, `SocialClient`, `StatsClient`) are stateless typed
//! wrappers over it, one method per endpoint.
//!
//! The API uses JWT bearer token authentication obtained through the
//! `/login/access-token` credential exchange.

pub mod auth;
pub mod client;
pub mod error;
pub mod social;
pub mod stats;
pub mod tasks;
pub mod timeline;

pub use auth::{AuthClient, Token};
pub use client::ApiClient;
pub use error::ApiError;
pub use social::{Message, SocialClient};
pub use stats::StatsClient;
pub use tasks::TasksClient;
pub use timeline::TimelineClient;
