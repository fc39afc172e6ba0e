//! Session lifecycle and token persistence.
//!
//! `AuthSession` drives restore/login/register/logout and tells subscribers
//! when the session state changes. The `TokenStore` backends decide where
//! the bearer token lives between runs: a JSON file, the OS keychain, or
//! process memory.

pub mod session;
pub mod store;

pub use session::{AuthSession, SessionState};
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, StoreError, TokenStore};
