//! Client-side session lifecycle.
//!
//! `AuthSession` is the one stateful object in the crate. It owns the
//! tri-state session (`Restoring` / `Authenticated` / `Unauthenticated`),
//! the busy flag front-ends bind spinners to, and the last user-facing
//! error string, and it broadcasts every state transition to subscribers.
//!
//! Overlapping operations are not serialized: state writes are atomic and
//! the most recently completed operation wins. Front-ends are expected to
//! disable their triggers while `is_busy()` is true.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, AuthClient};
use crate::models::{User, UserCreate};

use super::TokenStore;

/// Subscribers lagging more than this many transitions behind lose the
/// oldest ones; they can always resync from `state()`.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Fallback shown when a login failure carries no server detail
const LOGIN_FAILED: &str = "Login failed";

/// Fallback shown when a registration failure carries no server detail
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup: a persisted token may exist but has not been validated yet.
    Restoring,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct AuthSession {
    auth: AuthClient,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    last_error: RwLock<Option<String>>,
    busy: AtomicBool,
    events: broadcast::Sender<SessionState>,
}

impl AuthSession {
    /// Create a session bound to the client's backend and token store.
    /// The session starts in `Restoring`; call [`restore`](Self::restore)
    /// once at startup to resolve it.
    pub fn new(api: &ApiClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            auth: AuthClient::new(api),
            store: api.token_store(),
            state: RwLock::new(SessionState::Restoring),
            last_error: RwLock::new(None),
            busy: AtomicBool::new(false),
            events,
        }
    }

    /// Resolve the startup `Restoring` state from the token store.
    ///
    /// No token (or an unreadable store): land at `Unauthenticated` without
    /// touching the network. Token present: prove it by fetching the
    /// profile; any failure clears the stored token and lands at
    /// `Unauthenticated`. Running restore again resolves the same way.
    pub async fn restore(&self) -> SessionState {
        self.busy.store(true, Ordering::SeqCst);
        let state = self.restore_inner().await;
        self.busy.store(false, Ordering::SeqCst);
        state
    }

    async fn restore_inner(&self) -> SessionState {
        match self.store.get() {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("No persisted token, starting unauthenticated");
                return self.set_state(SessionState::Unauthenticated);
            }
            Err(e) => {
                warn!(error = %e, "Token store unavailable, starting unauthenticated");
                return self.set_state(SessionState::Unauthenticated);
            }
        }

        match self.auth.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "Session restored");
                self.set_state(SessionState::Authenticated(user))
            }
            Err(e) => {
                warn!(error = %e, "Session restore failed, clearing stored token");
                self.clear_token();
                self.set_state(SessionState::Unauthenticated)
            }
        }
    }

    /// Log in with a username or email plus password.
    ///
    /// On success the minted token is persisted, the profile is fetched, and
    /// the session transitions to `Authenticated`; returns true. On any
    /// failure the state is left alone, `last_error()` carries the server's
    /// `detail` when it sent one (else a generic message), and false comes
    /// back.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        self.busy.store(true, Ordering::SeqCst);
        let ok = self.login_inner(username, password).await;
        self.busy.store(false, Ordering::SeqCst);
        ok
    }

    async fn login_inner(&self, username: &str, password: &str) -> bool {
        self.set_error(None);

        let token = match self.auth.login(username, password).await {
            Ok(token) => token,
            Err(e) => {
                info!(username = %username, error = %e, "Login rejected");
                self.set_error(Some(user_message(&e, LOGIN_FAILED)));
                return false;
            }
        };

        // Persist before the profile fetch; the fetch reads the token back
        // out of the store for its Authorization header. A failed write is
        // logged and the login proceeds for this run.
        if let Err(e) = self.store.set(&token.access_token) {
            warn!(error = %e, "Failed to persist session token");
        }

        match self.auth.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "Logged in");
                self.set_state(SessionState::Authenticated(user));
                true
            }
            Err(e) => {
                warn!(error = %e, "Token accepted but profile fetch failed");
                self.set_error(Some(user_message(&e, LOGIN_FAILED)));
                false
            }
        }
    }

    /// Create an account. The session stays wherever it was: the backend
    /// returns no token here, so the caller logs in separately.
    pub async fn register(&self, user: &UserCreate) -> bool {
        self.busy.store(true, Ordering::SeqCst);
        let ok = self.register_inner(user).await;
        self.busy.store(false, Ordering::SeqCst);
        ok
    }

    async fn register_inner(&self, user: &UserCreate) -> bool {
        self.set_error(None);

        match self.auth.register(user).await {
            Ok(created) => {
                info!(username = %created.username, "Account registered");
                true
            }
            Err(e) => {
                info!(error = %e, "Registration rejected");
                self.set_error(Some(user_message(&e, REGISTRATION_FAILED)));
                false
            }
        }
    }

    /// End the session. The token store is cleared best-effort (the API has
    /// no server-side logout endpoint) and the state always lands at
    /// `Unauthenticated`, even if the clear fails.
    pub async fn logout(&self) {
        self.busy.store(true, Ordering::SeqCst);
        self.clear_token();
        self.set_state(SessionState::Unauthenticated);
        self.busy.store(false, Ordering::SeqCst);
        info!("Logged out");
    }

    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// True while a restore/login/register/logout is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// User-facing message from the last failed login/registration; cleared
    /// when the next one starts.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stream of session states, one per transition. Lagged receivers drop
    /// the oldest entries, never the newest.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.events.subscribe()
    }

    fn set_state(&self, next: SessionState) -> SessionState {
        {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if *guard == next {
                return next;
            }
            *guard = next.clone();
        }
        // send only fails when no receiver exists, which is fine
        let _ = self.events.send(next.clone());
        next
    }

    fn set_error(&self, message: Option<String>) {
        let mut guard = self
            .last_error
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = message;
    }

    fn clear_token(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
    }
}

/// Prefer the backend's `detail` explanation; fall back to a generic message.
fn user_message(err: &ApiError, fallback: &str) -> String {
    err.detail().unwrap_or_else(|| fallback.to_string())
}
