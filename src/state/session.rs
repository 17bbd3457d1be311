//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the current user and the startup `loading` flag, performs login,
//! registration and logout against an [`AuthApi`], and persists the session
//! through the shared [`PersistedStore`]. Route guards and user-aware
//! components read [`SessionState`] snapshots; the manager is the only core
//! component that triggers navigation.
//!
//! LIFECYCLE
//! =========
//! `Bootstrapping` is left exactly once by [`SessionManager::bootstrap`],
//! synchronously and without network I/O, for `Anonymous` or
//! `Authenticated`. `login` moves `Anonymous -> Authenticated`; `logout`
//! returns to `Anonymous` from anywhere and always succeeds.
//!
//! A login that is still awaiting the server when `logout` runs is discarded
//! when it resolves: every logout bumps an epoch counter and a login only
//! applies if the epoch it started under is still current.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use super::effects::{Navigator, Notifier, Severity};
use crate::net::api::{ApiError, AuthApi};
use crate::net::types::{RegisterRequest, User};
use crate::routes;
use crate::util::access;
use crate::util::storage::{PersistedStore, StorageKey};

const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection and try again.";

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True only until the persisted session has been read at startup.
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Bootstrapping
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Anonymous,
    Authenticated,
}

/// Failure of a session operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Invalid credentials or validation failure reported by the server.
    #[error("{message}")]
    Rejected { message: String, field_errors: BTreeMap<String, String> },
    /// The server could not be reached or answered unusably.
    #[error("network failure: {0}")]
    Network(String),
    #[error("already signed in")]
    AlreadyAuthenticated,
    /// The session changed (logout, concurrent login) while the request was
    /// in flight; the response was dropped.
    #[error("session changed while the request was in flight")]
    Superseded,
}

impl SessionError {
    /// Per-field validation messages, when the server supplied any.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Rejected { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }

    /// Message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => NETWORK_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, field_errors } => Self::Rejected { message, field_errors },
            ApiError::Network(reason) | ApiError::MalformedResponse(reason) => Self::Network(reason),
        }
    }
}

type Listener = Box<dyn Fn(&SessionState) + Send + Sync>;

struct Inner {
    store: PersistedStore,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
    bootstrapped: AtomicBool,
    epoch: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

/// Process-wide session holder, shared by cloning.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.inner.state.lock())
            .field("epoch", &self.inner.epoch.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager in the `Bootstrapping` phase. Call
    /// [`bootstrap`](Self::bootstrap) to restore the persisted session.
    pub fn new(store: PersistedStore, navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                navigator,
                notifier,
                state: Mutex::new(SessionState { user: None, loading: true }),
                bootstrapped: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Restore the persisted session and leave `Bootstrapping`.
    ///
    /// The session is restored only when both the token and the user record
    /// decode; a missing or corrupted half discards both. Later calls are
    /// no-ops.
    pub fn bootstrap(&self) -> SessionPhase {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.phase();
        }
        let store = &self.inner.store;
        let token = store.read_parsed::<String>(StorageKey::AuthToken).filter(|t| !t.is_empty());
        let user = store.read_parsed::<User>(StorageKey::User);
        let restored = match (token, user) {
            (Some(_), Some(user)) => Some(user),
            (None, None) => None,
            _ => {
                leptos::logging::warn!("discarding incomplete persisted session");
                self.clear_persisted_session();
                None
            }
        };
        self.set_state(SessionState { user: restored, loading: false });
        self.phase()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.lock().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.lock().phase()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.lock().is_authenticated()
    }

    /// Persisted bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.inner.store.read_parsed(StorageKey::AuthToken)
    }

    /// Email saved by a previous "remember me" login.
    pub fn remembered_email(&self) -> Option<String> {
        self.inner.store.read_parsed(StorageKey::RememberedEmail)
    }

    /// Register `listener` to receive every new snapshot.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + Send + Sync + 'static) {
        self.inner.listeners.lock().push(Box::new(listener));
    }

    /// Authenticate with the server.
    ///
    /// On success the token and user are persisted, the remembered email is
    /// saved (or forgotten when `remember_me` is false) and the app navigates
    /// to the role's landing route.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Rejected`] / [`SessionError::Network`] when the
    ///   server refuses or cannot be reached; nothing is persisted.
    /// * [`SessionError::AlreadyAuthenticated`] when called while signed in.
    /// * [`SessionError::Superseded`] when a logout (or another login)
    ///   happened while the request was in flight.
    pub async fn login<A>(&self, api: &A, email: &str, password: &str, remember_me: bool) -> Result<User, SessionError>
    where
        A: AuthApi + ?Sized,
    {
        if self.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }
        let epoch = self.inner.epoch.load(Ordering::SeqCst);

        let outcome = api.login(email, password, remember_me).await;

        if self.inner.epoch.load(Ordering::SeqCst) != epoch || self.is_authenticated() {
            leptos::logging::log!("dropping login response for {email}: session changed while in flight");
            return Err(SessionError::Superseded);
        }

        let data = match outcome {
            Ok(data) => data,
            Err(e) => {
                let err = SessionError::from(e);
                leptos::logging::warn!("login failed for {email}: {err}");
                self.inner.notifier.notify(Severity::Error, &err.user_message());
                return Err(err);
            }
        };

        self.persist_session(&data.token, &data.user);
        self.persist_remembered_email(email, remember_me);
        self.set_state(SessionState { user: Some(data.user.clone()), loading: false });

        self.inner.notifier.notify(Severity::Success, "Signed in successfully.");
        self.inner.navigator.navigate(access::landing_route(&data.user.role), true);
        Ok(data.user)
    }

    /// Create an account. Never signs the caller in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Rejected`] (with
    /// [`field_errors`](SessionError::field_errors) when the server reports
    /// per-field problems) or [`SessionError::Network`].
    pub async fn register<A>(&self, api: &A, request: &RegisterRequest) -> Result<(), SessionError>
    where
        A: AuthApi + ?Sized,
    {
        match api.register(request).await {
            Ok(_) => {
                self.inner.notifier.notify(Severity::Success, "Registration successful. Please sign in.");
                self.inner.navigator.navigate(routes::LOGIN, false);
                Ok(())
            }
            Err(e) => {
                let err = SessionError::from(e);
                leptos::logging::warn!("registration failed for {}: {err}", request.email);
                self.inner.notifier.notify(Severity::Error, &err.user_message());
                Err(err)
            }
        }
    }

    /// Sign out locally. Always succeeds and never waits on the network.
    pub fn logout(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.clear_persisted_session();
        let was_authenticated = self.is_authenticated();
        self.set_state(SessionState { user: None, loading: false });
        if was_authenticated {
            self.inner.notifier.notify(Severity::Info, "You have been signed out.");
        }
        self.inner.navigator.navigate(routes::LOGIN, true);
    }

    /// Write token and user as one unit: any failure removes both halves.
    fn persist_session(&self, token: &str, user: &User) {
        let store = &self.inner.store;
        store.remove(StorageKey::AuthToken);
        let written = store.write(StorageKey::User, user).and_then(|()| store.write(StorageKey::AuthToken, token));
        if let Err(e) = written {
            leptos::logging::warn!("session will not survive reload: {e}");
            self.clear_persisted_session();
        }
    }

    fn persist_remembered_email(&self, email: &str, remember_me: bool) {
        let store = &self.inner.store;
        if !remember_me {
            store.remove(StorageKey::RememberedEmail);
        } else if let Err(e) = store.write(StorageKey::RememberedEmail, email) {
            leptos::logging::warn!("remembered email not saved: {e}");
        }
    }

    fn clear_persisted_session(&self) {
        self.inner.store.remove(StorageKey::AuthToken);
        self.inner.store.remove(StorageKey::User);
    }

    fn set_state(&self, next: SessionState) {
        *self.inner.state.lock() = next.clone();
        for listener in self.inner.listeners.lock().iter() {
            listener(&next);
        }
    }
}
