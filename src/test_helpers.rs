//! Shared fixtures and collaborator doubles for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::net::api::{ApiError, AuthApi, TenantApi};
use crate::net::types::{LoginData, NewTenant, RegisterRequest, Role, Tenant, TenantId, TenantStatus, User, UserId};
use crate::state::effects::{NavigationRequest, Navigator, Notifier, Severity};
use crate::state::session::SessionManager;
use crate::util::storage::{MemoryStorage, PersistedStore, StorageBackend, StorageError};

// =========================================================================
// Fixtures
// =========================================================================

pub fn user_with_role(role: Role) -> User {
    User {
        id: UserId::Number(11),
        email: "member@library.test".to_owned(),
        role,
        organization_name: Some("Central Library".to_owned()),
    }
}

pub fn login_data(role: Role) -> LoginData {
    LoginData { token: "token-abc".to_owned(), user: user_with_role(role) }
}

pub fn sample_tenant(id: i64, name: &str) -> Tenant {
    Tenant {
        id: TenantId::Number(id),
        name: name.to_owned(),
        code: format!("LIB{id:03}"),
        city: "Pune".to_owned(),
        state: "MH".to_owned(),
        address: "1 Main Road".to_owned(),
        status: TenantStatus::Active,
        seat_limit: 50,
        total_members: 10,
        kind: "library".to_owned(),
    }
}

// =========================================================================
// Storage
// =========================================================================

/// Backend that refuses every write.
#[derive(Default)]
pub struct RejectingStorage {
    inner: MemoryStorage,
}

impl StorageBackend for RejectingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend { key: key.to_owned(), reason: "quota exceeded".to_owned() })
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

// =========================================================================
// Effects
// =========================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<NavigationRequest>>,
}

impl RecordingNavigator {
    pub fn calls(&self) -> Vec<NavigationRequest> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Option<NavigationRequest> {
        self.calls.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, replace: bool) {
        self.calls.lock().push(NavigationRequest { path: path.to_owned(), replace });
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<(Severity, String)> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Option<(Severity, String)> {
        self.calls.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.calls.lock().push((severity, message.to_owned()));
    }
}

// =========================================================================
// API doubles
// =========================================================================

/// Auth API answering every call with a fixed result.
pub struct ScriptedAuthApi {
    pub login_result: Result<LoginData, ApiError>,
    pub register_result: Result<serde_json::Value, ApiError>,
    pub login_calls: AtomicUsize,
}

impl ScriptedAuthApi {
    pub fn accepting(role: Role) -> Self {
        Self {
            login_result: Ok(login_data(role)),
            register_result: Ok(serde_json::json!({ "id": 99 })),
            login_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ApiError) -> Self {
        Self { login_result: Err(err.clone()), register_result: Err(err), login_calls: AtomicUsize::new(0) }
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for ScriptedAuthApi {
    async fn login(&self, _email: &str, _password: &str, _remember_me: bool) -> Result<LoginData, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result.clone()
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        self.register_result.clone()
    }
}

/// Auth API whose login resolves only when the test releases it.
pub struct GatedAuthApi {
    gate: Mutex<Option<oneshot::Receiver<Result<LoginData, ApiError>>>>,
}

impl GatedAuthApi {
    pub fn new() -> (Self, oneshot::Sender<Result<LoginData, ApiError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { gate: Mutex::new(Some(rx)) }, tx)
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for GatedAuthApi {
    async fn login(&self, _email: &str, _password: &str, _remember_me: bool) -> Result<LoginData, ApiError> {
        let rx = self.gate.lock().take().expect("gated login called twice");
        rx.await.unwrap_or_else(|_| Err(ApiError::Network("gate dropped".to_owned())))
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        Err(ApiError::Network("not scripted".to_owned()))
    }
}

/// Tenant API serving a fixed inventory, or failing every call.
pub struct StaticTenantApi {
    pub tenants: Result<Vec<Tenant>, ApiError>,
}

impl StaticTenantApi {
    pub fn serving(tenants: Vec<Tenant>) -> Self {
        Self { tenants: Ok(tenants) }
    }

    pub fn failing(err: ApiError) -> Self {
        Self { tenants: Err(err) }
    }
}

#[async_trait::async_trait(?Send)]
impl TenantApi for StaticTenantApi {
    async fn list_all(&self) -> Result<Vec<Tenant>, ApiError> {
        self.tenants.clone()
    }

    async fn create(&self, fields: &NewTenant) -> Result<Tenant, ApiError> {
        if let Err(e) = &self.tenants {
            return Err(e.clone());
        }
        let mut tenant = sample_tenant(1000, &fields.name);
        tenant.code.clone_from(&fields.code);
        Ok(tenant)
    }
}

// =========================================================================
// Session harness
// =========================================================================

/// A session manager wired to recording collaborators over a shared store.
pub struct SessionHarness {
    pub store: PersistedStore,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub session: SessionManager,
}

impl SessionHarness {
    /// Bootstrapped harness over a fresh in-memory store.
    pub fn new() -> Self {
        Self::over(PersistedStore::in_memory())
    }

    /// Bootstrapped harness over `store`, simulating a process start.
    pub fn over(store: PersistedStore) -> Self {
        let harness = Self::unbooted(store);
        harness.session.bootstrap();
        harness
    }

    pub fn unbooted(store: PersistedStore) -> Self {
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let session = SessionManager::new(store.clone(), navigator.clone(), notifier.clone());
        Self { store, navigator, notifier, session }
    }

    /// Simulate a reload: a new manager over the same storage.
    pub fn restart(&self) -> Self {
        Self::over(self.store.clone())
    }
}
