//! Selected-tenant state, persisted independently of the session.
//!
//! DESIGN
//! ======
//! The selection is a snapshot: [`TenantSelection::select`] clones the record
//! so later edits to the caller's copy cannot leak into it. The persisted
//! pair (id + full record) mirrors the in-memory selection.
//!
//! After a reload only the persisted copy exists. [`TenantSelection::reconcile`]
//! is called by the UI after every successful tenant-list fetch and refreshes
//! the snapshot from the authoritative list. A persisted id that matches
//! nothing in the list is left alone: it neither clears the selection nor
//! raises an error.

#[cfg(test)]
#[path = "tenant_test.rs"]
mod tenant_test;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::net::types::{Tenant, TenantId};
use crate::util::storage::{PersistedStore, StorageKey};

type Listener = Box<dyn Fn(Option<&Tenant>) + Send + Sync>;

struct Inner {
    store: PersistedStore,
    selected: Mutex<Option<Tenant>>,
    listeners: Mutex<Vec<Listener>>,
}

/// Process-wide tenant selection holder, shared by cloning.
#[derive(Clone)]
pub struct TenantSelection {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TenantSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantSelection").field("selected", &*self.inner.selected.lock()).finish_non_exhaustive()
    }
}

impl TenantSelection {
    /// Create the store and restore any persisted snapshot.
    pub fn new(store: PersistedStore) -> Self {
        let selected = restore(&store);
        Self {
            inner: Arc::new(Inner { store, selected: Mutex::new(selected), listeners: Mutex::new(Vec::new()) }),
        }
    }

    pub fn selected(&self) -> Option<Tenant> {
        self.inner.selected.lock().clone()
    }

    /// Persisted id of the selection, which may outlive the in-memory
    /// snapshot until the next reconcile.
    pub fn selected_id(&self) -> Option<TenantId> {
        self.inner.store.read_parsed(StorageKey::SelectedTenantId)
    }

    pub fn subscribe(&self, listener: impl Fn(Option<&Tenant>) + Send + Sync + 'static) {
        self.inner.listeners.lock().push(Box::new(listener));
    }

    /// Select a snapshot of `tenant`, or clear the selection for `None`.
    pub fn select(&self, tenant: Option<&Tenant>) {
        let Some(tenant) = tenant else {
            self.clear();
            return;
        };
        let snapshot = tenant.clone();
        self.persist(&snapshot);
        self.set_selected(Some(snapshot));
    }

    /// Drop the selection and both persisted keys.
    pub fn clear(&self) {
        self.inner.store.remove(StorageKey::SelectedTenantId);
        self.inner.store.remove(StorageKey::SelectedTenant);
        self.set_selected(None);
    }

    /// Refresh the selection from a freshly fetched tenant list.
    ///
    /// Returns `true` when the in-memory selection was replaced. Nothing
    /// happens when the list is empty, no id is persisted, the id is not in
    /// the list, or the held snapshot already equals the list entry.
    pub fn reconcile(&self, tenants: &[Tenant]) -> bool {
        if tenants.is_empty() {
            return false;
        }
        let Some(persisted_id) = self.selected_id() else {
            return false;
        };
        let Some(fresh) = tenants.iter().find(|t| t.id == persisted_id) else {
            leptos::logging::log!("selected tenant {persisted_id} not in fetched list; keeping selection");
            return false;
        };

        let unchanged = self.inner.selected.lock().as_ref().is_some_and(|held| held == fresh);
        if unchanged {
            return false;
        }
        let snapshot = fresh.clone();
        self.persist(&snapshot);
        self.set_selected(Some(snapshot));
        true
    }

    /// Write id and record. A failed write removes both so storage never
    /// holds half a selection; the in-memory selection is kept regardless.
    fn persist(&self, tenant: &Tenant) {
        let store = &self.inner.store;
        let written = store
            .write(StorageKey::SelectedTenantId, &tenant.id)
            .and_then(|()| store.write(StorageKey::SelectedTenant, tenant));
        if let Err(e) = written {
            leptos::logging::warn!("tenant selection will not survive reload: {e}");
            store.remove(StorageKey::SelectedTenantId);
            store.remove(StorageKey::SelectedTenant);
        }
    }

    fn set_selected(&self, next: Option<Tenant>) {
        *self.inner.selected.lock() = next.clone();
        for listener in self.inner.listeners.lock().iter() {
            listener(next.as_ref());
        }
    }
}

/// Restore the persisted snapshot.
///
/// * id and matching record → selected
/// * id only (or a record for another id) → nothing selected yet; the id
///   stays so the next reconcile can fill in the record
/// * record without id → record removed
fn restore(store: &PersistedStore) -> Option<Tenant> {
    let id = store.read_parsed::<TenantId>(StorageKey::SelectedTenantId);
    let record = store.read_parsed::<Tenant>(StorageKey::SelectedTenant);
    match (id, record) {
        (Some(id), Some(record)) if record.id == id => Some(record),
        (_, Some(_)) => {
            store.remove(StorageKey::SelectedTenant);
            None
        }
        (_, None) => None,
    }
}
