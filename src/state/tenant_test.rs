use super::*;
use crate::test_helpers::{RejectingStorage, sample_tenant};

fn fresh_store() -> PersistedStore {
    PersistedStore::in_memory()
}

// =============================================================
// select / clear
// =============================================================

#[test]
fn new_store_without_persisted_data_has_no_selection() {
    let selection = TenantSelection::new(fresh_store());
    assert!(selection.selected().is_none());
    assert!(selection.selected_id().is_none());
}

#[test]
fn select_persists_id_and_snapshot() {
    let store = fresh_store();
    let selection = TenantSelection::new(store.clone());
    selection.select(Some(&sample_tenant(5, "A")));

    assert_eq!(selection.selected_id(), Some(TenantId::Number(5)));
    assert_eq!(store.read_parsed::<Tenant>(StorageKey::SelectedTenant), Some(sample_tenant(5, "A")));
}

#[test]
fn select_takes_a_snapshot() {
    let selection = TenantSelection::new(fresh_store());
    let mut original = sample_tenant(5, "A");
    selection.select(Some(&original));

    original.name = "Edited elsewhere".to_owned();
    assert_eq!(selection.selected().map(|t| t.name), Some("A".to_owned()));
}

#[test]
fn select_none_clears() {
    let store = fresh_store();
    let selection = TenantSelection::new(store.clone());
    selection.select(Some(&sample_tenant(5, "A")));
    selection.select(None);

    assert!(selection.selected().is_none());
    assert!(!store.contains(StorageKey::SelectedTenantId));
    assert!(!store.contains(StorageKey::SelectedTenant));
}

#[test]
fn clear_twice_matches_clear_once() {
    let store = fresh_store();
    let selection = TenantSelection::new(store.clone());
    selection.select(Some(&sample_tenant(5, "A")));

    selection.clear();
    let once = (selection.selected(), store.read(StorageKey::SelectedTenantId), store.read(StorageKey::SelectedTenant));
    selection.clear();
    let twice = (selection.selected(), store.read(StorageKey::SelectedTenantId), store.read(StorageKey::SelectedTenant));

    assert_eq!(once, twice);
    assert_eq!(twice, (None, None, None));
}

#[test]
fn selection_survives_restart() {
    let store = fresh_store();
    TenantSelection::new(store.clone()).select(Some(&sample_tenant(8, "B")));
    let restarted = TenantSelection::new(store);
    assert_eq!(restarted.selected(), Some(sample_tenant(8, "B")));
}

#[test]
fn select_with_failing_storage_keeps_in_memory_selection() {
    let store = PersistedStore::new(Arc::new(RejectingStorage::default()));
    let selection = TenantSelection::new(store.clone());
    selection.select(Some(&sample_tenant(5, "A")));

    assert!(selection.selected().is_some());
    assert!(!store.contains(StorageKey::SelectedTenantId));
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_with_id_only_waits_for_reconcile() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, "5").unwrap();
    let selection = TenantSelection::new(store.clone());

    assert!(selection.selected().is_none());
    assert!(store.contains(StorageKey::SelectedTenantId));
}

#[test]
fn restore_drops_record_without_id() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenant, &sample_tenant(5, "A")).unwrap();
    let selection = TenantSelection::new(store.clone());

    assert!(selection.selected().is_none());
    assert!(!store.contains(StorageKey::SelectedTenant));
}

#[test]
fn restore_drops_record_for_other_id() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, &7).unwrap();
    store.write(StorageKey::SelectedTenant, &sample_tenant(5, "A")).unwrap();
    let selection = TenantSelection::new(store.clone());

    assert!(selection.selected().is_none());
    assert_eq!(selection.selected_id(), Some(TenantId::Number(7)));
    assert!(!store.contains(StorageKey::SelectedTenant));
}

#[test]
fn restore_heals_corrupted_record() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, &5).unwrap();
    store.write(StorageKey::SelectedTenant, "not a tenant").unwrap();
    let selection = TenantSelection::new(store.clone());

    assert!(selection.selected().is_none());
    assert!(!store.contains(StorageKey::SelectedTenant));
}

// =============================================================
// reconcile
// =============================================================

#[test]
fn reconcile_fills_selection_after_reload() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, "5").unwrap();
    let selection = TenantSelection::new(store.clone());

    let list = vec![sample_tenant(4, "Other"), sample_tenant(5, "A")];
    assert!(selection.reconcile(&list));
    assert_eq!(selection.selected(), Some(sample_tenant(5, "A")));
    assert_eq!(store.read_parsed::<Tenant>(StorageKey::SelectedTenant), Some(sample_tenant(5, "A")));
}

#[test]
fn reconcile_picks_up_fresh_data_but_skips_identical_records() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, &5).unwrap();
    let selection = TenantSelection::new(store);

    assert!(selection.reconcile(&[sample_tenant(5, "A")]));
    assert!(!selection.reconcile(&[sample_tenant(5, "A")]));
    assert_eq!(selection.selected().map(|t| t.name), Some("A".to_owned()));

    assert!(selection.reconcile(&[sample_tenant(5, "B")]));
    assert_eq!(selection.selected().map(|t| t.name), Some("B".to_owned()));
}

#[test]
fn reconcile_ignores_empty_list() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, &5).unwrap();
    let selection = TenantSelection::new(store);
    assert!(!selection.reconcile(&[]));
    assert!(selection.selected().is_none());
}

#[test]
fn reconcile_without_persisted_id_changes_nothing() {
    let selection = TenantSelection::new(fresh_store());
    assert!(!selection.reconcile(&[sample_tenant(5, "A")]));
    assert!(selection.selected().is_none());
}

#[test]
fn reconcile_keeps_selection_when_tenant_disappears() {
    let selection = TenantSelection::new(fresh_store());
    selection.select(Some(&sample_tenant(5, "A")));

    assert!(!selection.reconcile(&[sample_tenant(6, "B")]));
    assert_eq!(selection.selected(), Some(sample_tenant(5, "A")));
    assert_eq!(selection.selected_id(), Some(TenantId::Number(5)));
}

#[test]
fn reconcile_matches_string_and_numeric_ids() {
    let store = fresh_store();
    store.write(StorageKey::SelectedTenantId, "12").unwrap();
    let selection = TenantSelection::new(store);

    let mut listed = sample_tenant(0, "Numeric");
    listed.id = TenantId::Number(12);
    assert!(selection.reconcile(&[listed.clone()]));
    assert_eq!(selection.selected(), Some(listed));
}

// =============================================================
// Subscribers
// =============================================================

#[test]
fn subscribers_see_selection_changes() {
    let selection = TenantSelection::new(fresh_store());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    selection.subscribe(move |t| sink.lock().push(t.map(|t| t.name.clone())));

    selection.select(Some(&sample_tenant(1, "A")));
    selection.clear();

    assert_eq!(*seen.lock(), vec![Some("A".to_owned()), None]);
}
