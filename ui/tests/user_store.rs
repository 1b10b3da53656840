use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};
use ui::core::storage::{KeyValueStore, MemoryStorage, StorageError};
use ui::stores::{UserState, UserStore, USER_STORAGE_KEY};

fn signed_in() -> UserState {
    serde_json::from_value(json!({
        "user_id": "u-1",
        "email": "ada@example.org",
        "orgs": [
            { "org_id": 10, "org_name": "North", "role_in_org": "student" },
            { "org_id": "20", "org_name": "South" }
        ],
        "roles": ["student"],
        "disciplines": [
            { "discipline_id": 1, "discipline_code": "MED" },
            { "discipline_id": "2", "discipline_code": "NUR", "is_primary": true }
        ]
    }))
    .unwrap()
}

fn stored(storage: &MemoryStorage) -> Option<Value> {
    storage
        .get(USER_STORAGE_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

#[test]
fn empty_user_is_never_persisted() {
    let empty = json!({ "user_id": null, "email": null, "orgs": [], "roles": [] });
    let storage = Rc::new(MemoryStorage::with_entry(USER_STORAGE_KEY, &empty.to_string()));
    let store = UserStore::new(storage.clone());

    assert!(!storage.contains(USER_STORAGE_KEY));

    store.update(|user| user.display_name = Some("nobody".into()));
    assert!(!storage.contains(USER_STORAGE_KEY));
}

#[test]
fn corrupt_storage_hydrates_as_signed_out() {
    let storage = Rc::new(MemoryStorage::with_entry(USER_STORAGE_KEY, "{not json"));
    let store = UserStore::new(storage.clone());

    assert!(store.get().is_logged_out());
    assert!(!storage.contains(USER_STORAGE_KEY));
}

#[test]
fn sign_in_persists_with_selections() {
    let storage = Rc::new(MemoryStorage::new());
    let store = UserStore::new(storage.clone());

    store.sign_in(signed_in());

    let saved = stored(&storage).expect("user persisted");
    assert_eq!(saved["user_id"], "u-1");
    assert_eq!(saved["currentDiscipline"]["discipline_id"], 2);
    assert_eq!(saved["currentOrg"]["org_id"], "10");

    store.sign_out();
    assert!(!storage.contains(USER_STORAGE_KEY));
}

#[test]
fn reload_restores_previous_session() {
    let storage = Rc::new(MemoryStorage::new());
    {
        let store = UserStore::new(storage.clone());
        store.sign_in(signed_in());
        store.set_current_org_by_id("20");
        store.set_current_discipline_by_id(1);
    }

    let reloaded = UserStore::new(storage);
    let user = reloaded.get();
    assert_eq!(user.current_org.map(|o| o.org_id).as_deref(), Some("20"));
    assert_eq!(user.current_discipline.map(|d| d.discipline_id), Some(1));
}

#[test]
fn unknown_ids_fall_back_to_defaults() {
    let store = UserStore::new(Rc::new(MemoryStorage::new()));
    store.sign_in(signed_in());

    let org = store.set_current_org_by_id("missing");
    assert_eq!(org.map(|o| o.org_id).as_deref(), Some("10"));

    let discipline = store.set_current_discipline_by_id(99);
    assert_eq!(discipline.map(|d| d.discipline_id), Some(2));
}

#[test]
fn ensure_is_idempotent() {
    let store = UserStore::new(Rc::new(MemoryStorage::new()));
    store.sign_in(signed_in());

    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    let _sub = store.subscribe(move |_| counter.set(counter.get() + 1));
    assert_eq!(notified.get(), 1);

    store.ensure_current_org();
    store.ensure_current_discipline();
    assert_eq!(notified.get(), 1);

    // Clearing the org through `update` is repaired in the same notification.
    store.update(|user| user.current_org = None);
    assert_eq!(notified.get(), 2);
    store.ensure_current_org();
    store.ensure_current_org();
    assert_eq!(notified.get(), 2);
    assert_eq!(store.get().current_org.map(|o| o.org_id).as_deref(), Some("10"));
}

#[test]
fn set_and_update_cannot_select_outside_the_lists() {
    let storage = Rc::new(MemoryStorage::new());
    let store = UserStore::new(storage.clone());

    let mut user = signed_in();
    user.current_org = serde_json::from_value(json!({ "org_id": "zzz" })).unwrap();
    user.current_discipline =
        serde_json::from_value(json!({ "discipline_id": 77, "discipline_code": "LAW" })).unwrap();
    store.set(user);

    let state = store.get();
    assert!(state.orgs.iter().any(|o| Some(o) == state.current_org.as_ref()));
    assert!(state.disciplines.iter().any(|d| Some(d) == state.current_discipline.as_ref()));
    let saved = stored(&storage).expect("user persisted");
    assert_eq!(saved["currentOrg"]["org_id"], "10");
    assert_eq!(saved["currentDiscipline"]["discipline_id"], 2);

    store.update(|user| {
        user.orgs.retain(|o| o.org_id != "10");
        user.disciplines.clear();
    });
    let state = store.get();
    assert_eq!(state.current_org.map(|o| o.org_id).as_deref(), Some("20"));
    assert_eq!(state.current_discipline, None);
    let saved = stored(&storage).expect("user persisted");
    assert_eq!(saved["currentOrg"]["org_id"], "20");
    assert!(saved["currentDiscipline"].is_null());
}

struct BrokenStorage {
    writes: Cell<u32>,
}

impl KeyValueStore for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        Err(StorageError::Browser("QuotaExceededError".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[test]
fn storage_failures_are_swallowed() {
    let storage = Rc::new(BrokenStorage { writes: Cell::new(0) });
    let store = UserStore::new(storage.clone());

    assert!(store.get().is_logged_out());
    store.sign_in(signed_in());
    assert_eq!(storage.writes.get(), 1);
    assert_eq!(store.get().user_id.as_deref(), Some("u-1"));
}
