use super::*;
use crate::testing::FakeStorage;

#[test]
fn get_returns_stored_value() {
    let store = PreferenceStore::new(FakeStorage::with("theme", "dark"));
    assert_eq!(store.get("theme").as_deref(), Some("dark"));
}

#[test]
fn get_absent_key_is_none() {
    let store = PreferenceStore::new(FakeStorage::default());
    assert_eq!(store.get("theme"), None);
}

#[test]
fn get_swallows_read_failure() {
    let store = PreferenceStore::new(FakeStorage::failing());
    assert_eq!(store.get("theme"), None);
}

#[test]
fn set_writes_through() {
    let storage = FakeStorage::default();
    let store = PreferenceStore::new(storage.clone());
    store.set("theme", "light");
    assert_eq!(storage.value("theme").as_deref(), Some("light"));
}

#[test]
fn set_swallows_write_failure() {
    let storage = FakeStorage::failing();
    let store = PreferenceStore::new(storage.clone());
    store.set("theme", "dark");
    assert_eq!(storage.value("theme"), None);
}
