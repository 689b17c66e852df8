use press_portal::{
    models::Theme,
    storage::{ClientStorage, MemoryStorage, THEME_KEY},
    theme::ThemeStore,
};
use std::sync::Arc;

#[tokio::test]
async fn test_defaults_to_light() {
    let store = ThemeStore::new(Arc::new(MemoryStorage::new()));
    assert_eq!(store.current(), Theme::Light);
    assert_eq!(store.load().await, Theme::Light);
}

#[tokio::test]
async fn test_load_reads_stored_preference() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(THEME_KEY, "dark").await.unwrap();

    let store = ThemeStore::new(storage);
    assert_eq!(store.load().await, Theme::Dark);
    assert_eq!(store.current(), Theme::Dark);
}

#[tokio::test]
async fn test_unrecognized_preference_is_light() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(THEME_KEY, "solarized").await.unwrap();

    let store = ThemeStore::new(storage);
    assert_eq!(store.load().await, Theme::Light);
}

#[tokio::test]
async fn test_toggle_persists() {
    let storage = Arc::new(MemoryStorage::new());
    let store = ThemeStore::new(storage.clone());

    assert_eq!(store.toggle().await, Theme::Dark);
    assert_eq!(storage.snapshot().get(THEME_KEY).map(String::as_str), Some("dark"));

    assert_eq!(store.toggle().await, Theme::Light);
    assert_eq!(storage.snapshot().get(THEME_KEY).map(String::as_str), Some("light"));
}

#[tokio::test]
async fn test_storage_failure_keeps_in_memory_theme() {
    let store = ThemeStore::new(Arc::new(MemoryStorage::new_failing()));

    assert_eq!(store.load().await, Theme::Light);
    assert_eq!(store.set(Theme::Dark).await, Theme::Dark);
    assert_eq!(store.current(), Theme::Dark);
}
