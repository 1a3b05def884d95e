// Integration tests for the JSON settings and draft store
// WHY: Storage failures must degrade to defaults without reaching the writer

use medwriter::{DraftStore, JsonFileStore, Settings, SettingsStore};
use tokio::sync::broadcast::error::TryRecvError;

mod integration;
use integration::StoreFixture;

#[tokio::test]
async fn test_settings_round_trip() {
    let fixture = StoreFixture::new();
    let custom = Settings {
        wordiness: false,
        medical_terms: true,
        cliches: false,
    };

    fixture.store.set(custom).await;

    assert_eq!(fixture.store.get().await, custom);
    let reopened = JsonFileStore::in_dir(fixture.temp_dir.path());
    assert_eq!(reopened.get().await, custom);
}

#[tokio::test]
async fn test_corrupt_file_falls_back_to_defaults() {
    let fixture = StoreFixture::new();
    fixture.write_raw("{ this is not json");

    assert_eq!(fixture.store.get().await, Settings::default());
    assert_eq!(fixture.store.load_draft().await, None);

    // The next write replaces the unreadable file
    fixture.store.set(Settings { cliches: false, ..Settings::default() }).await;
    assert!(!fixture.store.get().await.cliches);
    let raw: serde_json::Value = serde_json::from_str(&fixture.read_raw()).unwrap();
    assert_eq!(raw["settings"]["cliches"], serde_json::json!(false));
}

#[tokio::test]
async fn test_missing_keys_default_to_enabled() {
    let fixture = StoreFixture::new();
    fixture.write_raw(r#"{ "settings": { "medicalTerms": false } }"#);

    assert_eq!(
        fixture.store.get().await,
        Settings {
            wordiness: true,
            medical_terms: false,
            cliches: true,
        }
    );
}

#[tokio::test]
async fn test_failed_write_is_dropped() {
    let fixture = StoreFixture::new();
    let blocker = fixture.temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let store = JsonFileStore::new(blocker.join("store.json"));
    let mut updates = store.subscribe();

    store.set(Settings { wordiness: false, ..Settings::default() }).await;
    store.save_draft("lost").await;

    assert_eq!(store.get().await, Settings::default());
    assert_eq!(store.load_draft().await, None);
    assert!(matches!(updates.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_set_notifies_subscribers() {
    let fixture = StoreFixture::new();
    let mut first = fixture.store.subscribe();
    let mut second = fixture.store.subscribe();

    let custom = Settings { medical_terms: false, ..Settings::default() };
    fixture.store.set(custom).await;

    assert_eq!(first.recv().await.unwrap(), custom);
    assert_eq!(second.recv().await.unwrap(), custom);
}

#[tokio::test]
async fn test_set_without_subscribers_still_persists() {
    let fixture = StoreFixture::new();
    let custom = Settings { wordiness: false, ..Settings::default() };

    fixture.store.set(custom).await;
    assert_eq!(fixture.store.get().await, custom);
}

#[tokio::test]
async fn test_install_writes_defaults_once() {
    let fixture = StoreFixture::new();

    assert_eq!(fixture.store.install().await.unwrap(), Settings::default());
    let raw: serde_json::Value = serde_json::from_str(&fixture.read_raw()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({ "settings": { "wordiness": true, "medicalTerms": true, "cliches": true } })
    );

    fixture.store.set(Settings { cliches: false, ..Settings::default() }).await;
    let kept = fixture.store.install().await.unwrap();
    assert!(!kept.cliches);
}

#[tokio::test]
async fn test_install_replaces_corrupt_store() {
    let fixture = StoreFixture::new();
    fixture.write_raw("{ \"settings\": ");

    assert_eq!(fixture.store.install().await.unwrap(), Settings::default());
    let raw: serde_json::Value = serde_json::from_str(&fixture.read_raw()).unwrap();
    assert_eq!(raw["settings"]["wordiness"], serde_json::json!(true));
}

#[tokio::test]
async fn test_draft_file_shape() {
    let fixture = StoreFixture::new();

    fixture.store.save_draft("I love science.").await;
    fixture.store.save_draft("I love science. Really.").await;

    let raw: serde_json::Value = serde_json::from_str(&fixture.read_raw()).unwrap();
    assert_eq!(raw, serde_json::json!({ "savedText": "I love science. Really." }));
    assert_eq!(fixture.store.load_draft().await.as_deref(), Some("I love science. Really."));
}
