// WHY: Per-category toggles and best-effort persistence shared between surfaces
// Storage failures never reach the writer: reads fall back to defaults, failed writes are dropped

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::rules::Category;

/// Default store file name inside a root directory
pub const DEFAULT_STORE_FILE: &str = ".medwriter.json";

/// Capacity of the settings notification channel
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Per-category on/off toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub wordiness: bool,
    pub medical_terms: bool,
    pub cliches: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wordiness: true,
            medical_terms: true,
            cliches: true,
        }
    }
}

impl Settings {
    /// Whether suggestions of `category` should be produced
    ///
    /// Weak statements have no toggle and are always on.
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Wordiness => self.wordiness,
            Category::Cliche => self.cliches,
            Category::Terminology => self.medical_terms,
            Category::Weak => true,
        }
    }
}

/// Source of the persisted [`Settings`]
pub trait SettingsStore {
    /// Current settings; defaults when nothing is stored or the store is unreadable
    fn get(&self) -> impl Future<Output = Settings> + Send;

    /// Persist `settings` and notify listening surfaces; failures are dropped
    fn set(&self, settings: Settings) -> impl Future<Output = ()> + Send;
}

/// Persistence for the live-typing surface's raw text
pub trait DraftStore {
    fn load_draft(&self) -> impl Future<Output = Option<String>> + Send;

    fn save_draft(&self, text: &str) -> impl Future<Output = ()> + Send;
}

impl<T: DraftStore + Send + Sync> DraftStore for Arc<T> {
    fn load_draft(&self) -> impl Future<Output = Option<String>> + Send {
        (**self).load_draft()
    }

    fn save_draft(&self, text: &str) -> impl Future<Output = ()> + Send {
        (**self).save_draft(text)
    }
}

/// Draft store for surfaces that never persist their text
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDrafts;

impl DraftStore for NoDrafts {
    async fn load_draft(&self) -> Option<String> {
        None
    }

    async fn save_draft(&self, _text: &str) {}
}

/// On-disk shape: `{ "settings": {...}, "savedText": "..." }`
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_text: Option<String>,
}

/// JSON file store for settings and the saved draft
///
/// Successful `set` calls are published on a broadcast channel so other open
/// surfaces pick up the change live. A surface that is not subscribed misses
/// the update and sees it on its next `get`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    updates: broadcast::Sender<Settings>,
    // Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            updates,
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the default file name inside `root_dir`
    pub fn in_dir(root_dir: &Path) -> Self {
        Self::new(root_dir.join(DEFAULT_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Listen for settings changes made through this store
    pub fn subscribe(&self) -> broadcast::Receiver<Settings> {
        self.updates.subscribe()
    }

    /// Read the stored state; a missing file is empty state
    pub async fn read_state(&self) -> Result<StoredState> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Corrupt store file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredState::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read store {}", self.path.display())),
        }
    }

    /// Replace the stored state
    pub async fn write_state(&self, state: &StoredState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create store directory {}", parent.display()))?;
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write store {}", self.path.display()))?;
        Ok(())
    }

    /// Write default settings unless settings already exist; returns the active settings
    pub async fn install(&self) -> Result<Settings> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state_for_write().await;

        if let Some(existing) = state.settings {
            debug!("Store {} already has settings", self.path.display());
            return Ok(existing);
        }

        let settings = Settings::default();
        state.settings = Some(settings);
        self.write_state(&state).await?;
        info!("Installed default settings in {}", self.path.display());
        Ok(settings)
    }

    /// Current state as the base of a write; an unreadable store is replaced
    async fn read_state_for_write(&self) -> StoredState {
        match self.read_state().await {
            Ok(state) => state,
            Err(e) => {
                warn!("Replacing unreadable store: {:#}", e);
                StoredState::default()
            }
        }
    }

    /// Apply `update` to the stored state under the write lock
    async fn update_state(&self, update: impl FnOnce(&mut StoredState)) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state_for_write().await;
        update(&mut state);
        self.write_state(&state).await
    }
}

impl SettingsStore for JsonFileStore {
    async fn get(&self) -> Settings {
        match self.read_state().await {
            Ok(state) => state.settings.unwrap_or_default(),
            Err(e) => {
                warn!("Falling back to default settings: {:#}", e);
                Settings::default()
            }
        }
    }

    async fn set(&self, settings: Settings) {
        if let Err(e) = self.update_state(|state| state.settings = Some(settings)).await {
            warn!("Dropping settings update: {:#}", e);
            return;
        }

        // No subscribers is not an error: nobody is listening right now
        if self.updates.send(settings).is_err() {
            debug!("No surface listening for settings updates");
        }
    }
}

impl DraftStore for JsonFileStore {
    async fn load_draft(&self) -> Option<String> {
        match self.read_state().await {
            Ok(state) => state.saved_text,
            Err(e) => {
                warn!("Ignoring unreadable draft: {:#}", e);
                None
            }
        }
    }

    async fn save_draft(&self, text: &str) {
        let text = text.to_string();
        if let Err(e) = self.update_state(|state| state.saved_text = Some(text)).await {
            warn!("Dropping draft save: {:#}", e);
        }
    }
}
