// Integration test utilities and common code
// WHY: Centralized recording collaborators avoid duplication across integration tests

#![allow(dead_code)]

use anyhow::Result;
use medwriter::{DraftStore, JsonFileStore, Panel, Presenter, RuleTable, Suggestion, TextStats};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Sample sentence hitting wordiness, cliché and weak rules at once
pub const ESSAY: &str = "In order to help people, I have always dreamed of being a doctor.";

/// Compiled built-in table shared by a test
pub fn builtin_table() -> Arc<RuleTable> {
    Arc::new(RuleTable::builtin().expect("Built-in rules should compile"))
}

/// Owned copy of one rendered panel
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Pending,
    Empty,
    Suggestions(Vec<Suggestion>),
}

impl Rendered {
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Rendered::Suggestions(suggestions) => suggestions,
            _ => &[],
        }
    }
}

/// Presenter that records every frame for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    frames: Arc<Mutex<Vec<Rendered>>>,
    stats: Arc<Mutex<Vec<TextStats>>>,
}

impl RecordingPresenter {
    pub fn frames(&self) -> Vec<Rendered> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Rendered> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn stats(&self) -> Vec<TextStats> {
        self.stats.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, panel: Panel<'_>) -> Result<()> {
        let frame = match panel {
            Panel::Pending => Rendered::Pending,
            Panel::Empty => Rendered::Empty,
            Panel::Suggestions(suggestions) => Rendered::Suggestions(suggestions.to_vec()),
        };
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }

    fn show_stats(&mut self, stats: TextStats) -> Result<()> {
        self.stats.lock().unwrap().push(stats);
        Ok(())
    }
}

/// Draft store that keeps every save in memory
#[derive(Debug, Default)]
pub struct RecordingDrafts {
    saved: Mutex<Vec<String>>,
}

impl RecordingDrafts {
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

impl DraftStore for RecordingDrafts {
    async fn load_draft(&self) -> Option<String> {
        self.saved.lock().unwrap().last().cloned()
    }

    async fn save_draft(&self, text: &str) {
        self.saved.lock().unwrap().push(text.to_string());
    }
}

/// Temporary directory holding a JSON store
pub struct StoreFixture {
    pub temp_dir: TempDir,
    pub store: JsonFileStore,
}

impl StoreFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = JsonFileStore::in_dir(temp_dir.path());
        Self { temp_dir, store }
    }

    /// Overwrite the store file with raw content
    pub fn write_raw(&self, content: &str) {
        std::fs::write(self.store.path(), content).expect("Failed to write store file");
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(self.store.path()).expect("Failed to read store file")
    }
}
