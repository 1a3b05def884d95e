pub mod rules;
pub mod matcher;
pub mod analysis;
pub mod settings;
pub mod monitor;
pub mod presenter;

// Re-export main types for convenient access
pub use rules::{Category, Rule, RuleTable};
pub use matcher::{find_matches, scan, Match, OverlapPolicy, DEDUP_WINDOW};
pub use analysis::{analyze, group_by_category, Analyzer, Gating, Outcome, Profile, Suggestion};

// Re-export collaborator contracts used by surfaces
pub use settings::{DraftStore, JsonFileStore, NoDrafts, Settings, SettingsStore};
pub use monitor::{ChangeMonitor, ContentChanged, MonitorConfig, MonitorStats, SharedText, TextSource, TextStats, Trigger};
pub use presenter::{Panel, Presenter, TextPresenter};
