// WHY: Decides when a mutating text source is re-analyzed and when its text is persisted
// Single event loop per source; a new change replaces pending deadlines, so only the
// final state of an edit burst is ever acted on

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::analysis::{Analyzer, Outcome};
use crate::presenter::{Panel, Presenter};
use crate::settings::{DraftStore, Settings};

/// Quiet period before the live-typing surface re-analyzes
pub const LIVE_ANALYSIS_DELAY: Duration = Duration::from_millis(300);

/// Quiet period before the live-typing surface saves its text
pub const LIVE_PERSIST_DELAY: Duration = Duration::from_millis(500);

/// Analysis window opened by the first change on the document surface
pub const DOCUMENT_ANALYSIS_DELAY: Duration = Duration::from_millis(1000);

/// Interval between checks for a document surface that has not loaded yet
pub const DOCUMENT_LOAD_POLL: Duration = Duration::from_millis(1000);

/// Observable text surface
pub trait TextSource {
    /// Flattened plain text of the surface, `None` while it has not loaded
    fn snapshot(&self) -> Option<String>;
}

/// Coarse "content may have changed" notification; says nothing about what changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentChanged;

/// In-memory text surface shared between an editor and its monitor
#[derive(Debug, Clone, Default)]
pub struct SharedText {
    inner: Arc<Mutex<Option<String>>>,
}

impl SharedText {
    /// A surface that has not loaded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// A loaded surface holding `text`
    pub fn loaded(text: impl Into<String>) -> Self {
        let source = Self::new();
        source.set(text);
        source
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = Some(text.into());
    }

    /// Append a line, loading the surface if needed
    pub fn push_line(&self, line: &str) {
        let mut guard = self.lock();
        let text = guard.get_or_insert_with(String::new);
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
    }

    /// Return to the not-loaded state
    pub fn unload(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TextSource for SharedText {
    fn snapshot(&self) -> Option<String> {
        self.lock().clone()
    }
}

/// Live word and character counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// How change notifications turn into analysis passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Every change restarts the analysis timer
    Debounce,
    /// The first change opens an analysis window; changes while it is open
    /// are coalesced into that pass
    Guarded,
}

/// Timing and behavior of one monitored surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub trigger: Trigger,
    pub analysis_delay: Duration,
    /// Debounce for saving the raw text, `None` for surfaces that never save
    pub persist_delay: Option<Duration>,
    /// Poll interval while the source has not loaded, `None` to start immediately
    pub load_poll: Option<Duration>,
    /// Report word and character counts on every change
    pub report_stats: bool,
    /// Treat an empty snapshot as "no observable content"
    pub skip_empty: bool,
}

impl MonitorConfig {
    /// Interactive textarea
    pub fn live_typing() -> Self {
        Self {
            trigger: Trigger::Debounce,
            analysis_delay: LIVE_ANALYSIS_DELAY,
            persist_delay: Some(LIVE_PERSIST_DELAY),
            load_poll: None,
            report_stats: true,
            skip_empty: false,
        }
    }

    /// Passively observed document editor
    pub fn document() -> Self {
        Self {
            trigger: Trigger::Guarded,
            analysis_delay: DOCUMENT_ANALYSIS_DELAY,
            persist_delay: None,
            load_poll: Some(DOCUMENT_LOAD_POLL),
            report_stats: false,
            skip_empty: true,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::live_typing()
    }
}

/// Counters for one monitor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    /// Scans performed and rendered
    pub analyses: usize,
    /// Passes that found the snapshot already analyzed
    pub cached: usize,
    /// Changes merged into an already pending pass
    pub coalesced: usize,
    /// Changes or passes dropped because there was nothing new to analyze
    pub skipped: usize,
    /// Draft saves issued
    pub persisted: usize,
}

/// Event loop that keeps one surface's suggestions fresh
pub struct ChangeMonitor<S, P, D> {
    source: S,
    presenter: P,
    drafts: D,
    analyzer: Analyzer,
    settings: Settings,
    config: MonitorConfig,
    stats: MonitorStats,
    analysis_at: Option<Instant>,
    persist_at: Option<Instant>,
}

impl<S, P, D> ChangeMonitor<S, P, D>
where
    S: TextSource,
    P: Presenter,
    D: DraftStore,
{
    pub fn new(source: S, presenter: P, drafts: D, analyzer: Analyzer) -> Self {
        Self {
            source,
            presenter,
            drafts,
            analyzer,
            settings: Settings::default(),
            config: MonitorConfig::default(),
            stats: MonitorStats::default(),
            analysis_at: None,
            persist_at: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until `changes` closes and every pending timer has fired
    ///
    /// `settings_updates` delivers settings changed by another surface; a
    /// closed or lagging channel only stops live updates.
    pub async fn run(
        mut self,
        mut changes: mpsc::UnboundedReceiver<ContentChanged>,
        mut settings_updates: Option<broadcast::Receiver<Settings>>,
    ) -> MonitorStats {
        self.render(Panel::Pending);

        if let Some(poll) = self.config.load_poll {
            if !self.wait_for_content(poll, &mut changes).await {
                info!("Text source closed before it loaded");
                return self.stats;
            }
        }

        if let Some(text) = self.observable_snapshot() {
            self.analyze(&text);
        }

        let mut changes_open = true;
        loop {
            if !changes_open && self.analysis_at.is_none() && self.persist_at.is_none() {
                break;
            }

            tokio::select! {
                signal = changes.recv(), if changes_open => match signal {
                    Some(ContentChanged) => self.on_change(),
                    None => {
                        debug!("Change channel closed, draining pending timers");
                        changes_open = false;
                    }
                },
                update = next_update(&mut settings_updates) => match update {
                    Ok(settings) => self.on_settings(settings),
                    Err(RecvError::Lagged(missed)) => {
                        debug!("Missed {} settings updates", missed);
                    }
                    Err(RecvError::Closed) => settings_updates = None,
                },
                _ = wait_until(self.analysis_at), if self.analysis_at.is_some() => {
                    self.analysis_at = None;
                    self.fire_analysis();
                }
                _ = wait_until(self.persist_at), if self.persist_at.is_some() => {
                    self.persist_at = None;
                    self.fire_persist().await;
                }
            }
        }

        info!(
            "Monitor finished: {} analyses, {} coalesced, {} skipped, {} saves",
            self.stats.analyses, self.stats.coalesced, self.stats.skipped, self.stats.persisted
        );
        self.stats
    }

    /// Poll until the source reports content; false if `changes` closes first
    async fn wait_for_content(
        &self,
        poll: Duration,
        changes: &mut mpsc::UnboundedReceiver<ContentChanged>,
    ) -> bool {
        loop {
            if self.source.snapshot().is_some() {
                return true;
            }
            debug!("Text source not loaded, checking again in {:?}", poll);

            tokio::select! {
                _ = sleep(poll) => {}
                signal = changes.recv() => {
                    if signal.is_none() {
                        return false;
                    }
                }
            }
        }
    }

    fn on_change(&mut self) {
        match self.config.trigger {
            Trigger::Debounce => {
                if self.config.report_stats {
                    if let Some(text) = self.source.snapshot() {
                        self.show_stats(TextStats::of(&text));
                    }
                }
                self.restart_analysis_timer();
            }
            Trigger::Guarded => self.open_analysis_window(),
        }

        if let Some(delay) = self.config.persist_delay {
            self.persist_at = Some(Instant::now() + delay);
        }
    }

    fn on_settings(&mut self, settings: Settings) {
        if settings == self.settings {
            return;
        }
        info!(?settings, "Settings updated by another surface");
        self.settings = settings;

        match self.config.trigger {
            Trigger::Debounce => self.restart_analysis_timer(),
            Trigger::Guarded => self.open_analysis_window(),
        }
    }

    fn restart_analysis_timer(&mut self) {
        if self.analysis_at.is_some() {
            self.stats.coalesced += 1;
        }
        self.analysis_at = Some(Instant::now() + self.config.analysis_delay);
    }

    fn open_analysis_window(&mut self) {
        if self.analysis_at.is_some() {
            self.stats.coalesced += 1;
            return;
        }

        let Some(text) = self.observable_snapshot() else {
            self.stats.skipped += 1;
            return;
        };
        if self.analyzer.is_current(&text, &self.settings) {
            debug!("Snapshot already analyzed, not scheduling");
            self.stats.skipped += 1;
            return;
        }

        self.analysis_at = Some(Instant::now() + self.config.analysis_delay);
    }

    fn observable_snapshot(&self) -> Option<String> {
        self.source
            .snapshot()
            .filter(|text| !(self.config.skip_empty && text.is_empty()))
    }

    fn fire_analysis(&mut self) {
        match self.observable_snapshot() {
            Some(text) => self.analyze(&text),
            None => self.stats.skipped += 1,
        }
    }

    fn analyze(&mut self, text: &str) {
        match self.analyzer.analyze(text, &self.settings) {
            Outcome::Fresh(suggestions) => {
                self.stats.analyses += 1;
                self.render(Panel::from_suggestions(&suggestions));
            }
            Outcome::Cached(_) => self.stats.cached += 1,
        }
    }

    async fn fire_persist(&mut self) {
        if let Some(text) = self.source.snapshot() {
            self.drafts.save_draft(&text).await;
            self.stats.persisted += 1;
        }
    }

    fn render(&mut self, panel: Panel<'_>) {
        if let Err(e) = self.presenter.render(panel) {
            warn!("Presenter failed to render suggestions: {:#}", e);
        }
    }

    fn show_stats(&mut self, stats: TextStats) {
        if let Err(e) = self.presenter.show_stats(stats) {
            warn!("Presenter failed to show text stats: {:#}", e);
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn next_update(updates: &mut Option<broadcast::Receiver<Settings>>) -> Result<Settings, RecvError> {
    match updates {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}
