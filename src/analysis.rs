// WHY: Aggregation of every rule's matches into display-ready suggestions
// `analyze` is pure; `Analyzer` adds snapshot memoization for surfaces that rescan often

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::matcher::{scan, Match, OverlapPolicy};
use crate::rules::{Category, RuleTable};
use crate::settings::Settings;

/// A match enriched for display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub category: Category,
    pub matched_text: String,
    pub advice: String,
    /// Zero-based character index into the scanned text
    pub offset: usize,
}

impl From<Match<'_>> for Suggestion {
    fn from(found: Match<'_>) -> Self {
        Self {
            category: found.category(),
            matched_text: found.matched_text.to_string(),
            advice: found.advice().to_string(),
            offset: found.offset,
        }
    }
}

/// Whether a surface consults [`Settings`] before scanning a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gating {
    /// Skip categories whose toggle is off
    RespectSettings,
    /// Scan every category regardless of settings
    AllCategories,
}

/// Per-surface scan parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub overlap: OverlapPolicy,
    pub gating: Gating,
}

impl Profile {
    /// Passive document surface: every match is reported
    pub const fn document() -> Self {
        Self {
            overlap: OverlapPolicy::Exhaustive,
            gating: Gating::RespectSettings,
        }
    }

    /// Interactive textarea: near-duplicate matches are suppressed while typing
    pub const fn live_typing() -> Self {
        Self {
            overlap: OverlapPolicy::Deduplicating,
            gating: Gating::RespectSettings,
        }
    }

    pub const fn with_gating(self, gating: Gating) -> Self {
        Self {
            overlap: self.overlap,
            gating,
        }
    }

    fn includes(&self, category: Category, settings: &Settings) -> bool {
        match self.gating {
            Gating::RespectSettings => settings.allows(category),
            Gating::AllCategories => true,
        }
    }
}

/// Scan `text` against every enabled rule in table order
///
/// Categories come in table order and rules in list order within a category;
/// matches of one rule are in text order. No deduplication across rules.
pub fn analyze(text: &str, table: &RuleTable, settings: &Settings, profile: Profile) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for group in table.groups() {
        if !profile.includes(group.category(), settings) {
            debug!("Skipping disabled category {}", group.category());
            continue;
        }
        for rule in group.rules() {
            suggestions.extend(scan(text, rule, profile.overlap).map(Suggestion::from));
        }
    }

    debug!(
        "Analyzed {} characters: {} suggestions",
        text.chars().count(),
        suggestions.len()
    );
    suggestions
}

/// Suggestions of one category, in analysis order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionGroup<'a> {
    pub category: Category,
    pub items: Vec<&'a Suggestion>,
}

/// Group suggestions by category, groups ordered by first appearance
pub fn group_by_category(suggestions: &[Suggestion]) -> Vec<SuggestionGroup<'_>> {
    let mut groups: Vec<SuggestionGroup<'_>> = Vec::new();
    for suggestion in suggestions {
        match groups.iter_mut().find(|g| g.category == suggestion.category) {
            Some(group) => group.items.push(suggestion),
            None => groups.push(SuggestionGroup {
                category: suggestion.category,
                items: vec![suggestion],
            }),
        }
    }
    groups
}

/// Result of a memoized analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The snapshot was scanned
    Fresh(Arc<[Suggestion]>),
    /// Same snapshot and settings as last time; previous result returned
    Cached(Arc<[Suggestion]>),
}

impl Outcome {
    pub fn suggestions(&self) -> &Arc<[Suggestion]> {
        match self {
            Outcome::Fresh(s) | Outcome::Cached(s) => s,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Outcome::Fresh(_))
    }
}

#[derive(Debug)]
struct Analyzed {
    text: String,
    settings: Settings,
    suggestions: Arc<[Suggestion]>,
}

/// Memoizing front end to [`analyze`] for one text source
///
/// Keyed on the exact snapshot and the settings it was scanned with, so a
/// settings change always forces a rescan.
#[derive(Debug)]
pub struct Analyzer {
    table: Arc<RuleTable>,
    profile: Profile,
    last: Option<Analyzed>,
    scans: usize,
}

impl Analyzer {
    pub fn new(table: Arc<RuleTable>, profile: Profile) -> Self {
        Self {
            table,
            profile,
            last: None,
            scans: 0,
        }
    }

    /// Whether `text` under `settings` is exactly what was analyzed last
    pub fn is_current(&self, text: &str, settings: &Settings) -> bool {
        self.last
            .as_ref()
            .is_some_and(|last| last.text == text && last.settings == *settings)
    }

    pub fn analyze(&mut self, text: &str, settings: &Settings) -> Outcome {
        if let Some(last) = self.last.as_ref().filter(|_| self.is_current(text, settings)) {
            debug!("Snapshot unchanged, reusing {} suggestions", last.suggestions.len());
            return Outcome::Cached(Arc::clone(&last.suggestions));
        }

        let suggestions: Arc<[Suggestion]> = analyze(text, &self.table, settings, self.profile).into();
        self.scans += 1;
        self.last = Some(Analyzed {
            text: text.to_string(),
            settings: *settings,
            suggestions: Arc::clone(&suggestions),
        });
        Outcome::Fresh(suggestions)
    }

    /// Result of the most recent scan
    pub fn last(&self) -> Option<&Arc<[Suggestion]>> {
        self.last.as_ref().map(|last| &last.suggestions)
    }

    /// Number of scans actually performed
    pub fn scans(&self) -> usize {
        self.scans
    }

    /// Forget the memoized snapshot
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn table() -> Arc<RuleTable> {
        Arc::new(RuleTable::builtin().unwrap())
    }

    #[test]
    fn test_table_order_is_output_order() {
        let table = RuleTable::new(vec![
            Rule::new(r"\bquite\b", Category::Weak, "weak").unwrap(),
            Rule::new(r"\bin order to\b", Category::Wordiness, "to").unwrap(),
        ]);
        let text = "in order to be quite sure";

        let suggestions = analyze(text, &table, &Settings::default(), Profile::document());
        let categories: Vec<Category> = suggestions.iter().map(|s| s.category).collect();
        assert_eq!(categories, vec![Category::Weak, Category::Wordiness]);
        assert_eq!(suggestions[0].offset, 15);
        assert_eq!(suggestions[1].offset, 0);
    }

    #[test]
    fn test_gating_skips_disabled_categories() {
        let table = table();
        let settings = Settings {
            wordiness: false,
            ..Settings::default()
        };
        let text = "In order to help people.";

        let gated = analyze(text, &table, &settings, Profile::document());
        assert!(gated.iter().all(|s| s.category != Category::Wordiness));

        let ungated = analyze(
            text,
            &table,
            &settings,
            Profile::document().with_gating(Gating::AllCategories),
        );
        assert!(ungated.iter().any(|s| s.category == Category::Wordiness));
    }

    #[test]
    fn test_live_typing_profile_deduplicates() {
        let table = table();
        let text = "very very very";

        let document = analyze(text, &table, &Settings::default(), Profile::document());
        let live = analyze(text, &table, &Settings::default(), Profile::live_typing());
        assert_eq!(document.len(), 3);
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_analyzer_memoizes_snapshot() {
        let mut analyzer = Analyzer::new(table(), Profile::document());
        let settings = Settings::default();

        let first = analyzer.analyze("I think so.", &settings);
        let second = analyzer.analyze("I think so.", &settings);

        assert!(first.is_fresh());
        assert!(!second.is_fresh());
        assert!(Arc::ptr_eq(first.suggestions(), second.suggestions()));
        assert_eq!(analyzer.scans(), 1);
    }

    #[test]
    fn test_analyzer_rescans_on_settings_change() {
        let mut analyzer = Analyzer::new(table(), Profile::document());
        let text = "In order to win.";

        analyzer.analyze(text, &Settings::default());
        let off = Settings {
            wordiness: false,
            ..Settings::default()
        };
        assert!(!analyzer.is_current(text, &off));

        let outcome = analyzer.analyze(text, &off);
        assert!(outcome.is_fresh());
        assert!(outcome.suggestions().iter().all(|s| s.category != Category::Wordiness));
        assert_eq!(analyzer.scans(), 2);

        analyzer.reset();
        assert!(analyzer.last().is_none());
    }

    #[test]
    fn test_group_by_category_first_appearance() {
        let s = |category, offset| Suggestion {
            category,
            matched_text: String::new(),
            advice: String::new(),
            offset,
        };
        let suggestions = vec![
            s(Category::Cliche, 4),
            s(Category::Weak, 0),
            s(Category::Cliche, 9),
        ];

        let groups = group_by_category(&suggestions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, Category::Cliche);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].category, Category::Weak);
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_suggestion_wire_shape() {
        let suggestion = Suggestion {
            category: Category::Wordiness,
            matched_text: "in order to".to_string(),
            advice: "to".to_string(),
            offset: 3,
        };
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "category": "wordiness", "matchedText": "in order to", "advice": "to", "offset": 3 })
        );
    }
}
