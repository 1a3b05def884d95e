// WHY: One compiled-in rule table shared by every surface that scans text
// Surfaces differ only in overlap policy and settings gating, never in rules

use anyhow::{Context, Result};
use regex_automata::{meta::Regex, util::syntax};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub mod builtin;
pub mod terminology;

pub use terminology::COMMON_MISSPELLINGS;

/// Issue category a rule reports under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Phrases with a shorter equivalent
    Wordiness,
    /// Phrasing overused in medical school application essays
    Cliche,
    /// Hedged, vague or unsupported statements
    Weak,
    /// Misspelled medical terms with an exact correction
    Terminology,
}

impl Category {
    /// All categories in table order
    pub const ALL: [Category; 4] = [
        Category::Wordiness,
        Category::Cliche,
        Category::Weak,
        Category::Terminology,
    ];

    /// Card heading shown to the writer
    pub fn label(&self) -> &'static str {
        match self {
            Category::Wordiness => "Wordy Phrase",
            Category::Cliche => "Medical School Cliché",
            Category::Weak => "Weak Statement",
            Category::Terminology => "Medical Terminology",
        }
    }

    /// Accent color for the category's cards
    pub fn color(&self) -> &'static str {
        match self {
            Category::Wordiness => "#1a73e8",
            Category::Cliche => "#ea4335",
            Category::Weak => "#fbbc04",
            Category::Terminology => "#34a853",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Wordiness => write!(f, "wordiness"),
            Category::Cliche => write!(f, "cliche"),
            Category::Weak => write!(f, "weak"),
            Category::Terminology => write!(f, "terminology"),
        }
    }
}

/// A single detectable issue: compiled criterion plus the advice shown on a hit
///
/// Rules hold no scan state. Every scan starts from a fresh cursor, so one
/// rule can be shared across surfaces and repeated scans.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    pattern: String,
    category: Category,
    advice: String,
}

impl Rule {
    /// Compile a case-insensitive rule
    pub fn new(pattern: &str, category: Category, advice: impl Into<String>) -> Result<Self> {
        Self::compile(pattern, true, category, advice.into())
    }

    /// Compile a rule whose criterion respects letter case
    pub fn case_sensitive(pattern: &str, category: Category, advice: impl Into<String>) -> Result<Self> {
        Self::compile(pattern, false, category, advice.into())
    }

    /// Exact-term substitution: flags `term` as a whole word, case-sensitively,
    /// and advises `replacement`
    pub fn term(term: &str, replacement: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\b", regex_syntax::escape(term));
        Self::compile(
            &pattern,
            false,
            Category::Terminology,
            format!("Use \"{replacement}\""),
        )
    }

    fn compile(pattern: &str, case_insensitive: bool, category: Category, advice: String) -> Result<Self> {
        let regex = Regex::builder()
            .syntax(syntax::Config::new().case_insensitive(case_insensitive))
            .build(pattern)
            .with_context(|| format!("Invalid {category} rule pattern: {pattern}"))?;

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
            category,
            advice,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn advice(&self) -> &str {
        &self.advice
    }

    /// Source pattern the criterion was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

// Compiled regexes have no equality; two rules are equal when built from the same source
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.category == other.category && self.advice == other.advice
    }
}

impl Eq for Rule {}

/// Ordered rules of one category
#[derive(Debug, Clone)]
pub struct CategoryRules {
    category: Category,
    rules: Vec<Rule>,
}

impl CategoryRules {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Ordered collection of categories, each with its ordered rules
///
/// Order decides tie-breaks between matches starting at the same offset:
/// earlier categories and earlier rules come first in analysis output.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    groups: Vec<CategoryRules>,
}

impl RuleTable {
    /// Build a table from rules; categories keep the order of their first rule
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut groups: Vec<CategoryRules> = Vec::new();
        for rule in rules {
            match groups.iter_mut().find(|g| g.category == rule.category) {
                Some(group) => group.rules.push(rule),
                None => groups.push(CategoryRules {
                    category: rule.category,
                    rules: vec![rule],
                }),
            }
        }
        Self { groups }
    }

    /// Compile the built-in table used by every surface
    pub fn builtin() -> Result<Self> {
        let mut rules = Vec::new();

        for (pattern, advice) in builtin::WORDINESS {
            rules.push(Rule::new(pattern, Category::Wordiness, *advice)?);
        }
        for (pattern, advice) in builtin::CLICHES {
            rules.push(Rule::new(pattern, Category::Cliche, *advice)?);
        }
        for (pattern, advice) in builtin::WEAK_STATEMENTS {
            rules.push(Rule::new(pattern, Category::Weak, *advice)?);
        }
        for (term, replacement) in COMMON_MISSPELLINGS {
            rules.push(Rule::term(term, replacement)?);
        }

        let table = Self::new(rules);
        debug!("Compiled built-in rule table with {} rules", table.len());
        Ok(table)
    }

    /// Categories with their rules, in table order
    pub fn groups(&self) -> &[CategoryRules] {
        &self.groups
    }

    /// Rules of one category, empty if the table has none
    pub fn rules(&self, category: Category) -> &[Rule] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Every rule in table order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.groups.iter().flat_map(|g| g.rules.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
