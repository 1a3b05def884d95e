// WHY: Stateless scan of one rule over one text snapshot
// Each call owns a fresh cursor; nothing about a scan outlives its iterator

use regex_automata::Input;

use crate::rules::{Category, Rule};

/// Accepted matches of one rule must start more than this many characters apart
/// under [`OverlapPolicy::Deduplicating`]
pub const DEDUP_WINDOW: usize = 10;

/// How matches of the same rule that start close together are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Every match is reported (document scanning)
    Exhaustive,
    /// A match starting within [`DEDUP_WINDOW`] characters of the previously
    /// accepted one is dropped (live typing)
    Deduplicating,
}

/// One hit of a rule, borrowed from the rule and the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    rule: &'a Rule,
    /// Exact text the criterion matched
    pub matched_text: &'a str,
    /// Zero-based character index where the match starts
    pub offset: usize,
}

impl<'a> Match<'a> {
    pub fn category(&self) -> Category {
        self.rule.category()
    }

    pub fn advice(&self) -> &'a str {
        self.rule.advice()
    }

    pub fn rule(&self) -> &'a Rule {
        self.rule
    }
}

/// Byte offset to character offset conversion for a forward-only scan
///
/// Match starts within a scan strictly increase, so each character of the
/// text is counted at most once.
#[derive(Debug, Default)]
struct CharCounter {
    byte_pos: usize,
    char_pos: usize,
}

impl CharCounter {
    fn advance_to_byte(&mut self, text: &str, target_byte_pos: usize) -> usize {
        if target_byte_pos > self.byte_pos {
            self.char_pos += text[self.byte_pos..target_byte_pos].chars().count();
            self.byte_pos = target_byte_pos;
        }
        self.char_pos
    }
}

/// Lazy sequence of every match of a rule, in text order
#[derive(Debug)]
pub struct Matches<'a> {
    rule: &'a Rule,
    text: &'a str,
    /// Byte position of the next search, `None` once the scan is exhausted
    cursor: Option<usize>,
    counter: CharCounter,
}

impl<'a> Matches<'a> {
    fn new(text: &'a str, rule: &'a Rule) -> Self {
        Self {
            rule,
            text,
            cursor: Some(0),
            counter: CharCounter::default(),
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Match<'a>> {
        let pos = self.cursor?;
        let input = Input::new(self.text).range(pos..);

        let Some(found) = self.rule.regex().search(&input) else {
            self.cursor = None;
            return None;
        };

        // An empty match must still move the cursor by one whole character
        self.cursor = if found.is_empty() {
            next_char_boundary(self.text, found.end())
        } else {
            Some(found.end())
        };

        let offset = self.counter.advance_to_byte(self.text, found.start());
        Some(Match {
            rule: self.rule,
            matched_text: &self.text[found.range()],
            offset,
        })
    }
}

fn next_char_boundary(text: &str, byte_pos: usize) -> Option<usize> {
    text[byte_pos..].chars().next().map(|c| byte_pos + c.len_utf8())
}

/// Drops matches that start within [`DEDUP_WINDOW`] characters of the last accepted one
#[derive(Debug)]
pub struct Deduplicated<I> {
    inner: I,
    last_offset: Option<usize>,
}

impl<'a, I> Iterator for Deduplicated<I>
where
    I: Iterator<Item = Match<'a>>,
{
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Match<'a>> {
        for candidate in self.inner.by_ref() {
            let accepted = self
                .last_offset
                .map_or(true, |last| candidate.offset > last + DEDUP_WINDOW);
            if accepted {
                self.last_offset = Some(candidate.offset);
                return Some(candidate);
            }
        }
        None
    }
}

/// Scan iterator for either overlap policy
#[derive(Debug)]
pub enum Scan<'a> {
    Exhaustive(Matches<'a>),
    Deduplicating(Deduplicated<Matches<'a>>),
}

impl<'a> Iterator for Scan<'a> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Match<'a>> {
        match self {
            Scan::Exhaustive(matches) => matches.next(),
            Scan::Deduplicating(matches) => matches.next(),
        }
    }
}

/// Every match of `rule` in `text`, exhaustive
pub fn find_matches<'a>(text: &'a str, rule: &'a Rule) -> Matches<'a> {
    Matches::new(text, rule)
}

/// Matches of `rule` in `text` under the given overlap policy
pub fn scan<'a>(text: &'a str, rule: &'a Rule, policy: OverlapPolicy) -> Scan<'a> {
    let matches = find_matches(text, rule);
    match policy {
        OverlapPolicy::Exhaustive => Scan::Exhaustive(matches),
        OverlapPolicy::Deduplicating => Scan::Deduplicating(Deduplicated {
            inner: matches,
            last_offset: None,
        }),
    }
}
