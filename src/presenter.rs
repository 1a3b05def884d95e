// WHY: Rendering contract between the analysis core and whatever draws suggestion cards
// The core only hands over panel states; layout and styling stay with the presenter

use anyhow::Result;
use std::io::{self, Write};

use crate::analysis::{group_by_category, Suggestion};
use crate::monitor::TextStats;

/// Shown before the first analysis pass completes
pub const PENDING_MESSAGE: &str = "Analyzing...";

/// Shown when a completed pass found nothing
pub const EMPTY_MESSAGE: &str = "No suggestions yet. Keep writing!";

/// What the suggestion panel should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel<'a> {
    /// No analysis has completed yet
    Pending,
    /// Analysis completed with no suggestions
    Empty,
    Suggestions(&'a [Suggestion]),
}

impl<'a> Panel<'a> {
    pub fn from_suggestions(suggestions: &'a [Suggestion]) -> Self {
        if suggestions.is_empty() {
            Panel::Empty
        } else {
            Panel::Suggestions(suggestions)
        }
    }
}

/// Consumer of analysis results
pub trait Presenter {
    fn render(&mut self, panel: Panel<'_>) -> Result<()>;

    /// Live word and character counts; ignored unless the surface shows them
    fn show_stats(&mut self, _stats: TextStats) -> Result<()> {
        Ok(())
    }
}

/// Plain-text cards written to any [`Write`] sink
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: W,
    grouped: bool,
    show_stats: bool,
}

impl TextPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            grouped: false,
            show_stats: false,
        }
    }

    /// Emit one section per category instead of a flat list
    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// Print word and character counts on every change
    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_card(&mut self, suggestion: &Suggestion) -> io::Result<()> {
        writeln!(self.out, "{}", suggestion.category.label())?;
        writeln!(self.out, "  Found: \"{}\"", suggestion.matched_text)?;
        writeln!(self.out, "  Suggestion: {}", suggestion.advice)
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, panel: Panel<'_>) -> Result<()> {
        match panel {
            Panel::Pending => writeln!(self.out, "{PENDING_MESSAGE}")?,
            Panel::Empty => writeln!(self.out, "{EMPTY_MESSAGE}")?,
            Panel::Suggestions(suggestions) if self.grouped => {
                for group in group_by_category(suggestions) {
                    writeln!(self.out, "== {} ({})", group.category.label(), group.items.len())?;
                    for suggestion in group.items {
                        self.write_card(suggestion)?;
                    }
                }
            }
            Panel::Suggestions(suggestions) => {
                for suggestion in suggestions {
                    self.write_card(suggestion)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn show_stats(&mut self, stats: TextStats) -> Result<()> {
        if self.show_stats {
            writeln!(self.out, "Words: {}  Characters: {}", stats.words, stats.characters)?;
        }
        Ok(())
    }
}
