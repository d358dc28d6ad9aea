//! Keyword-proximity score enhancement

use std::collections::HashSet;

/// Raises a candidate's score when a context word precedes it
///
/// Words are compared case-insensitively against the `window` alphanumeric
/// tokens immediately before the match. Context words are single tokens.
#[derive(Debug, Clone)]
pub struct ContextEnhancer {
    words: HashSet<String>,
    window: usize,
    boost: f64,
    min_score_with_context: f64,
}

impl ContextEnhancer {
    /// Default number of preceding tokens inspected
    pub const DEFAULT_WINDOW: usize = 5;
    /// Default score increase
    pub const DEFAULT_BOOST: f64 = 0.35;
    /// Default floor once context is found
    pub const DEFAULT_MIN_SCORE: f64 = 0.4;

    /// Create an enhancer with default window and boost
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            window: Self::DEFAULT_WINDOW,
            boost: Self::DEFAULT_BOOST,
            min_score_with_context: Self::DEFAULT_MIN_SCORE,
        }
    }

    /// Set the number of preceding tokens inspected
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the score increase and the floor applied when context is found
    pub fn with_boost(mut self, boost: f64, min_score_with_context: f64) -> Self {
        self.boost = boost.clamp(0.0, 1.0);
        self.min_score_with_context = min_score_with_context.clamp(0.0, 1.0);
        self
    }

    /// Whether no context words are configured
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether a context word appears within the window before `match_start`
    ///
    /// `match_start` is a byte offset on a char boundary.
    pub fn has_context(&self, text: &str, match_start: usize) -> bool {
        if self.words.is_empty() {
            return false;
        }

        text[..match_start]
            .rsplit(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .take(self.window)
            .any(|token| self.words.contains(&token.to_lowercase()))
    }

    /// Score after enhancement
    pub fn enhance(&self, text: &str, match_start: usize, score: f64) -> f64 {
        if self.has_context(text, match_start) {
            (score + self.boost).max(self.min_score_with_context).min(1.0)
        } else {
            score
        }
    }
}
