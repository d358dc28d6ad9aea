//! Dictionary-driven recognizers for names and places
//!
//! These stand in for a statistical NER tagger: deterministic, cheap, and
//! loaded once from the word lists under `patterns/`.

use super::context::ContextEnhancer;
use super::Recognizer;
use crate::domain::{CharIndex, EntitySpan, EntityType};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;

const DEFAULT_FIRST_NAMES: &str = include_str!("../../patterns/first_names.txt");
const DEFAULT_LOCATIONS: &str = include_str!("../../patterns/locations.txt");

/// Capitalised words that never continue a name
const NAME_STOP_WORDS: &[&str] = &[
    "The", "And", "Or", "But", "In", "On", "At", "To", "From", "For", "With", "Is", "Was",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

/// Parse a word list: one entry per line, `#` starts a comment line
pub fn parse_word_list(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// PERSON recognizer based on a first-name gazetteer
///
/// A known first name followed by up to two capitalised words is reported
/// as a full name; a known first name on its own gets a lower score.
pub struct PersonRecognizer {
    first_names: HashSet<String>,
    token: Regex,
    full_name_score: f64,
    first_name_score: f64,
    context: ContextEnhancer,
    entities: [EntityType; 1],
}

impl PersonRecognizer {
    /// Recognizer name
    pub const NAME: &'static str = "person_gazetteer";

    /// Create a recognizer from a list of first names
    pub fn new<I, S>(first_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let first_names: HashSet<String> = first_names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if first_names.is_empty() {
            anyhow::bail!("Person gazetteer requires at least one first name");
        }

        let token = Regex::new(r"\b\p{Lu}\p{Ll}+(?:['-]\p{Lu}\p{Ll}+)?\b")
            .context("Failed to compile name token regex")?;

        Ok(Self {
            first_names,
            token,
            full_name_score: 0.85,
            first_name_score: 0.6,
            context: ContextEnhancer::new(["name", "mr", "mrs", "ms", "dear", "patient", "signed"]),
            entities: [EntityType::Person],
        })
    }

    /// Create a recognizer from the built-in first-name list
    pub fn with_defaults() -> Result<Self> {
        Self::new(parse_word_list(DEFAULT_FIRST_NAMES))
    }

    /// Override the full-name and first-name-only scores
    pub fn with_scores(mut self, full_name: f64, first_name_only: f64) -> Self {
        self.full_name_score = full_name.clamp(0.0, 1.0);
        self.first_name_score = first_name_only.clamp(0.0, 1.0);
        self
    }

    fn continues_name(text: &str, previous_end: usize, next_start: usize, word: &str) -> bool {
        let gap = &text[previous_end..next_start];
        !gap.is_empty()
            && gap.chars().all(|c| c == ' ' || c == '\t')
            && !NAME_STOP_WORDS.contains(&word)
    }
}

impl Recognizer for PersonRecognizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supported_entities(&self) -> &[EntityType] {
        &self.entities
    }

    fn detect(&self, text: &str, index: &CharIndex) -> Vec<EntitySpan> {
        let tokens: Vec<_> = self.token.find_iter(text).collect();
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if !self.first_names.contains(tokens[i].as_str()) {
                i += 1;
                continue;
            }

            let mut last = i;
            while last + 1 < tokens.len()
                && last - i < 2
                && Self::continues_name(
                    text,
                    tokens[last].end(),
                    tokens[last + 1].start(),
                    tokens[last + 1].as_str(),
                )
            {
                last += 1;
            }

            let base = if last > i {
                self.full_name_score
            } else {
                self.first_name_score
            };
            let score = self.context.enhance(text, tokens[i].start(), base);

            if let Some(range) = index.char_range(tokens[i].start()..tokens[last].end()) {
                spans.push(
                    EntitySpan::new(EntityType::Person, range.start, range.end, score)
                        .with_recognizer(Self::NAME),
                );
            }
            i = last + 1;
        }

        spans
    }
}

/// LOCATION recognizer based on a place-name gazetteer
///
/// Entries are matched case-sensitively on word boundaries; multi-word
/// entries tolerate any run of whitespace between words. Longer entries win
/// over their prefixes ("New York" over "New").
pub struct LocationRecognizer {
    regex: Regex,
    score: f64,
    entities: [EntityType; 1],
}

impl LocationRecognizer {
    /// Recognizer name
    pub const NAME: &'static str = "location_gazetteer";

    /// Create a recognizer from a list of place names
    pub fn new<I, S>(places: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut places: Vec<String> = places
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if places.is_empty() {
            anyhow::bail!("Location gazetteer requires at least one place name");
        }

        places.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        places.dedup();

        let alternation = places
            .iter()
            .map(|p| {
                p.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");

        let regex = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .context("Failed to compile location gazetteer")?;

        Ok(Self {
            regex,
            score: 0.85,
            entities: [EntityType::Location],
        })
    }

    /// Create a recognizer from the built-in place list
    pub fn with_defaults() -> Result<Self> {
        Self::new(parse_word_list(DEFAULT_LOCATIONS))
    }

    /// Override the match score
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score.clamp(0.0, 1.0);
        self
    }
}

impl Recognizer for LocationRecognizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supported_entities(&self) -> &[EntityType] {
        &self.entities
    }

    fn detect(&self, text: &str, index: &CharIndex) -> Vec<EntitySpan> {
        self.regex
            .find_iter(text)
            .filter_map(|m| index.char_range(m.range()))
            .map(|range| {
                EntitySpan::new(EntityType::Location, range.start, range.end, self.score)
                    .with_recognizer(Self::NAME)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(recognizer: &dyn Recognizer, text: &str) -> Vec<(usize, usize, f64)> {
        recognizer
            .detect(text, &CharIndex::new(text))
            .into_iter()
            .map(|s| (s.start, s.end, s.score))
            .collect()
    }

    #[test]
    fn test_full_name() {
        let recognizer = PersonRecognizer::with_defaults().unwrap();
        let spans = detect(&recognizer, "Contact John Doe at john@example.com");
        assert_eq!(spans, vec![(8, 16, 0.85)]);
    }

    #[test]
    fn test_first_name_only_scores_lower() {
        let recognizer = PersonRecognizer::with_defaults().unwrap();
        let spans = detect(&recognizer, "Ask Sarah tomorrow");
        assert_eq!(spans, vec![(4, 9, 0.6)]);
    }

    #[test]
    fn test_name_stops_at_stop_word_and_newline() {
        let recognizer = PersonRecognizer::with_defaults().unwrap();
        assert_eq!(detect(&recognizer, "Emma On Monday"), vec![(0, 4, 0.6)]);
        assert_eq!(detect(&recognizer, "Emma\nWatson"), vec![(0, 4, 0.6)]);
    }

    #[test]
    fn test_name_extends_at_most_two_words() {
        let recognizer = PersonRecognizer::new(["Mary"]).unwrap();
        let spans = detect(&recognizer, "Mary Ann Lee Jones");
        assert_eq!(spans, vec![(0, 12, 0.85)]);
    }

    #[test]
    fn test_person_context_boost() {
        let recognizer = PersonRecognizer::with_defaults().unwrap();
        let spans = detect(&recognizer, "Patient name: Olivia");
        assert_eq!(spans.len(), 1);
        assert!((spans[0].2 - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_location_prefers_longest_entry() {
        let recognizer = LocationRecognizer::with_defaults().unwrap();
        let spans = detect(&recognizer, "Flights from New York to Paris");
        assert_eq!(spans, vec![(13, 21, 0.85), (25, 30, 0.85)]);
    }

    #[test]
    fn test_location_respects_word_boundaries() {
        let recognizer = LocationRecognizer::with_defaults().unwrap();
        assert!(detect(&recognizer, "Indian cuisine").is_empty());
        assert_eq!(detect(&recognizer, "Indiana"), vec![(0, 7, 0.85)]);
    }

    #[test]
    fn test_empty_gazetteers_are_rejected() {
        assert!(PersonRecognizer::new(Vec::<String>::new()).is_err());
        assert!(LocationRecognizer::new(["", "  "]).is_err());
    }

    #[test]
    fn test_parse_word_list_skips_comments() {
        let words: Vec<_> = parse_word_list("# header\nAlpha\n\n  Beta  \n").collect();
        assert_eq!(words, vec!["Alpha", "Beta"]);
    }
}
