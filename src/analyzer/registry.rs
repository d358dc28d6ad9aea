//! Recognizer registry

use super::gazetteer::{LocationRecognizer, PersonRecognizer};
use super::patterns::PatternLibrary;
use super::Recognizer;
use crate::domain::EntityType;
use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Ordered collection of recognizers
///
/// Built once at start-up and shared read-only between requests.
#[derive(Default)]
pub struct RecognizerRegistry {
    recognizers: Vec<Arc<dyn Recognizer>>,
    by_entity: HashMap<EntityType, Vec<usize>>,
}

impl RecognizerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in pattern library and gazetteers
    pub fn with_defaults() -> Result<Self> {
        Self::from_library(PatternLibrary::default_library()?)
    }

    /// Registry with a custom pattern library file plus the gazetteers
    pub fn from_pattern_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_library(PatternLibrary::from_file(path)?)
    }

    /// Registry with a custom pattern library given as TOML plus the gazetteers
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::from_library(PatternLibrary::from_toml(content)?)
    }

    fn from_library(library: PatternLibrary) -> Result<Self> {
        let mut registry = Self::new();
        for recognizer in library.compile()? {
            registry.add(recognizer);
        }
        registry.add(PersonRecognizer::with_defaults()?);
        registry.add(LocationRecognizer::with_defaults()?);

        tracing::debug!(
            recognizers = registry.len(),
            entities = registry.by_entity.len(),
            "Recognizer registry built"
        );

        Ok(registry)
    }

    /// Register a recognizer
    pub fn add<R: Recognizer + 'static>(&mut self, recognizer: R) {
        self.add_shared(Arc::new(recognizer));
    }

    /// Register a recognizer already behind an `Arc`
    pub fn add_shared(&mut self, recognizer: Arc<dyn Recognizer>) {
        let position = self.recognizers.len();
        for entity in recognizer.supported_entities() {
            let positions = self.by_entity.entry(*entity).or_default();
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
        self.recognizers.push(recognizer);
    }

    /// Number of registered recognizers
    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    /// Whether no recognizer is registered
    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Recognizers for a language that emit any of the requested types
    ///
    /// Returned in registration order.
    pub fn recognizers_for(
        &self,
        language: &str,
        entities: &[EntityType],
    ) -> Vec<Arc<dyn Recognizer>> {
        let mut positions: Vec<usize> = entities
            .iter()
            .filter_map(|entity| self.by_entity.get(entity))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();

        positions
            .into_iter()
            .map(|position| &self.recognizers[position])
            .filter(|recognizer| recognizer.supported_language().eq_ignore_ascii_case(language))
            .cloned()
            .collect()
    }

    /// Language tags with at least one recognizer
    pub fn supported_languages(&self) -> BTreeSet<String> {
        self.recognizers
            .iter()
            .map(|r| r.supported_language().to_lowercase())
            .collect()
    }

    /// Whether any recognizer handles the language
    pub fn supports_language(&self, language: &str) -> bool {
        self.recognizers
            .iter()
            .any(|r| r.supported_language().eq_ignore_ascii_case(language))
    }

    /// Entity types with at least one recognizer, in declaration order
    pub fn registered_entities(&self) -> Vec<EntityType> {
        EntityType::ALL
            .into_iter()
            .filter(|entity| self.is_registered(*entity))
            .collect()
    }

    /// Whether any recognizer emits the entity type
    pub fn is_registered(&self, entity: EntityType) -> bool {
        self.by_entity
            .get(&entity)
            .is_some_and(|positions| !positions.is_empty())
    }

    /// Names of all registered recognizers, in registration order
    pub fn recognizer_names(&self) -> Vec<&str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for RecognizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerRegistry")
            .field("recognizers", &self.recognizer_names())
            .finish()
    }
}
