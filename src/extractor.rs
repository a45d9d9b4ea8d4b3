//! Phrase extraction from captured DOM snapshots
//!
//! One call to [`Extractor::extract`] is one extraction pass: it builds a fresh
//! [`PhraseSet`] from visible text nodes and from a fixed list of attributes.

use crate::config::AgentConfig;
use crate::dom::DomSnapshot;
use indexmap::IndexSet;
use serde::Serialize;

/// Deduplicated, insertion-ordered set of trimmed phrases from one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhraseSet {
    phrases: IndexSet<String>,
}

impl PhraseSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `raw` and insert it when longer than one character.
    /// Returns true if the phrase was newly added.
    pub fn insert(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.chars().count() <= 1 {
            return false;
        }
        self.phrases.insert(trimmed.to_string())
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.contains(phrase)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Iterate phrases in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a PhraseSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}

/// Collects translatable strings from a page snapshot
#[derive(Debug, Clone)]
pub struct Extractor {
    excluded_tags: Vec<String>,
}

impl Extractor {
    pub fn new(excluded_tags: Vec<String>) -> Self {
        Self { excluded_tags }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.excluded_tags.clone())
    }

    /// Run one extraction pass: text entries first, then attribute values
    pub fn extract(&self, snapshot: &DomSnapshot) -> PhraseSet {
        let mut phrases = PhraseSet::new();

        // Entries carry their immediate parent only, so text nested deeper
        // inside an excluded element is still harvested.
        for entry in &snapshot.texts {
            if entry.text.trim().is_empty() || self.is_excluded(&entry.parent_tag) {
                continue;
            }
            phrases.insert(&entry.text);
        }

        for attribute in &snapshot.attributes {
            phrases.insert(&attribute.value);
        }

        log::debug!(
            "Extracted {} phrases from {} ({} text nodes, {} attributes)",
            phrases.len(),
            snapshot.url,
            snapshot.texts.len(),
            snapshot.attributes.len()
        );
        phrases
    }

    fn is_excluded(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|excluded| excluded.eq_ignore_ascii_case(tag))
    }
}
