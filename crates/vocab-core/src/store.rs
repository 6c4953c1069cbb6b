//! The word store: CRUD, search, and import/export over the vocabulary.
//!
//! Every successful mutation writes the whole collection back to storage
//! before returning. A failed operation leaves the collection as it was.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::codec;
use crate::error::{Result, VocabError};
use crate::model::{Word, WordUpdate};
use crate::samples;
use crate::storage::{load_json_or_default, save_json};
use crate::traits::{Storage, WORDS_KEY};

/// Maximum length of a foreign word or translation, in characters.
pub const MAX_FIELD_LEN: usize = 100;
/// Category given to words added without one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";
/// Category given to imported words.
pub const IMPORTED_CATEGORY: &str = "imported";

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Words added to the store.
    pub imported: usize,
    /// Parsed pairs dropped because they failed validation.
    pub rejected: usize,
}

/// Check a foreign word / translation pair.
///
/// Returns every problem found, not just the first.
pub fn validate_word_input(foreign: &str, translation: &str) -> Result<()> {
    let mut errors = Vec::new();
    let foreign = foreign.trim();
    let translation = translation.trim();

    if foreign.is_empty() {
        errors.push("Foreign word is required".to_string());
    }
    if translation.is_empty() {
        errors.push("Translation is required".to_string());
    }
    if foreign.chars().count() > MAX_FIELD_LEN {
        errors.push(format!(
            "Foreign word is too long (max {MAX_FIELD_LEN} characters)"
        ));
    }
    if translation.chars().count() > MAX_FIELD_LEN {
        errors.push(format!(
            "Translation is too long (max {MAX_FIELD_LEN} characters)"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(VocabError::Validation(errors))
    }
}

/// Words in `words` matching `term` the way [`WordStore::search`] does.
pub fn filter_words<'a>(words: &'a [Word], term: &str) -> Vec<&'a Word> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return words.iter().collect();
    }

    words
        .iter()
        .filter(|w| {
            w.foreign.to_lowercase().contains(&term)
                || w.translation.to_lowercase().contains(&term)
                || w.category.to_lowercase().contains(&term)
        })
        .collect()
}

/// An ordered, persisted collection of words.
pub struct WordStore {
    words: Vec<Word>,
    storage: Arc<dyn Storage>,
}

impl WordStore {
    /// Load the store from `storage`. Missing or unreadable data yields an
    /// empty store.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let words: Vec<Word> = load_json_or_default(storage.as_ref(), WORDS_KEY);
        tracing::debug!("loaded {} word(s)", words.len());
        Self { words, storage }
    }

    /// All words in insertion order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    /// Add a word. All fields are trimmed before storing; a blank category
    /// becomes [`DEFAULT_CATEGORY`].
    pub fn add(&mut self, foreign: &str, translation: &str, category: &str) -> Result<Word> {
        validate_word_input(foreign, translation)?;
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            trimmed => trimmed,
        };

        let word = Word {
            id: Uuid::new_v4().to_string(),
            foreign: foreign.trim().to_string(),
            translation: translation.trim().to_string(),
            category: category.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut words = self.words.clone();
        words.push(word.clone());
        self.commit(words)?;

        tracing::info!("added word {} ({})", word.foreign, word.id);
        Ok(word)
    }

    /// Apply a partial update to the word with `id`.
    ///
    /// Supplied text fields are trimmed and validated together with the
    /// current value of the field left untouched.
    pub fn update(&mut self, id: &str, update: WordUpdate) -> Result<Word> {
        let index = self
            .words
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| VocabError::NotFound(id.to_string()))?;
        let current = &self.words[index];

        let foreign = update
            .foreign
            .as_deref()
            .map(str::trim)
            .unwrap_or(current.foreign.as_str());
        let translation = update
            .translation
            .as_deref()
            .map(str::trim)
            .unwrap_or(current.translation.as_str());
        if update.foreign.is_some() || update.translation.is_some() {
            validate_word_input(foreign, translation)?;
        }

        let updated = Word {
            id: current.id.clone(),
            foreign: foreign.to_string(),
            translation: translation.to_string(),
            category: update
                .category
                .as_deref()
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| current.category.clone()),
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
        };

        let mut words = self.words.clone();
        words[index] = updated.clone();
        self.commit(words)?;

        tracing::info!("updated word {id}");
        Ok(updated)
    }

    /// Remove the word with `id`, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Word> {
        let index = self
            .words
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| VocabError::NotFound(id.to_string()))?;

        let mut words = self.words.clone();
        let removed = words.remove(index);
        self.commit(words)?;

        tracing::info!("deleted word {id}");
        Ok(removed)
    }

    /// Case-insensitive substring search over foreign word, translation, and
    /// category. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Word> {
        filter_words(&self.words, term)
    }

    /// Words whose category is exactly `category`.
    pub fn by_category(&self, category: &str) -> Vec<&Word> {
        self.words.iter().filter(|w| w.category == category).collect()
    }

    /// Distinct non-empty categories, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| !w.category.is_empty())
            .map(|w| w.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Import a word list in the text format, appending in file order.
    ///
    /// Pairs that fail validation are skipped. Finding nothing to import is
    /// not an error.
    pub fn import(&mut self, content: &str) -> Result<ImportSummary> {
        let parsed = codec::parse(content);
        if parsed.is_empty() {
            tracing::warn!("no valid words found in import");
            return Ok(ImportSummary::default());
        }

        let now = Utc::now();
        let mut summary = ImportSummary::default();
        let mut words = self.words.clone();
        for entry in parsed {
            if let Err(e) = validate_word_input(&entry.foreign, &entry.translation) {
                tracing::warn!("skipping import line {}: {e}", entry.line_number);
                summary.rejected += 1;
                continue;
            }
            words.push(Word {
                id: Uuid::new_v4().to_string(),
                foreign: entry.foreign,
                translation: entry.translation,
                category: IMPORTED_CATEGORY.to_string(),
                created_at: now,
                updated_at: None,
            });
            summary.imported += 1;
        }

        if summary.imported > 0 {
            self.commit(words)?;
        }
        tracing::info!(
            "imported {} word(s), rejected {}",
            summary.imported,
            summary.rejected
        );
        Ok(summary)
    }

    /// Export the whole store in the text format.
    pub fn export(&self) -> Result<String> {
        if self.words.is_empty() {
            return Err(VocabError::NothingToExport);
        }
        Ok(codec::serialize(&self.words))
    }

    /// Remove every word.
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())?;
        tracing::info!("cleared all words");
        Ok(())
    }

    /// Fill an empty store with the built-in sample words.
    ///
    /// Returns how many words were added; a non-empty store is left alone.
    pub fn seed_samples(&mut self) -> Result<usize> {
        if !self.words.is_empty() {
            return Ok(0);
        }
        let words = samples::sample_words();
        let count = words.len();
        self.commit(words)?;
        tracing::info!("loaded {count} sample word(s)");
        Ok(count)
    }

    /// Persist `words`, then make them the current collection.
    fn commit(&mut self, words: Vec<Word>) -> Result<()> {
        save_json(self.storage.as_ref(), WORDS_KEY, &words)?;
        self.words = words;
        Ok(())
    }
}
