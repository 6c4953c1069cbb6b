//! Application state: the single owner of words, the quiz engine, and the
//! theme preference.
//!
//! A presentation layer holds one [`AppState`], calls its narrow mutation
//! API, and re-renders when a subscribed [`StateObserver`] hears about a
//! change. Events are only published after an operation succeeds.

use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;

use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::debounce::Debouncer;
use crate::engine::{AnswerOutcome, TestEngine, TestSummary};
use crate::error::{Result, VocabError};
use crate::history::TestHistory;
use crate::model::{Question, TestMode, TestSession, Theme, Word, WordUpdate};
use crate::store::{filter_words, ImportSummary, WordStore};
use crate::traits::{StateEvent, StateObserver, Storage, THEME_KEY};

/// Handle returned by [`AppState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct AppState {
    storage: Arc<dyn Storage>,
    words: WordStore,
    engine: TestEngine,
    theme: Theme,
    observers: Vec<(SubscriptionId, Arc<dyn StateObserver>)>,
    next_subscription: u64,
    search: Debouncer,
}

impl AppState {
    /// Load words, history, and theme from `storage`.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let words = WordStore::load(storage.clone());
        let engine = TestEngine::new(TestHistory::load(storage.clone()));
        let theme = load_theme(storage.as_ref());

        Self {
            storage,
            words,
            engine,
            theme,
            observers: Vec::new(),
            next_subscription: 0,
            search: Debouncer::new(Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS)),
        }
    }

    pub fn words(&self) -> &WordStore {
        &self.words
    }

    pub fn engine(&self) -> &TestEngine {
        &self.engine
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Use `rng` for future tests.
    pub fn set_rng<R: RngCore + Send + 'static>(&mut self, rng: R) {
        self.engine.set_rng(rng);
    }

    /// Change the quiet period of [`debounced_search`](Self::debounced_search).
    /// Any pending search is dropped.
    pub fn set_search_delay(&mut self, delay: Duration) {
        self.search = Debouncer::new(delay);
    }

    // -- observers ----------------------------------------------------------

    pub fn subscribe(&mut self, observer: Arc<dyn StateObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn publish(&self, event: StateEvent) {
        for (_, observer) in &self.observers {
            observer.on_change(&event);
        }
    }

    // -- words --------------------------------------------------------------

    pub fn add_word(&mut self, foreign: &str, translation: &str, category: &str) -> Result<Word> {
        let word = self.words.add(foreign, translation, category)?;
        self.publish(StateEvent::WordsChanged);
        Ok(word)
    }

    pub fn update_word(&mut self, id: &str, update: WordUpdate) -> Result<Word> {
        let word = self.words.update(id, update)?;
        self.publish(StateEvent::WordsChanged);
        Ok(word)
    }

    pub fn delete_word(&mut self, id: &str) -> Result<Word> {
        let word = self.words.delete(id)?;
        self.publish(StateEvent::WordsChanged);
        Ok(word)
    }

    pub fn import_words(&mut self, content: &str) -> Result<ImportSummary> {
        let summary = self.words.import(content)?;
        if summary.imported > 0 {
            self.publish(StateEvent::WordsChanged);
        }
        Ok(summary)
    }

    pub fn export_words(&self) -> Result<String> {
        self.words.export()
    }

    pub fn clear_words(&mut self) -> Result<()> {
        self.words.clear()?;
        self.publish(StateEvent::WordsChanged);
        Ok(())
    }

    /// Fill an empty store with the sample words.
    pub fn seed_samples(&mut self) -> Result<usize> {
        let added = self.words.seed_samples()?;
        if added > 0 {
            self.publish(StateEvent::WordsChanged);
        }
        Ok(added)
    }

    /// Search after the input has been quiet for the search delay, handing
    /// the matches to `on_results`. A newer call supersedes a pending one.
    ///
    /// Searches the words as they are at call time. Must be called inside a
    /// tokio runtime.
    pub fn debounced_search<F>(&mut self, term: &str, on_results: F)
    where
        F: FnOnce(Vec<Word>) + Send + 'static,
    {
        let snapshot = self.words.words().to_vec();
        let term = term.to_string();
        self.search.call(move || {
            let matches = filter_words(&snapshot, &term).into_iter().cloned().collect();
            on_results(matches);
        });
    }

    pub fn cancel_search(&mut self) {
        self.search.cancel();
    }

    // -- tests --------------------------------------------------------------

    pub fn start_test(&mut self, mode: TestMode, count: usize) -> Result<&TestSession> {
        self.engine.init_test(self.words.words(), mode, count)?;
        self.publish(StateEvent::TestChanged);
        self.engine
            .current_test()
            .ok_or(VocabError::NoActiveTest)
    }

    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome> {
        let outcome = self.engine.submit_answer(answer)?;
        self.publish(StateEvent::TestChanged);
        Ok(outcome)
    }

    /// Advance the active test. `Ok(None)` means it just completed and its
    /// result is in the history.
    pub fn next_question(&mut self) -> Result<Option<&Question>> {
        let completed = self.engine.next_question()?.is_none();
        self.publish(StateEvent::TestChanged);
        if completed {
            self.publish(StateEvent::HistoryChanged);
        }
        Ok(self.engine.current_question())
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.engine.current_question()
    }

    pub fn results(&self) -> Option<TestSummary> {
        self.engine.results()
    }

    pub fn reset_test(&mut self) {
        if self.engine.current_test().is_some() {
            self.engine.reset_test();
            self.publish(StateEvent::TestChanged);
        }
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.engine.clear_history()?;
        self.publish(StateEvent::HistoryChanged);
        Ok(())
    }

    // -- theme --------------------------------------------------------------

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.storage.write(THEME_KEY, &theme.to_string())?;
        self.theme = theme;
        self.publish(StateEvent::ThemeChanged(theme));
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

fn load_theme(storage: &dyn Storage) -> Theme {
    match storage.read(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("ignoring stored theme: {e}");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!("failed to read theme: {e}");
            Theme::default()
        }
    }
}
