//! Trait definitions for the seams between the core and its surroundings.
//!
//! [`Storage`] is where persisted state lives; [`StateObserver`] is how a
//! presentation layer learns that it should re-render.

use std::io;

use crate::model::Theme;

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// Storage key for the word collection (JSON array of words).
pub const WORDS_KEY: &str = "words.json";
/// Storage key for the test history (JSON array, most recent first).
pub const HISTORY_KEY: &str = "history.json";
/// Storage key for the theme preference (plain `light` / `dark`).
pub const THEME_KEY: &str = "theme";

/// A durable string key-value store.
///
/// Values are always written wholesale; there is no partial update.
pub trait Storage: Send + Sync {
    /// Read the value under `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// Observer trait
// ---------------------------------------------------------------------------

/// A change published by the application state after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// The word collection changed.
    WordsChanged,
    /// The active test was created, advanced, answered, or discarded.
    TestChanged,
    /// A result was archived or the history was cleared.
    HistoryChanged,
    /// The theme preference changed.
    ThemeChanged(Theme),
}

/// Receives state-change notifications.
pub trait StateObserver: Send + Sync {
    fn on_change(&self, event: &StateEvent);
}
