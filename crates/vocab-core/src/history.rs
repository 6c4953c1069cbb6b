//! Bounded, persisted log of completed test results.

use std::sync::Arc;

use crate::error::Result;
use crate::model::TestResult;
use crate::storage::{load_json_or_default, save_json};
use crate::traits::{Storage, HISTORY_KEY};

/// Maximum number of results kept; older ones are dropped.
pub const HISTORY_LIMIT: usize = 50;

/// Test results, most recent first.
pub struct TestHistory {
    entries: Vec<TestResult>,
    storage: Arc<dyn Storage>,
}

impl TestHistory {
    /// Load the history from `storage`, trimming it to [`HISTORY_LIMIT`].
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut entries: Vec<TestResult> = load_json_or_default(storage.as_ref(), HISTORY_KEY);
        entries.truncate(HISTORY_LIMIT);
        Self { entries, storage }
    }

    pub fn entries(&self) -> &[TestResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent result.
    pub fn latest(&self) -> Option<&TestResult> {
        self.entries.first()
    }

    /// Prepend `result`, evicting the oldest entry when full, and persist.
    pub fn record(&mut self, result: TestResult) -> Result<()> {
        let mut entries = Vec::with_capacity(HISTORY_LIMIT);
        entries.push(result);
        entries.extend(self.entries.iter().take(HISTORY_LIMIT - 1).cloned());

        save_json(self.storage.as_ref(), HISTORY_KEY, &entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Drop every result.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(HISTORY_KEY)?;
        self.entries.clear();
        Ok(())
    }
}
