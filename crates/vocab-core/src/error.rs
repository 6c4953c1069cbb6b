//! Error types for the vocab core.
//!
//! Every fallible operation in this crate reports a [`VocabError`]. The
//! user-facing variants (validation, missing words, quiz preconditions) are
//! recoverable and leave state untouched; `Io` and `Json` come from the
//! persistence layer.

use thiserror::Error;

use crate::model::TestMode;

/// Errors that can occur when working with words, quizzes, and storage.
#[derive(Debug, Error)]
pub enum VocabError {
    /// One or more word fields failed validation.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// No word with the given id exists.
    #[error("word not found: {0}")]
    NotFound(String),

    /// Not enough words to start a test in the requested mode.
    #[error("need at least {required} word(s) for a {mode} test, have {available}")]
    InsufficientWords {
        mode: TestMode,
        required: usize,
        available: usize,
    },

    /// There is no test in progress.
    #[error("no active test")]
    NoActiveTest,

    /// The active test has already finished.
    #[error("test is already complete")]
    TestComplete,

    /// The current question already has an answer.
    #[error("question already answered")]
    AlreadyAnswered,

    /// Export was requested from an empty word store.
    #[error("no words to export")]
    NothingToExport,

    /// Reading or writing persisted state failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state could not be encoded or decoded.
    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VocabError {
    /// Returns `true` for errors the user can fix by changing their input.
    ///
    /// Persistence failures are not recoverable this way.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, VocabError::Io(_) | VocabError::Json(_))
    }

    /// The individual validation messages, if this is a validation error.
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            VocabError::Validation(messages) => Some(messages),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, VocabError>;
