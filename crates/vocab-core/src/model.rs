//! Core data model types for vocab.
//!
//! These are the types shared by the word store, the quiz engine, and the
//! persisted state. Field names serialize in camelCase.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Unique, opaque identifier.
    pub id: String,
    /// The term in the language being learned.
    pub foreign: String,
    /// The term in the learner's language.
    pub translation: String,
    /// Free-form grouping label. May be empty.
    #[serde(default)]
    pub category: String,
    /// When the word was added.
    pub created_at: DateTime<Utc>,
    /// When the word was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A partial edit of a [`Word`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordUpdate {
    pub foreign: Option<String>,
    pub translation: Option<String>,
    pub category: Option<String>,
}

impl WordUpdate {
    pub fn is_empty(&self) -> bool {
        self.foreign.is_none() && self.translation.is_none() && self.category.is_none()
    }
}

/// How a test asks its questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestMode {
    /// Show the foreign word, pick the translation out of four options.
    MultipleChoice,
    /// Show the translation, type the foreign word.
    TextInput,
}

impl TestMode {
    /// Minimum number of words needed to build a test in this mode.
    pub fn min_words(self) -> usize {
        match self {
            TestMode::MultipleChoice => 4,
            TestMode::TextInput => 1,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TestMode::MultipleChoice => "Multiple Choice",
            TestMode::TextInput => "Text Input",
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMode::MultipleChoice => write!(f, "multiple-choice"),
            TestMode::TextInput => write!(f, "text-input"),
        }
    }
}

impl FromStr for TestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple-choice" | "multiple_choice" | "mc" | "choice" => Ok(TestMode::MultipleChoice),
            "text-input" | "text_input" | "text" | "input" => Ok(TestMode::TextInput),
            other => Err(format!("unknown test mode: {other}")),
        }
    }
}

/// One quiz item derived from a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Id of the word this question was built from.
    pub id: String,
    /// What the learner is shown.
    pub prompt: String,
    /// Answer choices, multiple choice only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub kind: TestMode,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }

    /// Check an answer against this question.
    ///
    /// Multiple choice requires the exact option text; text input ignores
    /// surrounding whitespace and case.
    pub fn check(&self, answer: &str) -> bool {
        match self.kind {
            TestMode::MultipleChoice => answer == self.correct_answer,
            TestMode::TextInput => {
                answer.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
            }
        }
    }
}

/// One quiz attempt, in progress or finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub mode: TestMode,
    pub total_questions: usize,
    pub current_index: usize,
    pub questions: Vec<Question>,
    pub correct_count: usize,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

impl TestSession {
    /// A session is complete exactly when it has an end time.
    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Number of questions answered so far.
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }
}

/// Archived summary of a completed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// When the test finished.
    pub date: DateTime<Utc>,
    pub mode: TestMode,
    pub total_questions: usize,
    pub correct_count: usize,
    /// Rounded percentage, 0–100.
    pub score: u32,
    pub duration_seconds: u64,
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_question(answer: &str) -> Question {
        Question {
            id: "w1".into(),
            prompt: "hello".into(),
            options: None,
            correct_answer: answer.into(),
            kind: TestMode::TextInput,
            user_answer: None,
            is_correct: None,
        }
    }

    #[test]
    fn test_mode_display_and_parse() {
        assert_eq!(TestMode::MultipleChoice.to_string(), "multiple-choice");
        assert_eq!(TestMode::TextInput.to_string(), "text-input");
        assert_eq!(
            "multiple-choice".parse::<TestMode>().unwrap(),
            TestMode::MultipleChoice
        );
        assert_eq!("Text".parse::<TestMode>().unwrap(), TestMode::TextInput);
        assert_eq!("mc".parse::<TestMode>().unwrap(), TestMode::MultipleChoice);
        assert!("essay".parse::<TestMode>().is_err());
    }

    #[test]
    fn test_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&TestMode::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
        let mode: TestMode = serde_json::from_str("\"text-input\"").unwrap();
        assert_eq!(mode, TestMode::TextInput);
    }

    #[test]
    fn text_input_check_ignores_case_and_whitespace() {
        let q = text_question("Hola");
        assert!(q.check("  hola "));
        assert!(q.check("HOLA"));
        assert!(!q.check("hol"));
    }

    #[test]
    fn multiple_choice_check_is_exact() {
        let q = Question {
            kind: TestMode::MultipleChoice,
            options: Some(vec!["Hola".into(), "Adiós".into()]),
            ..text_question("Hola")
        };
        assert!(q.check("Hola"));
        assert!(!q.check("hola"));
        assert!(!q.check(" Hola"));
    }

    #[test]
    fn answered_count_tracks_submissions() {
        let mut answered = text_question("hola");
        answered.user_answer = Some("hola".into());
        answered.is_correct = Some(true);
        let session = TestSession {
            mode: TestMode::TextInput,
            total_questions: 3,
            current_index: 1,
            questions: vec![answered, text_question("gato"), text_question("casa")],
            correct_count: 1,
            start_time: chrono::Utc::now(),
            end_time: None,
            duration_seconds: None,
        };
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.current_question().unwrap().correct_answer, "gato");
        assert!(!session.is_complete());
    }

    #[test]
    fn theme_toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("Dark\n".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn word_serde_uses_camel_case() {
        let word = Word {
            id: "abc".into(),
            foreign: "perro".into(),
            translation: "dog".into(),
            category: "animals".into(),
            created_at: "2026-01-20T10:00:00Z".parse().unwrap(),
            updated_at: None,
        };
        let json = serde_json::to_string(&word).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("updatedAt"));
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
    }
}
