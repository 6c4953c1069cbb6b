//! The quiz engine.
//!
//! Builds a test from a snapshot of words, records answers for the current
//! question, and archives a [`TestResult`] into the history once the last
//! question is passed. Only one test is active at a time.
//!
//! Session lifecycle: `init_test` starts it at question 0, `next_question`
//! on the last question completes it, `reset_test` discards it from any state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VocabError};
use crate::history::TestHistory;
use crate::model::{Question, TestMode, TestResult, TestSession, Word};
use crate::statistics::{self, percentage, ModeStats, OverallStats, PASS_SCORE};

/// Number of wrong options in a multiple-choice question.
pub const DISTRACTORS: usize = 3;

/// Feedback for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answer: String,
}

/// Results of a completed test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub mode: TestMode,
    pub total_questions: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub score: u32,
    pub duration_seconds: u64,
    pub questions: Vec<Question>,
    pub passed: bool,
}

/// The quiz engine. Owns the active session and the result history.
pub struct TestEngine {
    session: Option<TestSession>,
    history: TestHistory,
    rng: Box<dyn RngCore + Send>,
}

impl TestEngine {
    /// Create an engine drawing randomness from the OS.
    pub fn new(history: TestHistory) -> Self {
        Self::with_rng(history, StdRng::from_entropy())
    }

    /// Create an engine with an explicit random source, e.g. a seeded
    /// `StdRng` for reproducible tests.
    pub fn with_rng<R: RngCore + Send + 'static>(history: TestHistory, rng: R) -> Self {
        Self {
            session: None,
            history,
            rng: Box::new(rng),
        }
    }

    /// Replace the random source used for future tests.
    pub fn set_rng<R: RngCore + Send + 'static>(&mut self, rng: R) {
        self.rng = Box::new(rng);
    }

    /// Start a new test over `words`, replacing any active one.
    ///
    /// Asks `min(requested_count, words.len())` questions about distinct
    /// words in random order.
    pub fn init_test(
        &mut self,
        words: &[Word],
        mode: TestMode,
        requested_count: usize,
    ) -> Result<&TestSession> {
        let required = mode.min_words();
        if words.is_empty() || words.len() < required {
            return Err(VocabError::InsufficientWords {
                mode,
                required,
                available: words.len(),
            });
        }
        if requested_count == 0 {
            return Err(VocabError::Validation(vec![
                "Question count must be at least 1".to_string(),
            ]));
        }

        let count = requested_count.min(words.len());
        let questions = generate_questions(words, mode, count, &mut *self.rng);

        tracing::debug!("starting {mode} test with {count} question(s)");
        let session = self.session.insert(TestSession {
            mode,
            total_questions: count,
            current_index: 0,
            questions,
            correct_count: 0,
            start_time: Utc::now(),
            end_time: None,
            duration_seconds: None,
        });
        Ok(session)
    }

    /// Answer the current question.
    ///
    /// Each question takes one answer; a second submission is rejected with
    /// [`VocabError::AlreadyAnswered`] and changes nothing.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome> {
        let session = self.active_session_mut()?;
        let question = session
            .questions
            .get_mut(session.current_index)
            .ok_or(VocabError::TestComplete)?;
        if question.is_answered() {
            return Err(VocabError::AlreadyAnswered);
        }

        let is_correct = question.check(answer);
        question.user_answer = Some(answer.to_string());
        question.is_correct = Some(is_correct);
        let correct_answer = question.correct_answer.clone();

        if is_correct {
            session.correct_count += 1;
        }
        tracing::debug!(
            "question {} answered, correct: {is_correct}",
            session.current_index + 1
        );

        Ok(AnswerOutcome {
            is_correct,
            correct_answer,
        })
    }

    /// Move to the next question and return it.
    ///
    /// On the last question this completes the test, archives its result,
    /// and returns `Ok(None)`. Unanswered questions count as incorrect.
    pub fn next_question(&mut self) -> Result<Option<&Question>> {
        let finished = {
            let session = self.active_session_mut()?;
            let next = session.current_index + 1;
            if next < session.total_questions {
                session.current_index = next;
                false
            } else {
                true
            }
        };

        if finished {
            self.complete()?;
            return Ok(None);
        }
        Ok(self.current_question())
    }

    /// The active session, complete or not.
    pub fn current_test(&self) -> Option<&TestSession> {
        self.session.as_ref()
    }

    /// The question awaiting an answer, if a test is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        self.session
            .as_ref()
            .filter(|s| !s.is_complete())
            .and_then(|s| s.current_question())
    }

    /// Results of the active session, once it is complete.
    pub fn results(&self) -> Option<TestSummary> {
        let session = self.session.as_ref().filter(|s| s.is_complete())?;
        let score = percentage(session.correct_count, session.total_questions);

        Some(TestSummary {
            mode: session.mode,
            total_questions: session.total_questions,
            correct_count: session.correct_count,
            incorrect_count: session.total_questions - session.correct_count,
            score,
            duration_seconds: session.duration_seconds.unwrap_or(0),
            questions: session.questions.clone(),
            passed: score >= PASS_SCORE,
        })
    }

    /// Discard the active session. The history is not touched.
    pub fn reset_test(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("test discarded");
        }
    }

    pub fn history(&self) -> &TestHistory {
        &self.history
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }

    /// Statistics over the whole history.
    pub fn statistics(&self) -> Option<OverallStats> {
        statistics::aggregate(self.history.entries())
    }

    /// Statistics over the tests taken in `mode`.
    pub fn mode_statistics(&self, mode: TestMode) -> Option<ModeStats> {
        statistics::per_mode(self.history.entries(), mode)
    }

    fn active_session_mut(&mut self) -> Result<&mut TestSession> {
        let session = self.session.as_mut().ok_or(VocabError::NoActiveTest)?;
        if session.is_complete() {
            return Err(VocabError::TestComplete);
        }
        Ok(session)
    }

    /// Finalize the active session and archive its result.
    ///
    /// The result is persisted before the session is marked complete, so a
    /// storage failure leaves the test on its last question.
    fn complete(&mut self) -> Result<()> {
        let session = self.active_session_mut()?;
        let end_time = Utc::now();
        let duration_seconds = elapsed_seconds(session.start_time, end_time);
        let result = TestResult {
            date: end_time,
            mode: session.mode,
            total_questions: session.total_questions,
            correct_count: session.correct_count,
            score: percentage(session.correct_count, session.total_questions),
            duration_seconds,
        };

        self.history.record(result.clone())?;

        let session = self.active_session_mut()?;
        session.end_time = Some(end_time);
        session.duration_seconds = Some(duration_seconds);
        tracing::info!(
            "test complete: {}/{} correct ({}%) in {}s",
            result.correct_count,
            result.total_questions,
            result.score,
            result.duration_seconds
        );
        Ok(())
    }
}

/// Whole seconds between `start` and `end`, rounded; never negative.
fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let millis = (end - start).num_milliseconds().max(0);
    (millis as f64 / 1000.0).round() as u64
}

/// Pick `count` distinct words in random order and build a question for each.
///
/// Selection is a Fisher–Yates shuffle of the whole list truncated to `count`.
pub fn generate_questions<R: Rng + ?Sized>(
    words: &[Word],
    mode: TestMode,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut selected: Vec<&Word> = words.iter().collect();
    selected.shuffle(rng);
    selected.truncate(count);

    selected
        .into_iter()
        .map(|word| match mode {
            TestMode::MultipleChoice => multiple_choice_question(word, words, rng),
            TestMode::TextInput => text_input_question(word),
        })
        .collect()
}

/// Foreign word as the prompt; the translation plus up to three distinct
/// wrong translations from the rest of `pool`, in random order.
pub fn multiple_choice_question<R: Rng + ?Sized>(
    word: &Word,
    pool: &[Word],
    rng: &mut R,
) -> Question {
    let mut seen = HashSet::new();
    seen.insert(word.translation.as_str());
    let candidates: Vec<&str> = pool
        .iter()
        .filter(|w| w.id != word.id)
        .map(|w| w.translation.as_str())
        .filter(|t| seen.insert(*t))
        .collect();

    let mut options: Vec<String> = candidates
        .choose_multiple(rng, DISTRACTORS)
        .map(|t| t.to_string())
        .collect();
    options.push(word.translation.clone());
    options.shuffle(rng);

    Question {
        id: word.id.clone(),
        prompt: word.foreign.clone(),
        options: Some(options),
        correct_answer: word.translation.clone(),
        kind: TestMode::MultipleChoice,
        user_answer: None,
        is_correct: None,
    }
}

/// Translation as the prompt; the foreign word is the expected answer.
pub fn text_input_question(word: &Word) -> Question {
    Question {
        id: word.id.clone(),
        prompt: word.translation.clone(),
        options: None,
        correct_answer: word.foreign.clone(),
        kind: TestMode::TextInput,
        user_answer: None,
        is_correct: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::{FailingStorage, MemoryStorage};

    fn words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| Word {
                id: format!("w{i}"),
                foreign: format!("Foreign{i}"),
                translation: format!("translation {i}"),
                category: String::new(),
                created_at: Utc::now(),
                updated_at: None,
            })
            .collect()
    }

    fn engine(seed: u64) -> TestEngine {
        let history = TestHistory::load(Arc::new(MemoryStorage::new()));
        TestEngine::with_rng(history, StdRng::seed_from_u64(seed))
    }

    fn current_answer(engine: &TestEngine) -> String {
        engine.current_question().unwrap().correct_answer.clone()
    }

    #[test]
    fn insufficient_words() {
        let mut engine = engine(1);
        let err = engine
            .init_test(&words(3), TestMode::MultipleChoice, 10)
            .unwrap_err();
        assert!(matches!(
            err,
            VocabError::InsufficientWords {
                required: 4,
                available: 3,
                ..
            }
        ));
        assert!(engine.init_test(&[], TestMode::TextInput, 10).is_err());
        assert!(engine.init_test(&[], TestMode::MultipleChoice, 10).is_err());
        assert!(engine.current_test().is_none());
    }

    #[test]
    fn zero_questions_rejected() {
        let mut engine = engine(1);
        let err = engine.init_test(&words(5), TestMode::TextInput, 0).unwrap_err();
        assert!(matches!(err, VocabError::Validation(_)));
        assert!(engine.current_test().is_none());
    }

    #[test]
    fn question_count_is_clamped_and_words_are_distinct() {
        let mut engine = engine(2);
        let session = engine.init_test(&words(6), TestMode::TextInput, 10).unwrap();
        assert_eq!(session.total_questions, 6);
        assert_eq!(session.questions.len(), 6);
        assert_eq!(session.current_index, 0);
        assert_eq!(session.correct_count, 0);
        assert!(!session.is_complete());

        let ids: HashSet<&str> = session.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 6);

        let session = engine.init_test(&words(6), TestMode::TextInput, 3).unwrap();
        assert_eq!(session.total_questions, 3);
    }

    #[test]
    fn multiple_choice_with_four_words_has_four_distinct_options() {
        let pool = words(4);
        for seed in 0..20 {
            let mut engine = engine(seed);
            let session = engine.init_test(&pool, TestMode::MultipleChoice, 4).unwrap();
            for q in &session.questions {
                let options = q.options.as_ref().unwrap();
                assert_eq!(options.len(), 4);
                let distinct: HashSet<&String> = options.iter().collect();
                assert_eq!(distinct.len(), 4);
                assert!(options.contains(&q.correct_answer));

                let word = pool.iter().find(|w| w.id == q.id).unwrap();
                assert_eq!(q.prompt, word.foreign);
                assert_eq!(q.correct_answer, word.translation);
                assert_eq!(q.kind, TestMode::MultipleChoice);
            }
        }
    }

    #[test]
    fn correct_option_position_varies() {
        let pool = words(8);
        let positions: HashSet<usize> = (0..30)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let q = multiple_choice_question(&pool[0], &pool, &mut rng);
                q.options
                    .unwrap()
                    .iter()
                    .position(|o| *o == q.correct_answer)
                    .unwrap()
            })
            .collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn duplicate_translations_are_not_offered_twice() {
        let mut pool = words(5);
        pool[1].translation = pool[0].translation.clone();
        pool[2].translation = pool[3].translation.clone();

        let mut rng = StdRng::seed_from_u64(7);
        let q = multiple_choice_question(&pool[0], &pool, &mut rng);
        let options = q.options.unwrap();
        let distinct: HashSet<&String> = options.iter().collect();
        assert_eq!(distinct.len(), options.len());
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn text_input_questions_ask_for_foreign_word() {
        let pool = words(3);
        let mut engine = engine(3);
        let session = engine.init_test(&pool, TestMode::TextInput, 3).unwrap();
        for q in &session.questions {
            let word = pool.iter().find(|w| w.id == q.id).unwrap();
            assert_eq!(q.prompt, word.translation);
            assert_eq!(q.correct_answer, word.foreign);
            assert!(q.options.is_none());
        }
    }

    #[test]
    fn same_seed_same_test() {
        let pool = words(10);
        let mut a = engine(42);
        let mut b = engine(42);
        let qa = a
            .init_test(&pool, TestMode::MultipleChoice, 5)
            .unwrap()
            .questions
            .clone();
        let qb = b
            .init_test(&pool, TestMode::MultipleChoice, 5)
            .unwrap()
            .questions
            .clone();
        assert_eq!(qa, qb);
    }

    #[test]
    fn three_of_five_scores_sixty() {
        let mut engine = engine(4);
        engine.init_test(&words(5), TestMode::TextInput, 5).unwrap();

        for i in 0..5 {
            let answer = if i < 3 {
                format!("  {}  ", current_answer(&engine).to_uppercase())
            } else {
                "wrong".to_string()
            };
            let outcome = engine.submit_answer(&answer).unwrap();
            assert_eq!(outcome.is_correct, i < 3);
            engine.next_question().unwrap();
        }

        let results = engine.results().unwrap();
        assert_eq!(results.score, 60);
        assert_eq!(results.correct_count, 3);
        assert_eq!(results.incorrect_count, 2);
        assert!(!results.passed);
        assert_eq!(results.questions.len(), 5);
    }

    #[test]
    fn multiple_choice_requires_exact_option() {
        let mut engine = engine(5);
        engine.init_test(&words(4), TestMode::MultipleChoice, 1).unwrap();
        let answer = current_answer(&engine);
        let outcome = engine.submit_answer(&answer.to_uppercase()).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_answer, answer);
    }

    #[test]
    fn second_submission_is_rejected() {
        let mut engine = engine(6);
        engine.init_test(&words(3), TestMode::TextInput, 3).unwrap();
        let answer = current_answer(&engine);

        assert!(engine.submit_answer(&answer).unwrap().is_correct);
        let err = engine.submit_answer(&answer).unwrap_err();
        assert!(matches!(err, VocabError::AlreadyAnswered));

        let session = engine.current_test().unwrap();
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.questions[0].user_answer.as_deref(), Some(answer.as_str()));
    }

    #[test]
    fn completion_archives_result() {
        let mut engine = engine(8);
        engine.init_test(&words(2), TestMode::TextInput, 1).unwrap();
        assert!(engine.results().is_none());

        let answer = current_answer(&engine);
        engine.submit_answer(&answer).unwrap();
        assert!(engine.next_question().unwrap().is_none());

        let session = engine.current_test().unwrap();
        assert!(session.is_complete());
        assert!(session.end_time.is_some());
        assert!(session.duration_seconds.is_some());
        assert!(engine.current_question().is_none());

        assert_eq!(engine.history().len(), 1);
        let archived = engine.history().latest().unwrap();
        assert_eq!(archived.score, 100);
        assert_eq!(archived.total_questions, 1);
        assert_eq!(archived.mode, TestMode::TextInput);
        assert_eq!(Some(archived.date), session.end_time);

        let results = engine.results().unwrap();
        assert!(results.passed);
    }

    #[test]
    fn completed_test_accepts_nothing() {
        let mut engine = engine(9);
        engine.init_test(&words(1), TestMode::TextInput, 1).unwrap();
        engine.next_question().unwrap();

        assert!(matches!(
            engine.submit_answer("x"),
            Err(VocabError::TestComplete)
        ));
        assert!(matches!(engine.next_question(), Err(VocabError::TestComplete)));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn no_active_test() {
        let mut engine = engine(10);
        assert!(matches!(
            engine.submit_answer("x"),
            Err(VocabError::NoActiveTest)
        ));
        assert!(matches!(engine.next_question(), Err(VocabError::NoActiveTest)));
        assert!(engine.current_question().is_none());
        assert!(engine.results().is_none());
    }

    #[test]
    fn next_question_advances_in_order() {
        let mut engine = engine(11);
        let order: Vec<String> = engine
            .init_test(&words(3), TestMode::TextInput, 3)
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect();

        assert_eq!(engine.current_question().unwrap().id, order[0]);
        assert_eq!(engine.next_question().unwrap().unwrap().id, order[1]);
        assert_eq!(engine.next_question().unwrap().unwrap().id, order[2]);
        assert_eq!(engine.current_test().unwrap().current_index, 2);
        assert!(engine.next_question().unwrap().is_none());
    }

    #[test]
    fn reset_discards_without_archiving() {
        let mut engine = engine(12);
        engine.init_test(&words(3), TestMode::TextInput, 3).unwrap();
        let answer = current_answer(&engine);
        engine.submit_answer(&answer).unwrap();

        engine.reset_test();
        assert!(engine.current_test().is_none());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn init_replaces_active_session() {
        let mut engine = engine(13);
        engine.init_test(&words(5), TestMode::TextInput, 5).unwrap();
        engine.next_question().unwrap();

        let session = engine.init_test(&words(5), TestMode::TextInput, 2).unwrap();
        assert_eq!(session.current_index, 0);
        assert_eq!(session.total_questions, 2);
    }

    #[test]
    fn statistics_follow_history() {
        let mut engine = engine(14);
        assert!(engine.statistics().is_none());

        for correct in [true, false] {
            engine.init_test(&words(4), TestMode::MultipleChoice, 1).unwrap();
            let answer = if correct {
                current_answer(&engine)
            } else {
                "nope".to_string()
            };
            engine.submit_answer(&answer).unwrap();
            engine.next_question().unwrap();
        }

        let stats = engine.statistics().unwrap();
        assert_eq!(stats.total_tests, 2);
        assert_eq!(stats.average_score, 50);
        assert_eq!(stats.best_score, 100);
        assert!(engine.mode_statistics(TestMode::TextInput).is_none());
        assert_eq!(
            engine
                .mode_statistics(TestMode::MultipleChoice)
                .unwrap()
                .total_tests,
            2
        );

        engine.clear_history().unwrap();
        assert!(engine.statistics().is_none());
    }

    #[test]
    fn elapsed_seconds_rounds() {
        let start = Utc::now();
        assert_eq!(elapsed_seconds(start, start), 0);
        assert_eq!(
            elapsed_seconds(start, start + chrono::Duration::milliseconds(1499)),
            1
        );
        assert_eq!(
            elapsed_seconds(start, start + chrono::Duration::milliseconds(1500)),
            2
        );
        assert_eq!(
            elapsed_seconds(start, start - chrono::Duration::seconds(5)),
            0
        );
    }

    #[test]
    fn failed_history_write_keeps_last_question() {
        let storage = Arc::new(FailingStorage::default());
        let history = TestHistory::load(storage.clone());
        let mut engine = TestEngine::with_rng(history, StdRng::seed_from_u64(15));
        engine.init_test(&words(2), TestMode::TextInput, 1).unwrap();
        let answer = current_answer(&engine);
        engine.submit_answer(&answer).unwrap();

        storage.set_failing(true);
        assert!(matches!(engine.next_question(), Err(VocabError::Io(_))));
        assert!(engine.results().is_none());
        assert!(engine.current_question().is_some());
        assert!(!engine.current_test().unwrap().is_complete());
        assert!(engine.history().is_empty());

        storage.set_failing(false);
        assert!(engine.next_question().unwrap().is_none());
        assert_eq!(engine.results().unwrap().score, 100);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(TestHistory::load(storage).len(), 1);
    }
}
