//! Summary statistics over the test history.

use serde::{Deserialize, Serialize};

use crate::model::{TestMode, TestResult};

/// Score at or above which a test counts as passed.
pub const PASS_SCORE: u32 = 70;

/// Rounded percentage of `value` out of `total`. Zero when `total` is zero.
pub fn percentage(value: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u32
}

/// Statistics across the whole history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_tests: usize,
    /// Rounded mean of the per-test scores.
    pub average_score: u32,
    pub best_score: u32,
    pub total_questions: usize,
    pub total_correct: usize,
    /// Correct answers as a percentage of all questions asked.
    pub overall_accuracy: u32,
}

/// Statistics for the tests taken in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeStats {
    pub mode: TestMode,
    pub total_tests: usize,
    pub average_score: u32,
    pub accuracy: u32,
}

fn average_score<'a>(results: impl Iterator<Item = &'a TestResult>) -> (usize, u32) {
    let (count, sum) = results.fold((0usize, 0u64), |(count, sum), r| {
        (count + 1, sum + u64::from(r.score))
    });
    if count == 0 {
        return (0, 0);
    }
    (count, (sum as f64 / count as f64).round() as u32)
}

/// Summarize the whole history. `None` when there is no history yet.
pub fn aggregate(history: &[TestResult]) -> Option<OverallStats> {
    if history.is_empty() {
        return None;
    }

    let (total_tests, average_score) = average_score(history.iter());
    let best_score = history.iter().map(|r| r.score).max().unwrap_or(0);
    let total_questions: usize = history.iter().map(|r| r.total_questions).sum();
    let total_correct: usize = history.iter().map(|r| r.correct_count).sum();

    Some(OverallStats {
        total_tests,
        average_score,
        best_score,
        total_questions,
        total_correct,
        overall_accuracy: percentage(total_correct, total_questions),
    })
}

/// Summarize the tests taken in `mode`. `None` when there are none.
pub fn per_mode(history: &[TestResult], mode: TestMode) -> Option<ModeStats> {
    let matching = || history.iter().filter(move |r| r.mode == mode);

    let (total_tests, average_score) = average_score(matching());
    if total_tests == 0 {
        return None;
    }
    let total_questions: usize = matching().map(|r| r.total_questions).sum();
    let total_correct: usize = matching().map(|r| r.correct_count).sum();

    Some(ModeStats {
        mode,
        total_tests,
        average_score,
        accuracy: percentage(total_correct, total_questions),
    })
}

/// Coarse grade for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Grade a score: 90+ excellent, 70+ good, 50+ fair, otherwise poor.
pub fn score_band(score: u32) -> ScoreBand {
    if score >= 90 {
        ScoreBand::Excellent
    } else if score >= PASS_SCORE {
        ScoreBand::Good
    } else if score >= 50 {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}

/// Format a duration as `"1m 5s"`, or `"42s"` under a minute.
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
