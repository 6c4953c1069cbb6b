//! The `vocab quiz` command: an interactive test over stdin.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocab_core::engine::TestSummary;
use vocab_core::model::{Question, TestMode};
use vocab_core::state::AppState;
use vocab_core::statistics::{format_duration, score_band, ScoreBand};

use super::Context;

pub fn execute(
    mut ctx: Context,
    mode: Option<&str>,
    count: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let mode = match mode {
        Some(raw) => raw.parse::<TestMode>().map_err(|e| anyhow!(e))?,
        None => ctx.config.default_mode,
    };
    let count = count.unwrap_or(ctx.config.default_question_count);
    if let Some(seed) = seed {
        ctx.state.set_rng(StdRng::seed_from_u64(seed));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut ctx.state, mode, count, &mut stdin.lock(), &mut stdout.lock())
}

/// Drive one test, reading an answer per line from `input`.
///
/// End of input abandons the test without recording it.
pub fn run<R: BufRead, W: Write>(
    state: &mut AppState,
    mode: TestMode,
    count: usize,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let total = state.start_test(mode, count)?.total_questions;
    writeln!(out, "{} test: {total} question(s)", mode.label())?;

    let mut number = 1;
    while let Some(question) = state.current_question().cloned() {
        writeln!(out, "\n[{number}/{total}] {}", question.prompt)?;
        if let Some(options) = &question.options {
            for (i, option) in options.iter().enumerate() {
                writeln!(out, "  {}. {option}", i + 1)?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            let answered = state
                .engine()
                .current_test()
                .map_or(0, |s| s.answered_count());
            state.reset_test();
            writeln!(
                out,
                "\nTest abandoned after {answered} answer(s); nothing recorded."
            )?;
            return Ok(());
        };

        let outcome = state.submit_answer(&resolve_answer(&question, &line))?;
        if outcome.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Wrong. The answer is: {}", outcome.correct_answer)?;
        }

        if state.next_question()?.is_none() {
            break;
        }
        number += 1;
    }

    if let Some(summary) = state.results() {
        print_summary(out, &summary)?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Map what the user typed onto an answer.
///
/// For multiple choice, an option number or the option text (in any case)
/// selects that option. Anything else is passed through as typed.
fn resolve_answer(question: &Question, input: &str) -> String {
    let Some(options) = &question.options else {
        return input.to_string();
    };
    let trimmed = input.trim();

    // Option text wins over position, so "3" picks the option "3".
    if let Some(option) = options.iter().find(|o| o.as_str() == trimmed) {
        return option.clone();
    }
    if let Ok(n) = trimmed.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)) {
            return option.clone();
        }
    }
    options
        .iter()
        .find(|o| o.to_lowercase() == trimmed.to_lowercase())
        .cloned()
        .unwrap_or_else(|| trimmed.to_string())
}

fn print_summary<W: Write>(out: &mut W, summary: &TestSummary) -> Result<()> {
    let verdict = match score_band(summary.score) {
        ScoreBand::Excellent => "Excellent!",
        ScoreBand::Good => "Good job.",
        ScoreBand::Fair => "Not bad, keep practicing.",
        ScoreBand::Poor => "Keep practicing.",
    };

    writeln!(out, "\nScore: {}% ({verdict})", summary.score)?;
    writeln!(
        out,
        "Correct: {}/{}  Incorrect: {}  Time: {}",
        summary.correct_count,
        summary.total_questions,
        summary.incorrect_count,
        format_duration(summary.duration_seconds)
    )?;
    writeln!(out, "{}", if summary.passed { "PASSED" } else { "FAILED" })?;

    let missed: Vec<&Question> = summary
        .questions
        .iter()
        .filter(|q| q.is_correct != Some(true))
        .collect();
    if !missed.is_empty() {
        writeln!(out, "\nReview:")?;
        for q in missed {
            writeln!(
                out,
                "  {} -> {} (you said: {})",
                q.prompt,
                q.correct_answer,
                q.user_answer.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}
