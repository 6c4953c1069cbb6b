//! The `vocab stats` command.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};
use serde_json::json;
use vocab_core::model::TestMode;
use vocab_core::statistics::format_duration;

use super::Context;

/// Number of recent results shown in text output.
const RECENT: usize = 10;

pub fn execute(ctx: Context, format: &str) -> Result<()> {
    let engine = ctx.state.engine();
    let history = engine.history().entries();
    let modes = [TestMode::MultipleChoice, TestMode::TextInput];

    match format {
        "json" => {
            let per_mode: Vec<_> = modes
                .iter()
                .filter_map(|&m| engine.mode_statistics(m))
                .collect();
            let doc = json!({
                "overall": engine.statistics(),
                "perMode": per_mode,
                "history": history,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        "text" => {
            let Some(overall) = engine.statistics() else {
                println!("No tests taken yet. Run `vocab quiz` to start one.");
                return Ok(());
            };

            let mut table = Table::new();
            table.set_header(vec!["Tests", "Average", "Best", "Questions", "Accuracy"]);
            table.add_row(vec![
                Cell::new(overall.total_tests),
                Cell::new(format!("{}%", overall.average_score)),
                Cell::new(format!("{}%", overall.best_score)),
                Cell::new(format!("{}/{}", overall.total_correct, overall.total_questions)),
                Cell::new(format!("{}%", overall.overall_accuracy)),
            ]);
            println!("{table}");

            let mut table = Table::new();
            table.set_header(vec!["Mode", "Tests", "Average", "Accuracy"]);
            for mode in modes {
                match engine.mode_statistics(mode) {
                    Some(stats) => table.add_row(vec![
                        Cell::new(mode.label()),
                        Cell::new(stats.total_tests),
                        Cell::new(format!("{}%", stats.average_score)),
                        Cell::new(format!("{}%", stats.accuracy)),
                    ]),
                    None => table.add_row(vec![
                        Cell::new(mode.label()),
                        Cell::new(0),
                        Cell::new("-"),
                        Cell::new("-"),
                    ]),
                };
            }
            println!("\n{table}");

            let mut table = Table::new();
            table.set_header(vec!["Date", "Mode", "Score", "Correct", "Time"]);
            for result in history.iter().take(RECENT) {
                table.add_row(vec![
                    Cell::new(result.date.format("%Y-%m-%d %H:%M")),
                    Cell::new(result.mode.label()),
                    Cell::new(format!("{}%", result.score)),
                    Cell::new(format!("{}/{}", result.correct_count, result.total_questions)),
                    Cell::new(format_duration(result.duration_seconds)),
                ]);
            }
            println!("\nRecent tests:\n{table}");
        }
        other => bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}
