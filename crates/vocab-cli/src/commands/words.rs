//! Word management commands: add, edit, delete, list, categories, clear.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};
use vocab_core::model::{Word, WordUpdate};

use super::Context;

pub fn add(mut ctx: Context, foreign: &str, translation: &str, category: &str) -> Result<()> {
    let word = ctx.state.add_word(foreign, translation, category)?;
    println!(
        "Added \"{} - {}\" [{}] ({})",
        word.foreign, word.translation, word.category, word.id
    );
    Ok(())
}

pub fn edit(
    mut ctx: Context,
    id: &str,
    foreign: Option<String>,
    translation: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let update = WordUpdate {
        foreign,
        translation,
        category,
    };
    if update.is_empty() {
        bail!("nothing to change: pass --foreign, --translation, or --category");
    }

    let word = ctx.state.update_word(id, update)?;
    println!(
        "Updated \"{} - {}\" [{}]",
        word.foreign, word.translation, word.category
    );
    Ok(())
}

pub fn delete(mut ctx: Context, id: &str) -> Result<()> {
    let word = ctx.state.delete_word(id)?;
    println!("Deleted \"{} - {}\"", word.foreign, word.translation);
    Ok(())
}

pub fn list(ctx: Context, search: Option<&str>, category: Option<&str>, format: &str) -> Result<()> {
    let store = ctx.state.words();
    let words: Vec<&Word> = store
        .search(search.unwrap_or(""))
        .into_iter()
        .filter(|w| category.map_or(true, |c| w.category == c))
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&words)?),
        "table" => {
            if words.is_empty() {
                println!("No words found.");
                return Ok(());
            }
            println!("{}", words_table(&words));
            println!("{} of {} word(s)", words.len(), store.len());
        }
        other => bail!("unknown format: {other} (expected table or json)"),
    }
    Ok(())
}

pub fn categories(ctx: Context) -> Result<()> {
    let store = ctx.state.words();
    let categories = store.all_categories();
    if categories.is_empty() {
        println!("No categories yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Words"]);
    for category in &categories {
        table.add_row(vec![
            Cell::new(category),
            Cell::new(store.by_category(category).len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn clear(mut ctx: Context, history: bool) -> Result<()> {
    if history {
        let count = ctx.state.engine().history().len();
        ctx.state.clear_history()?;
        println!("Cleared {count} test result(s).");
    } else {
        let count = ctx.state.words().len();
        ctx.state.clear_words()?;
        println!("Removed {count} word(s).");
    }
    Ok(())
}

fn words_table(words: &[&Word]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Foreign", "Translation", "Category", "Added"]);
    for word in words {
        table.add_row(vec![
            Cell::new(&word.id),
            Cell::new(&word.foreign),
            Cell::new(&word.translation),
            Cell::new(&word.category),
            Cell::new(word.created_at.format("%Y-%m-%d")),
        ]);
    }
    table
}
