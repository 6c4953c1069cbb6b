//! vocab CLI — vocabulary flashcards and quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vocab", version, about = "Vocabulary flashcards and quizzes")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file and VOCAB_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and load the sample words
    Init,

    /// Add a word
    Add {
        /// Word in the language being learned
        foreign: String,

        /// Translation in your language
        translation: String,

        /// Category label
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Edit a word
    Edit {
        /// Word id (see `vocab list`)
        id: String,

        #[arg(long)]
        foreign: Option<String>,

        #[arg(long)]
        translation: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a word
    Delete {
        /// Word id (see `vocab list`)
        id: String,
    },

    /// List words
    List {
        /// Only words whose foreign word, translation, or category contains this
        #[arg(long)]
        search: Option<String>,

        /// Only words in this category
        #[arg(long)]
        category: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List categories in use
    Categories,

    /// Import a `foreign - translation` word list
    Import {
        /// Path to the word list
        file: PathBuf,
    },

    /// Export all words as a `foreign - translation` word list
    Export {
        /// Output path (default: words_export_<date>.txt)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Take a test
    Quiz {
        /// Test mode: multiple-choice, text-input
        #[arg(long)]
        mode: Option<String>,

        /// Number of questions
        #[arg(long)]
        count: Option<usize>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show test statistics and recent results
    Stats {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show or change the theme: light, dark, toggle
    Theme {
        value: Option<String>,
    },

    /// Remove all words, or the test history with --history
    Clear {
        #[arg(long)]
        history: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let data_dir = cli.data_dir;

    let result = match cli.command {
        Commands::Init => commands::init::execute(config, data_dir),
        Commands::Add {
            foreign,
            translation,
            category,
        } => commands::open(config, data_dir)
            .and_then(|ctx| commands::words::add(ctx, &foreign, &translation, &category)),
        Commands::Edit {
            id,
            foreign,
            translation,
            category,
        } => commands::open(config, data_dir)
            .and_then(|ctx| commands::words::edit(ctx, &id, foreign, translation, category)),
        Commands::Delete { id } => {
            commands::open(config, data_dir).and_then(|ctx| commands::words::delete(ctx, &id))
        }
        Commands::List {
            search,
            category,
            format,
        } => commands::open(config, data_dir).and_then(|ctx| {
            commands::words::list(ctx, search.as_deref(), category.as_deref(), &format)
        }),
        Commands::Categories => {
            commands::open(config, data_dir).and_then(commands::words::categories)
        }
        Commands::Import { file } => {
            commands::open(config, data_dir).and_then(|ctx| commands::transfer::import(ctx, &file))
        }
        Commands::Export { output } => {
            commands::open(config, data_dir).and_then(|ctx| commands::transfer::export(ctx, output))
        }
        Commands::Quiz { mode, count, seed } => commands::open(config, data_dir)
            .and_then(|ctx| commands::quiz::execute(ctx, mode.as_deref(), count, seed)),
        Commands::Stats { format } => {
            commands::open(config, data_dir).and_then(|ctx| commands::stats::execute(ctx, &format))
        }
        Commands::Theme { value } => commands::open(config, data_dir)
            .and_then(|ctx| commands::theme::execute(ctx, value.as_deref())),
        Commands::Clear { history } => {
            commands::open(config, data_dir).and_then(|ctx| commands::words::clear(ctx, history))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
