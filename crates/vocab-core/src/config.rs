//! User configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::TestMode;

/// Config file name looked up in the current directory.
pub const CONFIG_FILE: &str = "vocab.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "VOCAB_DATA_DIR";

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Starter config written by `vocab init`.
pub const SAMPLE_CONFIG: &str = r#"# vocab configuration

# Where words, history, and preferences are stored.
# ${VAR} references are expanded; VOCAB_DATA_DIR overrides this value.
# data_dir = "${HOME}/.local/share/vocab"

# Test mode used when `vocab quiz` is run without --mode.
default_mode = "multiple-choice"

# Questions per test when --count is not given.
default_question_count = 10

# Quiet period before a search is run, in milliseconds.
search_debounce_ms = 300
"#;

/// Top-level vocab configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabConfig {
    /// Directory holding the persisted state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_mode")]
    pub default_mode: TestMode,
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("vocab"),
        Err(_) => PathBuf::from("./vocab-data"),
    }
}
fn default_mode() -> TestMode {
    TestMode::MultipleChoice
}
fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}
fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_mode: default_mode(),
            default_question_count: default_question_count(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl VocabConfig {
    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}

/// Expand `${VAR}` references. Unset variables expand to nothing.
///
/// Expanded values are inserted verbatim, never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, which must exist when given
/// 2. `vocab.toml` in the current directory
/// 3. `~/.config/vocab/config.toml`
///
/// Falls back to defaults when nothing is found. `VOCAB_DATA_DIR` overrides
/// `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<VocabConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                config_home()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("using config {}", path.display());
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VocabConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    Ok(config)
}

/// Parse and check a config document.
pub fn parse_config(content: &str) -> Result<VocabConfig> {
    let config: VocabConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.default_question_count > 0,
        "default_question_count must be at least 1"
    );
    Ok(config)
}

fn config_home() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocab"))
}
