//! CLI subcommands.

pub mod init;
pub mod quiz;
pub mod stats;
pub mod theme;
pub mod transfer;
pub mod words;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use vocab_core::config::{load_config_from, VocabConfig};
use vocab_core::state::AppState;
use vocab_core::storage::FileStorage;

/// Everything a command needs: the resolved config and the loaded state.
pub struct Context {
    pub config: VocabConfig,
    pub state: AppState,
}

/// Load the config and open the state in its data directory.
///
/// `data_dir` takes precedence over the config file and `VOCAB_DATA_DIR`.
pub fn open(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Context> {
    let mut config = load_config_from(config_path)?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    tracing::debug!("data directory: {}", config.data_dir.display());

    let storage = Arc::new(FileStorage::new(&config.data_dir));
    let mut state = AppState::open(storage);
    state.set_search_delay(config.search_debounce());

    Ok(Context { config, state })
}
