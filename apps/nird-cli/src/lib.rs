//! nird-cli
//!
//! Front ends over the retrieval engine: the HTTP service (`server`) and the
//! shared startup helpers used by the `nird` and `nird-server` binaries.

pub mod logging;
pub mod server;

use anyhow::Context;
use std::path::{Path, PathBuf};

use nird_core::config::Config;
use nird_core::Dataset;

/// Load layered configuration from `dir`, or from the working directory.
pub fn load_config(dir: Option<&Path>) -> anyhow::Result<Config> {
    match dir {
        Some(dir) => Config::load_in(dir),
        None => Config::load(),
    }
}

/// Flag value if given, otherwise `data.dataset_path` resolved against the config directory.
pub fn dataset_path(config: &Config, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf).unwrap_or_else(|| config.dataset_path())
}

pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    Dataset::load(path).with_context(|| format!("Failed to load dataset from {}", path.display()))
}
