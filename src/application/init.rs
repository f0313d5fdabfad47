//! Initialize config use case

use crate::error::Result;
use crate::infrastructure::{Config, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a default tagstrip.toml at the specified path.
///
/// Returns the path of the written file.
pub fn init(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    Config::default().save_to_dir(path)?;

    Ok(path.join(CONFIG_FILE))
}
