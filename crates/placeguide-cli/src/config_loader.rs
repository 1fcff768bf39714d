//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use placeguide_core::config::{CliConfigOverrides, LayeredConfig};
use placeguide_core::models::CategoryTable;
use std::path::{Path, PathBuf};

use crate::errors;

/// Settings file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "placeguide.toml";

/// Load layered settings: defaults, then the settings file, then environment
///
/// An explicit `config_path` must exist; the default file is optional.
pub fn load_config(config_path: Option<&Path>) -> Result<LayeredConfig> {
    let config = match config_path {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_file_if_exists(DEFAULT_CONFIG_FILE)
            .context("Failed to load placeguide.toml")?,
    };

    Ok(config.load_from_env())
}

/// Load layered settings with CLI overrides on top
pub fn load_config_with_overrides(
    config_path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_path)?;
    config.update_from_cli(overrides);
    Ok(config)
}

/// Settings file that [`load_config`] would read, if any
pub fn resolved_config_file(config_path: Option<&Path>) -> Option<PathBuf> {
    match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Load the category table named by the resolved settings
pub fn load_categories(config: &LayeredConfig) -> Result<CategoryTable> {
    let path = &config.categories_path.value;
    if !path.exists() {
        return Err(errors::categories_not_found(path).into());
    }

    let table = CategoryTable::load_from_file(path)?;
    tracing::debug!(path = %path.display(), categories = table.len(), "Loaded category table");
    Ok(table)
}
