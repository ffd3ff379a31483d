//! Command implementations.

mod invoke;
mod list;
mod validate;

pub use invoke::run_invoke;
pub use list::run_list;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, SandboxConfig};

use crate::error::CliError;

/// Load `path` if given, otherwise the built-in catalog
pub(crate) fn load_config(path: Option<&Path>) -> Result<SandboxConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => ConfigLoader::builtin().context("Failed to load built-in catalog"),
    }
}
