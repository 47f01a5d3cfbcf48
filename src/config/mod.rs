mod init;
mod schema;
mod validation;

pub use init::{write_default_config, DEFAULT_CONFIG_TEMPLATE};
pub use schema::{Config, ProfileConfig};
pub use validation::{validate_profile, ClimbProfile};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Get the config directory path (~/.config/mmr-climb/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("mmr-climb"))
}

/// Get the default config file path (~/.config/mmr-climb/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/mmr-climb/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `mmr-climb init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| {
            format!("Failed to parse config: invalid YAML in {}", config_path.display())
        })?;

    debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Load the config file if there is one.
///
/// An explicit `path` must exist. Without one, a missing default config is
/// not an error: the whole profile can come from the command line.
pub fn load_config_or_default(path: Option<PathBuf>) -> Result<Config> {
    if path.is_some() {
        return load_config(path);
    }

    match get_config_path() {
        Ok(default_path) if default_path.exists() => load_config(Some(default_path)),
        _ => {
            debug!("no config file, using command line profile only");
            Ok(Config::default())
        }
    }
}
