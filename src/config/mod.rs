mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::schedule::validate_date_format;
use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/podium/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("podium")
}

/// Get the default config file path (~/.config/podium/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// An explicit `path` must exist. When no path is given and the default file
/// is absent, defaults are used.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "Loaded config");
    Ok(config)
}

/// Validate the whole configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(offset) = &config.utc_offset {
        if let Err(e) = crate::schedule::parse_utc_offset(offset) {
            errors.push(format!("utc_offset: {}", e));
        }
    }

    if let Some(format) = &config.date_format {
        if let Err(e) = validate_date_format(format) {
            errors.push(format!("date_format: {}", e));
        }
    }

    if let Some(special) = &config.special_driver {
        if special.trim().is_empty() {
            errors.push("special_driver: cannot be blank".to_string());
        }
    }

    if let Some(path) = &config.season_file {
        if path.as_os_str().is_empty() {
            errors.push("season_file: cannot be empty".to_string());
        }
    }

    if let Err(scoring_errors) = validate_scoring(&config.scoring()) {
        errors.extend(scoring_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
