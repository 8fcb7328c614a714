//! Configuration loading and discovery for `teamcard.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TeamcardConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "teamcard.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse teamcard.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the asset directory
    pub assets_dir: Option<PathBuf>,
    /// Override the portrait directory
    pub portrait_dir: Option<PathBuf>,
    /// Override the output directory
    pub output_dir: Option<PathBuf>,
    /// Override the catalog file
    pub catalog: Option<PathBuf>,
}

/// Find teamcard.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for teamcard.toml
/// 2. Check XDG_CONFIG_HOME/teamcard/teamcard.toml (or ~/.config/teamcard/teamcard.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find teamcard.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            env::var("HOME").map(|h| PathBuf::from(h).join(".config"))
        })
        .ok()?;

    let config_path = xdg_config.join("teamcard").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find teamcard.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a teamcard.toml file.
///
/// An explicit path wins; otherwise the discovered file is used, and the
/// defaults apply when there is none. Relative paths inside the file are
/// resolved against the file's directory.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("bot/teamcard.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<TeamcardConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(TeamcardConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<TeamcardConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let mut config: TeamcardConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(
            errors.into_iter().map(|e| e.to_string()).collect(),
        ));
    }

    if let Some(root) = config_root(path) {
        let assets = &mut config.assets;
        assets.assets_dir = resolve_path(root, &assets.assets_dir);
        assets.portrait_dir = resolve_path(root, &assets.portrait_dir);
        assets.output_dir = resolve_path(root, &assets.output_dir);
        config.catalog.path = resolve_path(root, &config.catalog.path);
        if let Some(font) = config.text.font.take() {
            config.text.font = Some(resolve_path(root, &font));
        }
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut TeamcardConfig, overrides: &CliOverrides) {
    if let Some(ref dir) = overrides.assets_dir {
        config.assets.assets_dir = dir.clone();
    }
    if let Some(ref dir) = overrides.portrait_dir {
        config.assets.portrait_dir = dir.clone();
    }
    if let Some(ref dir) = overrides.output_dir {
        config.assets.output_dir = dir.clone();
    }
    if let Some(ref path) = overrides.catalog {
        config.catalog.path = path.clone();
    }
}

/// Directory containing a config file; `None` for a bare file name.
pub fn config_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Resolve a path relative to the config directory.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the config directory.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
