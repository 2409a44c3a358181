use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::settings::ConfigFile;
use crate::error::ConfigError;

/// Looked up in the working directory, next to the game.
pub const CONFIG_FILE_NAME: &str = "stshelp_config.json";

fn user_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("spire_coach");
    path.push("config.json");
    Some(path)
}

/// Where a config file is searched for, most specific first. An explicit
/// path replaces the search entirely.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    paths.extend(user_config_path());
    paths
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the first config file that exists. Missing or broken files are
/// not fatal: they are logged and treated as "no file".
pub fn load_config_file(explicit: Option<&Path>) -> Option<ConfigFile> {
    for path in candidate_paths(explicit) {
        if !path.exists() {
            if explicit.is_some() {
                warn!(path = %path.display(), "Config file not found, using defaults");
            } else {
                debug!(path = %path.display(), "No config file");
            }
            continue;
        }

        return match read_config_file(&path) {
            Ok(file) => {
                debug!(path = %path.display(), "Loaded config file");
                Some(file)
            }
            Err(err) => {
                warn!("{}; using defaults", err);
                None
            }
        };
    }

    None
}
