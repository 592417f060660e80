//! Optional on-disk configuration, mirroring `faxt`'s `Config::load`/
//! `Config::load_from_path` split. mica has exactly one setting worth
//! persisting at this scope: whether to disable ANSI color in log output.
//! Precedence is CLI flag > environment variable > config file > default,
//! enforced by the caller in `main.rs`; this module only knows how to
//! find and parse the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const CONFIG_FILE_NAME: &str = "mica.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub no_color: bool,
}

impl Config {
    /// Looks for `mica.toml` in the current directory, then the user's
    /// config directory; falls back to defaults if neither exists.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("could not read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("could not parse {}: {e}", path.display())))
    }

    fn find_config_file() -> Option<PathBuf> {
        let here = PathBuf::from(CONFIG_FILE_NAME);
        if here.exists() {
            return Some(here);
        }
        dirs::config_dir()
            .map(|dir| dir.join("mica").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}
