//! Settings loading: an optional TOML file with `ENCORE__*` environment
//! variables layered over it. Missing keys take the schema defaults.

use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

const APP_DIR: &str = "encore";
const CONFIG_FILE: &str = "config.toml";
const PATH_OVERRIDE_VAR: &str = "ENCORE_CONFIG_PATH";

impl Settings {
    /// Load settings from the resolved config path and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from `path` (if any, and if it exists) plus the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let file = path.map(|p| ::config::File::from(p).required(false));

        ::config::Config::builder()
            .add_source(file.into_iter().collect::<Vec<_>>())
            .add_source(
                ::config::Environment::with_prefix("ENCORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.player.volume) {
            return Err("player.volume must be within [0, 1]".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be within (0, 1]".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must list at least one extension".to_string());
        }
        Ok(())
    }
}

/// `ENCORE_CONFIG_PATH` when set, else [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(PATH_OVERRIDE_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/encore/config.toml`, falling back to `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
