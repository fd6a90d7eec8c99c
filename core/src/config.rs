//! Settings persistence
//!
//! Settings live in a TOML file, either at an explicit path or in the
//! platform config directory managed by `confy`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zonewatch_types::ZoneSettings;

pub const APP_NAME: &str = "zonewatch";
pub const CONFIG_NAME: &str = "settings";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error(transparent)]
    Confy(#[from] confy::ConfyError),
}

/// Load settings from a TOML file
pub fn load_file(path: &Path) -> Result<ZoneSettings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Settings as pretty-printed TOML
pub fn to_toml(settings: &ZoneSettings) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(settings)
}

/// Write settings to a TOML file, replacing it
pub fn save_file(path: &Path, settings: &ZoneSettings) -> Result<(), ConfigError> {
    let contents = to_toml(settings).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load from the platform config directory, creating defaults on first run
pub fn load_default() -> Result<ZoneSettings, ConfigError> {
    Ok(confy::load(APP_NAME, CONFIG_NAME)?)
}

pub fn store_default(settings: &ZoneSettings) -> Result<(), ConfigError> {
    Ok(confy::store(APP_NAME, CONFIG_NAME, settings)?)
}

pub fn default_path() -> Result<PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
}
