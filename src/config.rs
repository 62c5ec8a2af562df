//! User configuration
//!
//! The config lives in `<user config dir>/pipupdater/config.toml` unless a
//! path is given explicitly. A missing file is created from the defaults.

use crate::error::ConfigError;
use crate::filter::PrefixSet;
use crate::logger::{Level, Logger};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config and data directories
pub const APP_NAME: &str = "pipupdater";

/// Config file name inside the config directory
pub const CONFIG_FILENAME: &str = "config.toml";

/// Content written to a freshly created config file
pub const DEFAULT_CONFIG: &str = r#"# pipupdater configuration

# Lines of `pip list --outdated` output starting with any of these prefixes
# are skipped instead of being treated as package names.
prefixes = [
    "DEPRECATION: ",
    "ERROR: ",
    "WARNING: ",
    "[notice] ",
    "Package ",
    "-------",
]

# Command used to run pip, e.g. ["python3", "-m", "pip"]
pip = ["pip"]
"#;

fn default_prefixes() -> Vec<String> {
    [
        "DEPRECATION: ",
        "ERROR: ",
        "WARNING: ",
        "[notice] ",
        "Package ",
        "-------",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_pip() -> Vec<String> {
    vec!["pip".to_string()]
}

/// Settings read from the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prefixes of lines to skip
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Base command used to run pip
    #[serde(default = "default_pip")]
    pub pip: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            pip: default_pip(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::parse(path, e.to_string()))
    }

    /// Returns the prefixes as a filter
    pub fn prefix_set(&self) -> PrefixSet {
        PrefixSet::new(self.prefixes.iter().cloned())
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Read the config at `path`, creating it from the defaults if missing
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            return Self::from_toml(&content, path);
        }

        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(write_error)?;

        Self::from_toml(DEFAULT_CONFIG, path)
    }

    /// Load the config, falling back to defaults with a warning on any error
    pub fn load(path: Option<&Path>, logger: &mut dyn Logger) -> Self {
        let result = match path {
            Some(path) => Self::load_or_create(path),
            None => Self::default_path().and_then(|path| Self::load_or_create(&path)),
        };

        match result {
            Ok(config) => config,
            Err(e) => {
                logger.log(
                    Level::Warning,
                    &format!(
                        "Could not find existing config file or make a new one. Using default settings. ({})",
                        e
                    ),
                );
                Self::default()
            }
        }
    }
}

/// Default location of the log file used by `--save-pip`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_NAME).join("pipupdater.log"))
}
