//! Configuration loading and management

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Example printed when the configuration file is missing
pub const EXAMPLE: &str = r#"[[bindings]]
app = "Cursor"
key = "1"
modifiers = ["cmd"]"#;

/// User configuration read from `~/.config/focus/config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Hotkey bindings in declaration order
    #[serde(default)]
    pub bindings: Vec<KeyBinding>,
}

/// A single user-declared binding, before name resolution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyBinding {
    /// Key name, e.g. "1", "f5" or "space"
    pub key: String,

    /// Display name of the application to bring forward
    pub app: String,

    /// Modifier names in declaration order
    #[serde(default)]
    pub modifiers: Vec<String>,
}

/// Errors that can occur while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("config file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Well-known location of the configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".config").join("focus").join("config.toml"))
    }

    /// Load configuration from the well-known location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.to_owned(),
                });
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}
