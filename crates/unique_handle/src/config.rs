//! Settings for the bindings, loadable from TOML or RON

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration file support for any serde type
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log filter level name (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// File binding settings
    pub file: FileSettings,
    /// Display connection settings
    pub display: DisplaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file: FileSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Config for Settings {}

impl Settings {
    /// Parsed log level, falling back to `Info` for unknown names
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// File binding settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Permission bits for newly created files
    pub create_mode: u32,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self { create_mode: 0o644 }
    }
}

impl FileSettings {
    /// Permission bits as a `mode_t`
    pub fn mode(&self) -> libc::mode_t {
        // mode_t is narrower than u32 on some targets; permission bits fit
        #[allow(clippy::cast_possible_truncation, clippy::unnecessary_cast)]
        let mode = (self.create_mode & 0o7777) as libc::mode_t;
        mode
    }
}

/// Display connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Socket name; `None` uses `$WAYLAND_DISPLAY` or the library default
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log_level_filter(), log::LevelFilter::Info);
        assert_eq!(settings.file.mode(), 0o644);
        assert_eq!(settings.display.name, None);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("[display]\nname = \"wayland-1\"\n").unwrap();
        assert_eq!(settings.display.name.as_deref(), Some("wayland-1"));
        assert_eq!(settings.file, FileSettings::default());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_toml_and_ron_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            log_level: "debug".to_string(),
            file: FileSettings { create_mode: 0o600 },
            display: DisplaySettings {
                name: Some("wayland-0".to_string()),
            },
        };

        for name in ["settings.toml", "settings.ron"] {
            let path = dir.path().join(name);
            settings.save_to_file(&path).unwrap();
            assert_eq!(Settings::load_from_file(&path).unwrap(), settings);
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
