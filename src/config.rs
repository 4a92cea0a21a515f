//! Persistence of the logo size / position preference.

use crate::ExportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Where the preference lives, relative to the store root
pub const LOGO_CONFIG_PATH: &str = "public/config/logo-settings.json";

/// Size and vertical offset of the brand logo on the label
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoConfig {
    /// Logo size in percent of its natural size
    pub size: f32,
    /// Vertical offset in label pixels
    pub vertical_position: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        LogoConfig {
            size: 100.0,
            vertical_position: 0.0,
        }
    }
}

/// Reads and writes the [LogoConfig] JSON file.
///
/// The file is a flat JSON object. Saving always replaces the whole file; there is no
/// merging with what was stored before and no versioning.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Shown to the user when a save fails. In-memory settings are left as they are.
    pub const SAVE_FAILED_NOTICE: &'static str = "Ошибка сохранения конфигурации";

    /// A store rooted at `root`, using the well-known [LOGO_CONFIG_PATH] below it
    pub fn new<P: AsRef<Path>>(root: P) -> ConfigStore {
        ConfigStore {
            path: root.as_ref().join(LOGO_CONFIG_PATH),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored config. Keys missing from the file take their default values;
    /// a missing or unreadable file yields the defaults.
    pub fn load(&self) -> LogoConfig {
        match self.try_load() {
            Ok(config) => {
                debug!(path = %self.path.display(), ?config, "loaded logo config");
                config
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "using default logo config");
                LogoConfig::default()
            }
        }
    }

    fn try_load(&self) -> Result<LogoConfig, ExportError> {
        let data = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Overwrite the stored config with `config`
    pub fn save(&self, config: &LogoConfig) -> Result<(), ExportError> {
        let result = self.try_save(config);
        if let Err(e) = &result {
            error!(path = %self.path.display(), error = %e, "failed to save logo config");
        }
        result
    }

    fn try_save(&self, config: &LogoConfig) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.load(), LogoConfig::default());
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        let config = LogoConfig {
            size: 80.0,
            vertical_position: -12.5,
        };
        store.save(&config).unwrap();
        assert_eq!(store.load(), config);

        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("\"verticalPosition\": -12.5"));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"size": 120}"#).unwrap();
        assert_eq!(
            store.load(),
            LogoConfig {
                size: 120.0,
                vertical_position: 0.0
            }
        );
    }

    #[test]
    fn fractional_values_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"size": 87.5, "verticalPosition": 3}"#).unwrap();
        assert_eq!(
            store.load(),
            LogoConfig {
                size: 87.5,
                vertical_position: 3.0
            }
        );
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), LogoConfig::default());
    }

    #[test]
    fn saving_overwrites_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"size": 1, "legacy": true}"#).unwrap();
        store.save(&LogoConfig::default()).unwrap();
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(!written.contains("legacy"));
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // a file where the config directory should be
        std::fs::write(dir.path().join("public"), "").unwrap();
        let store = ConfigStore::new(dir.path());
        assert!(matches!(
            store.save(&LogoConfig::default()),
            Err(ExportError::Io(_))
        ));
    }
}
