use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `model.onnx` and `config.json`. Relative paths
    /// resolve against the app resource dir.
    pub model_dir: PathBuf,
    /// Where downloaded images go. `None` means the user's pictures dir.
    pub save_dir: Option<PathBuf>,
    pub intra_threads: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            save_dir: None,
            intra_threads: 1,
        }
    }
}

impl AppConfig {
    /// Reads `settings.json` from `config_dir`; a missing file yields defaults.
    pub fn load(config_dir: &Path) -> Result<Self, AppError> {
        let path = config_dir.join(SETTINGS_FILE);
        if !path.exists() {
            log::info!("No {} in {}, using defaults", SETTINGS_FILE, config_dir.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            AppError::io(format!("Failed to read settings {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn resolve_model_dir(&self, resource_dir: &Path) -> PathBuf {
        if self.model_dir.is_absolute() {
            self.model_dir.clone()
        } else {
            resource_dir.join(&self.model_dir)
        }
    }

    pub fn resolve_save_dir(&self, app_data_dir: &Path) -> PathBuf {
        self.save_dir
            .clone()
            .or_else(dirs::picture_dir)
            .unwrap_or_else(|| app_data_dir.join("pictures"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "save_dir": "/tmp/shots" }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.save_dir, Some(PathBuf::from("/tmp/shots")));
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.intra_threads, 1);
    }

    #[test]
    fn test_relative_model_dir_resolves_against_resources() {
        let config = AppConfig::default();
        let resolved = config.resolve_model_dir(Path::new("/opt/app"));
        assert_eq!(resolved, PathBuf::from("/opt/app/models"));
    }

    #[test]
    fn test_broken_settings_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Config);
    }
}
