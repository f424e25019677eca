use crate::state::{
    DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MASK_MARKER, DEFAULT_SIDECAR_FILE_NAME, SessionOptions,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_RECENT_FOLDERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Start folder of the open dialog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_directory: Option<String>,
    #[serde(default)]
    pub recent_folders: Vec<String>,
    #[serde(default = "default_sidecar_file_name")]
    pub sidecar_file_name: String,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    #[serde(default = "default_mask_marker")]
    pub mask_marker: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    #[serde(default = "default_posterior_color")]
    pub posterior_color: String,
    #[serde(default = "default_anterior_color")]
    pub anterior_color: String,
    #[serde(default = "default_marker_size")]
    pub marker_size: f32,
}

// Default value functions
fn default_sidecar_file_name() -> String {
    DEFAULT_SIDECAR_FILE_NAME.to_string()
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_mask_marker() -> String {
    DEFAULT_MASK_MARKER.to_string()
}

fn default_posterior_color() -> String {
    "#1a87f4".to_string()
}

fn default_anterior_color() -> String {
    "#ebf441".to_string()
}

fn default_marker_size() -> f32 {
    16.0
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            default_directory: None,
            recent_folders: Vec::new(),
            sidecar_file_name: default_sidecar_file_name(),
            image_extensions: default_image_extensions(),
            mask_marker: default_mask_marker(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            posterior_color: default_posterior_color(),
            anterior_color: default_anterior_color(),
            marker_size: default_marker_size(),
        }
    }
}

impl DatasetConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            sidecar_file_name: self.sidecar_file_name.clone(),
            image_extensions: self.image_extensions.clone(),
            mask_marker: self.mask_marker.clone(),
        }
    }

    /// Folder the open dialog should start in: the last opened one, else the
    /// configured default.
    pub fn dialog_start_directory(&self) -> Option<PathBuf> {
        self.recent_folders
            .first()
            .or(self.default_directory.as_ref())
            .map(PathBuf::from)
            .filter(|p| p.is_dir())
    }
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "ap-annotator")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from file, or return default if file doesn't exist
pub fn load_config(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config file {}: {e}. Using defaults.", path.display());
                AppConfig::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read config file {}: {e}. Using defaults.", path.display());
            AppConfig::default()
        }
    }
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path, toml)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    Ok(())
}

/// Add a folder to the front of the recent folders list
pub fn add_recent_folder(config: &mut AppConfig, path: String) {
    config.dataset.recent_folders.retain(|p| p != &path);
    config.dataset.recent_folders.insert(0, path);
    config.dataset.recent_folders.truncate(MAX_RECENT_FOLDERS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dataset.session_options(), SessionOptions::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[dataset]
default_directory = "/data/BAGLS/training"
image_extensions = ["png", "jpg"]
"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(
            config.dataset.default_directory.as_deref(),
            Some("/data/BAGLS/training")
        );
        assert_eq!(config.dataset.image_extensions, ["png", "jpg"]);
        assert_eq!(config.dataset.sidecar_file_name, "ap.points");
        assert_eq!(config.appearance, AppearanceConfig::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dataset\nnot toml").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        add_recent_folder(&mut config, "/data/a".into());
        config.appearance.marker_size = 24.0;

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path), config);
    }

    #[test]
    fn recent_folders_are_unique_and_bounded() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            add_recent_folder(&mut config, format!("/data/{i}"));
        }
        add_recent_folder(&mut config, "/data/5".into());

        let recent = &config.dataset.recent_folders;
        assert_eq!(recent.len(), MAX_RECENT_FOLDERS);
        assert_eq!(recent[0], "/data/5");
        assert_eq!(recent.iter().filter(|p| *p == "/data/5").count(), 1);
    }
}
