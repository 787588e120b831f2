use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::suggest::SuggesterKind;
use crate::visual::{
    VisualOptions, DEFAULT_BRIGHTNESS_THRESHOLD, DEFAULT_FACE_DETECT_WIDTH, DEFAULT_MAX_FACES,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history_capacity: usize,
    pub suggester: SuggesterKind,
    pub brightness_threshold: f64,
    pub max_faces: usize,
    pub face_detect_width: u32,
    pub recursive_default: bool,
    pub include_hidden_default: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            suggester: SuggesterKind::default(),
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            max_faces: DEFAULT_MAX_FACES,
            face_detect_width: DEFAULT_FACE_DETECT_WIDTH,
            recursive_default: false,
            include_hidden_default: false,
        }
    }
}

impl AppConfig {
    pub fn visual_options(&self) -> VisualOptions {
        VisualOptions {
            brightness_threshold: self.brightness_threshold,
            max_faces: self.max_faces,
            face_detect_width: self.face_detect_width,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("org", "imaginex", "imaginex")
        .context("could not resolve the OS configuration directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&app_paths()?.config_path)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("could not parse config file: {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&app_paths()?.config_path, config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create config directory: {}", dir.display()))?;
    }
    let body = toml::to_string_pretty(config).context("could not serialize config")?;
    fs::write(path, body)
        .with_context(|| format!("could not write config file: {}", path.display()))?;
    Ok(())
}
