use serde::Deserialize;
use std::path::{Path, PathBuf};

use rm_input::{CoordMode, Model};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<Model>,
    pub pen_device: Option<PathBuf>,
    pub touch_device: Option<PathBuf>,
    pub key_device: Option<PathBuf>,
    #[serde(default)]
    pub extra_pen_devices: Vec<PathBuf>,
    #[serde(default)]
    pub extra_touch_devices: Vec<PathBuf>,
    #[serde(default)]
    pub extra_key_devices: Vec<PathBuf>,
    pub coords: Option<CoordMode>,
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    default_config_paths()
        .into_iter()
        .filter(|path| path.exists())
        .find_map(|path| load_from_path(&path))
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("rm-input.toml")];

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join("rm-input.toml"));
    }

    paths
}
