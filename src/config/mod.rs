mod cli;
mod file;

pub use cli::{Cli, Command};

use std::path::PathBuf;

use rm_input::{CoordMode, DevicePaths, Model};

const DEFAULT_PEN_DEVICE: &str = "/dev/input/event1";
const DEFAULT_TOUCH_DEVICE: &str = "/dev/input/event2";
const DEFAULT_KEY_DEVICE: &str = "/dev/input/event0";

/// Merged configuration from CLI args and TOML file.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: Model,
    pub pen_device: PathBuf,
    pub touch_device: PathBuf,
    pub key_device: PathBuf,
    pub extra_pen_devices: Vec<PathBuf>,
    pub extra_touch_devices: Vec<PathBuf>,
    pub extra_key_devices: Vec<PathBuf>,
    pub coords: CoordMode,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        Self {
            model: cli.model.or(file_config.model).unwrap_or_default(),
            pen_device: cli
                .pen_device
                .clone()
                .or(file_config.pen_device)
                .unwrap_or_else(|| DEFAULT_PEN_DEVICE.into()),
            touch_device: cli
                .touch_device
                .clone()
                .or(file_config.touch_device)
                .unwrap_or_else(|| DEFAULT_TOUCH_DEVICE.into()),
            key_device: cli
                .key_device
                .clone()
                .or(file_config.key_device)
                .unwrap_or_else(|| DEFAULT_KEY_DEVICE.into()),
            extra_pen_devices: file_config.extra_pen_devices,
            extra_touch_devices: file_config.extra_touch_devices,
            extra_key_devices: file_config.extra_key_devices,
            coords: cli.coords.or(file_config.coords).unwrap_or_default(),
        }
    }

    pub fn paths(&self) -> DevicePaths {
        DevicePaths {
            pen: Some(self.pen_device.clone()),
            touch: Some(self.touch_device.clone()),
            keys: Some(self.key_device.clone()),
            extra_pen: self.extra_pen_devices.clone(),
            extra_touch: self.extra_touch_devices.clone(),
            extra_keys: self.extra_key_devices.clone(),
        }
    }
}
