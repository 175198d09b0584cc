use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rm_input::{CoordMode, Model};

#[derive(Parser)]
#[command(name = "rm-input")]
#[command(about = "Listen to and inject reMarkable pen, touch and key input")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Tablet model (rm1, rm2)
    #[arg(long, value_parser = clap::value_parser!(Model))]
    pub model: Option<Model>,

    /// Pen input device path
    #[arg(long)]
    pub pen_device: Option<PathBuf>,

    /// Touch input device path
    #[arg(long)]
    pub touch_device: Option<PathBuf>,

    /// Key input device path
    #[arg(long)]
    pub key_device: Option<PathBuf>,

    /// Coordinate space for reports and injected points (raw, display)
    #[arg(long, value_parser = clap::value_parser!(CoordMode))]
    pub coords: Option<CoordMode>,

    /// Path to config file
    #[arg(long, env = "RM_INPUT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every pointer, touch and key report
    Listen,
    /// Dump raw input events for debugging
    Dump {
        /// Device to dump: "pen", "touch" or "keys"
        device: String,
    },
    /// Tap the touchscreen once
    Tap { x: i32, y: i32 },
    /// Press and release a key
    Key { code: u16 },
    /// Touch the pen down at a point and lift it
    Pen {
        x: i32,
        y: i32,
        #[arg(long, default_value_t = 2048)]
        pressure: i32,
    },
}
