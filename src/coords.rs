//! Coordinate transforms between raw device axes and the logical display.
//!
//! The display is portrait, 1404 wide and 1874 tall. The digitizer is mounted
//! rotated by 90° with its X axis running bottom to top; the touchscreen is
//! portrait but inverted on one or both axes depending on hardware revision.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DISPLAY_WIDTH: i32 = 1404;
pub const DISPLAY_HEIGHT: i32 = 1874;

/// Units a handler receives or an injection call supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordMode {
    /// Raw device axis values.
    Raw,
    /// Logical display pixels.
    #[default]
    Display,
}

/// A point tagged with the units it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub mode: CoordMode,
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn raw(x: i32, y: i32) -> Self {
        Self { mode: CoordMode::Raw, x, y }
    }

    pub fn display(x: i32, y: i32) -> Self {
        Self { mode: CoordMode::Display, x, y }
    }
}

/// How the touchscreen axes relate to the display axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAxes {
    /// reMarkable 1: both axes run opposite to the display.
    BothInverted,
    /// reMarkable 2: X runs with the display, Y is inverted.
    YInverted,
}

impl TouchAxes {
    pub fn to_display(&self, x: i32, y: i32, x_max: i32, y_max: i32) -> (i32, i32) {
        let (x, y) = (clamp_axis(x, x_max), clamp_axis(y, y_max));
        match self {
            TouchAxes::BothInverted => (
                scale(x_max - x, DISPLAY_WIDTH, x_max),
                scale(y_max - y, DISPLAY_HEIGHT, y_max),
            ),
            TouchAxes::YInverted => (
                scale(x, DISPLAY_WIDTH, x_max),
                scale(y_max - y, DISPLAY_HEIGHT, y_max),
            ),
        }
    }

    pub fn to_raw(&self, x: i32, y: i32, x_max: i32, y_max: i32) -> (i32, i32) {
        let (x, y) = (clamp_axis(x, DISPLAY_WIDTH), clamp_axis(y, DISPLAY_HEIGHT));
        match self {
            TouchAxes::BothInverted => (
                scale(DISPLAY_WIDTH - x, x_max, DISPLAY_WIDTH),
                scale(DISPLAY_HEIGHT - y, y_max, DISPLAY_HEIGHT),
            ),
            TouchAxes::YInverted => (
                scale(x, x_max, DISPLAY_WIDTH),
                scale(DISPLAY_HEIGHT - y, y_max, DISPLAY_HEIGHT),
            ),
        }
    }
}

/// Digitizer to display: axes swap, raw X becomes inverted display Y.
pub fn pen_to_display(x: i32, y: i32, x_max: i32, y_max: i32) -> (i32, i32) {
    let (x, y) = (clamp_axis(x, x_max), clamp_axis(y, y_max));
    (
        scale(y, DISPLAY_WIDTH, y_max),
        DISPLAY_HEIGHT - scale(x, DISPLAY_HEIGHT, x_max),
    )
}

pub fn pen_to_raw(x: i32, y: i32, x_max: i32, y_max: i32) -> (i32, i32) {
    let (x, y) = (clamp_axis(x, DISPLAY_WIDTH), clamp_axis(y, DISPLAY_HEIGHT));
    (
        scale(DISPLAY_HEIGHT - y, x_max, DISPLAY_HEIGHT),
        scale(x, y_max, DISPLAY_WIDTH),
    )
}

/// Points outside the axis range land on its nearest edge.
fn clamp_axis(value: i32, max: i32) -> i32 {
    value.clamp(0, max.max(0))
}

/// `value * num / den` without intermediate overflow, truncating like the kernel's integer math.
fn scale(value: i32, num: i32, den: i32) -> i32 {
    if den == 0 {
        return 0;
    }
    (i64::from(value) * i64::from(num) / i64::from(den)) as i32
}

impl fmt::Display for CoordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordMode::Raw => write!(f, "raw"),
            CoordMode::Display => write!(f, "display"),
        }
    }
}

impl FromStr for CoordMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "evdev" | "device" => Ok(CoordMode::Raw),
            "display" | "screen" => Ok(CoordMode::Display),
            _ => Err(format!(
                "Invalid coordinate mode '{}'. Valid values: raw, display",
                s
            )),
        }
    }
}
