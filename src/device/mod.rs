mod rm1;
mod rm2;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::coords::{self, Coord, CoordMode, TouchAxes};

pub use rm1::RM1;
pub use rm2::RM2;

/// Axis ranges and orientation of one hardware revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Pen digitizer ranges
    pub pen_x_max: i32,
    pub pen_y_max: i32,

    // Touch screen ranges
    pub touch_x_max: i32,
    pub touch_y_max: i32,
    pub touch_axes: TouchAxes,
}

impl DeviceProfile {
    /// Profile selected at build time.
    ///
    /// Defaults to RM2; the `rm1` feature switches to RM1.
    pub fn current() -> &'static Self {
        if cfg!(feature = "rm1") {
            &RM1
        } else {
            &RM2
        }
    }

    pub fn pen_to_display(&self, x: i32, y: i32) -> (i32, i32) {
        coords::pen_to_display(x, y, self.pen_x_max, self.pen_y_max)
    }

    pub fn pen_to_raw(&self, x: i32, y: i32) -> (i32, i32) {
        coords::pen_to_raw(x, y, self.pen_x_max, self.pen_y_max)
    }

    pub fn touch_to_display(&self, x: i32, y: i32) -> (i32, i32) {
        self.touch_axes
            .to_display(x, y, self.touch_x_max, self.touch_y_max)
    }

    pub fn touch_to_raw(&self, x: i32, y: i32) -> (i32, i32) {
        self.touch_axes.to_raw(x, y, self.touch_x_max, self.touch_y_max)
    }

    /// Digitizer axis values for `coord`, whatever units it came in.
    pub fn pen_point(&self, coord: Coord) -> (i32, i32) {
        match coord.mode {
            CoordMode::Raw => (coord.x, coord.y),
            CoordMode::Display => self.pen_to_raw(coord.x, coord.y),
        }
    }

    /// Touchscreen axis values for `coord`, whatever units it came in.
    pub fn touch_point(&self, coord: Coord) -> (i32, i32) {
        match coord.mode {
            CoordMode::Raw => (coord.x, coord.y),
            CoordMode::Display => self.touch_to_raw(coord.x, coord.y),
        }
    }
}

/// Hardware revision, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    Rm1,
    Rm2,
}

impl Model {
    pub fn profile(&self) -> &'static DeviceProfile {
        match self {
            Model::Rm1 => &RM1,
            Model::Rm2 => &RM2,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        if cfg!(feature = "rm1") {
            Model::Rm1
        } else {
            Model::Rm2
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Rm1 => write!(f, "rm1"),
            Model::Rm2 => write!(f, "rm2"),
        }
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rm1" | "remarkable1" | "remarkable-1" => Ok(Model::Rm1),
            "rm2" | "remarkable2" | "remarkable-2" => Ok(Model::Rm2),
            _ => Err(format!("Invalid model '{}'. Valid values: rm1, rm2", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_matches_default_model() {
        assert_eq!(DeviceProfile::current(), Model::default().profile());
    }

    #[test]
    fn test_points_pass_raw_through() {
        assert_eq!(RM2.touch_point(Coord::raw(100, 200)), (100, 200));
        assert_eq!(RM2.pen_point(Coord::raw(100, 200)), (100, 200));
    }

    #[test]
    fn test_display_points_are_converted() {
        assert_eq!(RM2.touch_point(Coord::display(0, 1874)), (0, 0));
        assert_eq!(RM2.pen_point(Coord::display(0, 1874)), (0, 0));
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("rm1".parse::<Model>().unwrap(), Model::Rm1);
        assert_eq!("RM2".parse::<Model>().unwrap(), Model::Rm2);
        assert!("kindle".parse::<Model>().is_err());
    }
}
