//! Pen, touch and key input for reMarkable tablets.
//!
//! [`InputDevices`] reads the three evdev streams on a background thread,
//! keeps a consistent view of each across kernel queue overflows, and
//! injects synthetic events that never collide with real contacts.

pub mod coords;
pub mod device;
mod error;
pub mod handle;
pub mod input;
mod input_devices;
mod listener;
pub mod tracking;

pub use coords::{Coord, CoordMode};
pub use device::{DeviceProfile, Model};
pub use error::{Error, Result};
pub use input::{ContactFields, ContactReport, PointerFields, PointerReport};
pub use input_devices::{ClassHandles, DeviceClass, DeviceHandles, DevicePaths, InputDevices};
