//! Open input device handles consumed by the engine.

mod evdev;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
pub(crate) mod pipe;

use std::io;
use std::os::fd::RawFd;

use evdevil::event::{Abs, InputEvent, Key};

pub use evdev::EvdevDevice;

/// Number of multi-touch slots tracked per touchscreen.
pub const MT_SLOTS: usize = 32;

/// A duplex input device: event stream in, injected events out, plus the
/// out-of-band state queries used to resynchronize after a queue overflow.
pub trait InputDevice: Send + Sync {
    /// Read one event without blocking. `Ok(None)` once nothing is buffered.
    fn read_event(&self) -> io::Result<Option<InputEvent>>;

    /// Write `events` as one contiguous batch.
    fn write_events(&self, events: &[InputEvent]) -> io::Result<()>;

    /// Whether `key` is currently held, bypassing the event queue.
    fn key_down(&self, key: Key) -> io::Result<bool>;

    /// Current value of an absolute axis, bypassing the event queue.
    fn abs_value(&self, abs: Abs) -> io::Result<i32>;

    /// Current per-slot values of an `ABS_MT_*` axis.
    fn mt_slot_values(&self, abs: Abs) -> io::Result<[i32; MT_SLOTS]>;

    /// Descriptor to poll for readability.
    fn raw_fd(&self) -> RawFd;
}
