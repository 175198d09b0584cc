use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;

use evdevil::event::{Abs, InputEvent, Key};
use evdevil::Evdev;

use super::{InputDevice, MT_SLOTS};

/// An `/dev/input/event*` node opened read-write and non-blocking.
pub struct EvdevDevice {
    evdev: Evdev,
    name: String,
}

impl EvdevDevice {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let evdev = Evdev::open(path)?;
        evdev.set_nonblocking(true)?;
        let name = evdev.name().unwrap_or_else(|_| path.display().to_string());

        log::debug!("Opened {} ({})", path.display(), name);
        Ok(Self { evdev, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until events are pending, even in non-blocking mode.
    pub fn block_until_readable(&self) -> io::Result<()> {
        self.evdev.block_until_readable()
    }
}

impl InputDevice for EvdevDevice {
    fn read_event(&self) -> io::Result<Option<InputEvent>> {
        self.evdev.raw_events().next().transpose()
    }

    fn write_events(&self, events: &[InputEvent]) -> io::Result<()> {
        self.evdev.write_events(events)
    }

    fn key_down(&self, key: Key) -> io::Result<bool> {
        Ok(self.evdev.key_state()?.contains(key))
    }

    fn abs_value(&self, abs: Abs) -> io::Result<i32> {
        Ok(self.evdev.abs_info(abs)?.value())
    }

    fn mt_slot_values(&self, abs: Abs) -> io::Result<[i32; MT_SLOTS]> {
        // Layout expected by EVIOCGMTSLOTS: the axis code, then one value per slot.
        // Slots the device does not have keep -1, i.e. no contact.
        let mut request = [-1i32; MT_SLOTS + 1];
        request[0] = i32::from(abs.raw());

        let ret = unsafe {
            libc::ioctl(
                self.evdev.as_raw_fd(),
                eviocgmtslots(std::mem::size_of_val(&request)) as _,
                request.as_mut_ptr(),
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        let mut values = [0i32; MT_SLOTS];
        values.copy_from_slice(&request[1..]);
        Ok(values)
    }

    fn raw_fd(&self) -> RawFd {
        self.evdev.as_raw_fd()
    }
}

/// `EVIOCGMTSLOTS(len)` = `_IOC(_IOC_READ, 'E', 0x0a, len)`.
const fn eviocgmtslots(len: usize) -> u32 {
    const IOC_READ: u32 = 2;
    (IOC_READ << 30) | ((len as u32) << 16) | ((b'E' as u32) << 8) | 0x0a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviocgmtslots_encoding() {
        // matches the kernel header for a 33 * 4 byte request
        assert_eq!(eviocgmtslots(132), 0x8084_450a);
    }

    #[test]
    fn test_open_rejects_non_evdev_node() {
        let err = EvdevDevice::open("/dev/null").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
