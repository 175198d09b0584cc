//! [`MockDevice`] behind a real descriptor, so the listener thread can poll it.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, RawFd};
use std::sync::Mutex;

use evdevil::event::{Abs, InputEvent, Key};

use super::mock::MockDevice;
use super::{InputDevice, MT_SLOTS};

/// Each pushed event also writes a byte to a pipe; the read end is what
/// gets polled. Dropping the write end with [`hang_up`](Self::hang_up)
/// makes the descriptor report `POLLHUP`.
pub struct PipeDevice {
    mock: MockDevice,
    reader: File,
    writer: Mutex<Option<File>>,
}

impl PipeDevice {
    pub fn new() -> Self {
        let mut fds = [0; 2];
        let ret = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_NONBLOCK | libc::O_CLOEXEC) };
        assert_eq!(ret, 0, "pipe2: {}", io::Error::last_os_error());

        let (reader, writer) = unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) };
        Self {
            mock: MockDevice::new(),
            reader,
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn mock(&self) -> &MockDevice {
        &self.mock
    }

    pub fn push(&self, ty: u16, code: u16, value: i32) {
        self.mock.push(ty, code, value);
        if let Some(writer) = self.writer.lock().unwrap().as_mut() {
            writer.write_all(&[0]).unwrap();
        }
    }

    pub fn hang_up(&self) {
        self.writer.lock().unwrap().take();
    }
}

impl InputDevice for PipeDevice {
    fn read_event(&self) -> io::Result<Option<InputEvent>> {
        // Consume wakeups before looking at the queue so a push racing with
        // this read still leaves a byte behind.
        let mut buf = [0u8; 64];
        while matches!((&self.reader).read(&mut buf), Ok(n) if n > 0) {}
        self.mock.read_event()
    }

    fn write_events(&self, events: &[InputEvent]) -> io::Result<()> {
        self.mock.write_events(events)
    }

    fn key_down(&self, key: Key) -> io::Result<bool> {
        self.mock.key_down(key)
    }

    fn abs_value(&self, abs: Abs) -> io::Result<i32> {
        self.mock.abs_value(abs)
    }

    fn mt_slot_values(&self, abs: Abs) -> io::Result<[i32; MT_SLOTS]> {
        self.mock.mt_slot_values(abs)
    }

    fn raw_fd(&self) -> RawFd {
        self.reader.as_raw_fd()
    }
}
