//! Dump raw input events for debugging.
//! Run: rm-input dump touch  (or pen, keys) to print events as they arrive.

use std::path::Path;

use rm_input::handle::{EvdevDevice, InputDevice};
use rm_input::input::event::code_name;

pub fn run_dump(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let device = EvdevDevice::open(path)?;
    eprintln!(
        "Dumping events from {} ({}) (Ctrl+C to stop):\n",
        path.display(),
        device.name()
    );
    let mut n = 0u64;
    loop {
        device.block_until_readable()?;
        while let Some(ev) = device.read_event()? {
            n += 1;
            let name = code_name(ev.event_type().raw(), ev.raw_code());
            println!("{:6}  {}  value={}", n, name, ev.raw_value());
        }
    }
}
