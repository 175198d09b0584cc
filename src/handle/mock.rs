//! In-memory device for tests: queued reads, recorded writes, scripted state.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::os::fd::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use evdevil::event::{Abs, EventType, InputEvent, Key};

use crate::input::event::raw_parts;

use super::{InputDevice, MT_SLOTS};

#[derive(Default)]
pub struct MockDevice {
    reads: Mutex<VecDeque<InputEvent>>,
    writes: Mutex<Vec<(u16, u16, i32)>>,
    keys: Mutex<HashSet<u16>>,
    abs: Mutex<HashMap<u16, i32>>,
    slots: Mutex<HashMap<u16, [i32; MT_SLOTS]>>,
    fail_writes: AtomicBool,
    queries: Mutex<usize>,
}

impl MockDevice {
    pub fn new() -> Self {
        let device = Self::default();
        device
            .slots
            .lock()
            .unwrap()
            .insert(Abs::MT_TRACKING_ID.raw(), [-1; MT_SLOTS]);
        device
    }

    pub fn push(&self, ty: u16, code: u16, value: i32) {
        self.reads
            .lock()
            .unwrap()
            .push_back(InputEvent::new(EventType::from_raw(ty), code, value));
    }

    pub fn set_key(&self, code: u16, down: bool) {
        let mut keys = self.keys.lock().unwrap();
        if down {
            keys.insert(code);
        } else {
            keys.remove(&code);
        }
    }

    pub fn set_abs(&self, code: u16, value: i32) {
        self.abs.lock().unwrap().insert(code, value);
    }

    pub fn set_slot(&self, slot: usize, tracking_id: i32, x: i32, y: i32) {
        let mut slots = self.slots.lock().unwrap();
        for (abs, value) in [
            (Abs::MT_TRACKING_ID, tracking_id),
            (Abs::MT_POSITION_X, x),
            (Abs::MT_POSITION_Y, y),
        ] {
            slots.entry(abs.raw()).or_insert([0; MT_SLOTS])[slot] = value;
        }
    }

    pub fn written(&self) -> Vec<(u16, u16, i32)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn take_written(&self) -> Vec<(u16, u16, i32)> {
        std::mem::take(&mut *self.writes.lock().unwrap())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of out-of-band state queries served so far.
    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    fn count_query(&self) {
        *self.queries.lock().unwrap() += 1;
    }
}

impl InputDevice for MockDevice {
    fn read_event(&self) -> io::Result<Option<InputEvent>> {
        Ok(self.reads.lock().unwrap().pop_front())
    }

    fn write_events(&self, events: &[InputEvent]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure"));
        }
        self.writes
            .lock()
            .unwrap()
            .extend(events.iter().map(raw_parts));
        Ok(())
    }

    fn key_down(&self, key: Key) -> io::Result<bool> {
        self.count_query();
        Ok(self.keys.lock().unwrap().contains(&key.raw()))
    }

    fn abs_value(&self, abs: Abs) -> io::Result<i32> {
        self.count_query();
        Ok(self.abs.lock().unwrap().get(&abs.raw()).copied().unwrap_or(0))
    }

    fn mt_slot_values(&self, abs: Abs) -> io::Result<[i32; MT_SLOTS]> {
        self.count_query();
        Ok(self
            .slots
            .lock()
            .unwrap()
            .get(&abs.raw())
            .copied()
            .unwrap_or([0; MT_SLOTS]))
    }

    fn raw_fd(&self) -> RawFd {
        -1
    }
}
