use std::io;

use bitflags::bitflags;
use evdevil::event::{Abs, InputEvent};

use crate::coords::{Coord, CoordMode};
use crate::device::DeviceProfile;
use crate::error::{Error, Result};
use crate::handle::{InputDevice, MT_SLOTS};
use crate::tracking::TrackingIds;

use super::event::{
    abs_event, syn_report, ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_SLOT, ABS_MT_TRACKING_ID,
    EV_ABS, EV_SYN, SYN_DROPPED, SYN_REPORT,
};

/// One active contact as seen at a batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactReport {
    pub tracking_id: i32,
    pub x: i32,
    pub y: i32,
}

/// Contact handler, called once per active contact. May be called again with
/// unchanged state.
pub type TouchHandler = Box<dyn FnMut(ContactReport) + Send>;

bitflags! {
    /// Coordinates written by a contact injection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContactFields: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    tracking_id: Option<i32>,
    x: i32,
    y: i32,
}

/// Multi-touch slot table, accumulated between `SYN_REPORT`s.
pub struct TouchState {
    slots: [SlotState; MT_SLOTS],
    // Slot addressed by the kernel stream, -1 before the first selection.
    current_slot: i32,
    ids: TrackingIds,
    recovering: bool,
    handler: Option<TouchHandler>,
    mode: CoordMode,
    profile: &'static DeviceProfile,
}

impl TouchState {
    pub fn new(profile: &'static DeviceProfile) -> Self {
        Self {
            slots: [SlotState::default(); MT_SLOTS],
            current_slot: -1,
            ids: TrackingIds::new(),
            recovering: false,
            handler: None,
            mode: CoordMode::default(),
            profile,
        }
    }

    /// Free every slot and restart the tracking-id frontier.
    pub fn reset(&mut self) {
        self.slots = [SlotState::default(); MT_SLOTS];
        self.current_slot = -1;
        self.ids.reset();
        self.recovering = false;
    }

    pub fn set_handler(&mut self, mode: CoordMode, handler: TouchHandler) {
        self.mode = mode;
        self.handler = Some(handler);
    }

    pub fn current_slot(&self) -> i32 {
        self.current_slot
    }

    pub fn is_recovering(&self) -> bool {
        self.recovering
    }

    /// Active contacts in ascending slot order, raw device units.
    pub fn contacts(&self) -> Vec<ContactReport> {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.tracking_id.map(|tracking_id| ContactReport {
                    tracking_id,
                    x: slot.x,
                    y: slot.y,
                })
            })
            .collect()
    }

    /// Feed one event read from `device`.
    pub fn process(&mut self, ev: &InputEvent, device: &dyn InputDevice) {
        let code = ev.raw_code();
        let value = ev.raw_value();

        match ev.event_type().raw() {
            EV_SYN => match code {
                SYN_DROPPED => {
                    log::debug!("Touch events dropped, resynchronizing");
                    if let Err(e) = self.resync(device) {
                        log::warn!("Touch resync failed: {}", e);
                    }
                }
                SYN_REPORT => {
                    if self.recovering {
                        self.recovering = false;
                        return;
                    }
                    self.report();
                }
                _ => {}
            },
            EV_ABS => match code {
                ABS_MT_SLOT => self.current_slot = value,
                ABS_MT_TRACKING_ID => {
                    if let Some(slot) = self.selected_slot() {
                        slot.tracking_id = (value >= 0).then_some(value);
                    }
                    self.ids.observe(value);
                }
                ABS_MT_POSITION_X => {
                    if let Some(slot) = self.selected_slot() {
                        slot.x = value;
                    }
                }
                ABS_MT_POSITION_Y => {
                    if let Some(slot) = self.selected_slot() {
                        slot.y = value;
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Rebuild the slot table from the device, report every active contact
    /// right away and swallow the next boundary.
    pub fn resync(&mut self, device: &dyn InputDevice) -> io::Result<()> {
        let ids = device.mt_slot_values(Abs::MT_TRACKING_ID)?;
        let xs = device.mt_slot_values(Abs::MT_POSITION_X)?;
        let ys = device.mt_slot_values(Abs::MT_POSITION_Y)?;
        let current_slot = device.abs_value(Abs::MT_SLOT)?;

        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = SlotState {
                tracking_id: (ids[i] >= 0).then_some(ids[i]),
                x: xs[i],
                y: ys[i],
            };
            self.ids.observe(ids[i]);
        }
        self.current_slot = current_slot;
        self.recovering = true;
        self.report();
        Ok(())
    }

    /// Leave recovery without waiting for a boundary.
    pub fn finish_resync(&mut self) {
        self.recovering = false;
    }

    /// Claim a free slot for a synthetic contact, highest slot first.
    pub fn begin_contact(&mut self) -> Result<i32> {
        let slot = (0..MT_SLOTS)
            .rev()
            .find(|&i| self.slots[i].tracking_id.is_none())
            .ok_or(Error::OutOfSlots)?;
        let id = self.ids.allocate();
        self.slots[slot].tracking_id = Some(id);
        log::debug!("Contact {} claimed slot {}", id, slot);
        Ok(id)
    }

    /// Batch moving contact `id`. The stream's selected slot is restored
    /// afterwards so readers never see a spurious slot switch.
    pub fn contact_batch(
        &self,
        id: i32,
        coord: Coord,
        fields: ContactFields,
    ) -> Result<Vec<InputEvent>> {
        let slot = self.slot_of(id).ok_or(Error::ContactNotFound(id))?;
        let (x, y) = self.profile.touch_point(coord);

        let mut batch = Vec::with_capacity(6);
        batch.push(abs_event(ABS_MT_SLOT, slot as i32));
        batch.push(abs_event(ABS_MT_TRACKING_ID, id));
        if fields.contains(ContactFields::X) {
            batch.push(abs_event(ABS_MT_POSITION_X, x));
        }
        if fields.contains(ContactFields::Y) {
            batch.push(abs_event(ABS_MT_POSITION_Y, y));
        }
        self.push_slot_restore(&mut batch);
        batch.push(syn_report());
        Ok(batch)
    }

    /// Batch lifting contact `id`. The slot stays claimed until
    /// [`release_contact`](Self::release_contact) is called.
    pub fn end_batch(&self, id: i32) -> Result<Vec<InputEvent>> {
        let slot = self.slot_of(id).ok_or(Error::ContactNotFound(id))?;

        let mut batch = Vec::with_capacity(4);
        batch.push(abs_event(ABS_MT_SLOT, slot as i32));
        batch.push(abs_event(ABS_MT_TRACKING_ID, -1));
        self.push_slot_restore(&mut batch);
        batch.push(syn_report());
        Ok(batch)
    }

    /// Free the slot held by contact `id`.
    pub fn release_contact(&mut self, id: i32) -> Result<()> {
        let slot = self.slot_of(id).ok_or(Error::ContactNotFound(id))?;
        self.slots[slot].tracking_id = None;
        log::debug!("Contact {} released slot {}", id, slot);
        Ok(())
    }

    fn push_slot_restore(&self, batch: &mut Vec<InputEvent>) {
        if self.current_slot >= 0 {
            batch.push(abs_event(ABS_MT_SLOT, self.current_slot));
        }
    }

    fn slot_of(&self, id: i32) -> Option<usize> {
        (0..MT_SLOTS)
            .rev()
            .find(|&i| self.slots[i].tracking_id == Some(id))
    }

    fn selected_slot(&mut self) -> Option<&mut SlotState> {
        usize::try_from(self.current_slot)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
    }

    fn report(&mut self) {
        let Some(handler) = self.handler.as_mut() else {
            return;
        };
        for slot in &self.slots {
            let Some(tracking_id) = slot.tracking_id else {
                continue;
            };
            let (x, y) = match self.mode {
                CoordMode::Raw => (slot.x, slot.y),
                CoordMode::Display => self.profile.touch_to_display(slot.x, slot.y),
            };
            handler(ContactReport { tracking_id, x, y });
        }
    }
}
