use std::io;

use bitflags::bitflags;
use evdevil::event::{Abs, InputEvent, Key};

use crate::coords::{Coord, CoordMode};
use crate::device::DeviceProfile;
use crate::handle::InputDevice;

use super::event::{
    abs_event, key_event, syn_report, ABS_PRESSURE, ABS_X, ABS_Y, BTN_TOOL_PEN, BTN_TOUCH, EV_ABS,
    EV_KEY, EV_SYN, SYN_DROPPED, SYN_REPORT,
};

/// Full pointer state delivered at each batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerReport {
    pub pen_down: bool,
    pub touch_down: bool,
    pub x: i32,
    pub y: i32,
    pub pressure: i32,
}

/// Pointer handler. May be called again with unchanged state.
pub type PointerHandler = Box<dyn FnMut(PointerReport) + Send>;

bitflags! {
    /// Fields written by a pointer injection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PointerFields: u8 {
        const PEN = 1 << 0;
        const TOUCH = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const PRESSURE = 1 << 4;
    }
}

/// Pen digitizer state, accumulated between `SYN_REPORT`s.
pub struct WacomState {
    pen_down: bool,
    touch_down: bool,
    x: i32,
    y: i32,
    pressure: i32,
    // Set by a drop recovery, cleared by the next boundary.
    recovering: bool,
    handler: Option<PointerHandler>,
    mode: CoordMode,
    profile: &'static DeviceProfile,
}

impl WacomState {
    pub fn new(profile: &'static DeviceProfile) -> Self {
        Self {
            pen_down: false,
            touch_down: false,
            x: 0,
            y: 0,
            pressure: 0,
            recovering: false,
            handler: None,
            mode: CoordMode::default(),
            profile,
        }
    }

    pub fn set_handler(&mut self, mode: CoordMode, handler: PointerHandler) {
        self.mode = mode;
        self.handler = Some(handler);
    }

    /// Current state in raw device units.
    pub fn snapshot(&self) -> PointerReport {
        PointerReport {
            pen_down: self.pen_down,
            touch_down: self.touch_down,
            x: self.x,
            y: self.y,
            pressure: self.pressure,
        }
    }

    pub fn is_recovering(&self) -> bool {
        self.recovering
    }

    /// Feed one event read from `device`.
    pub fn process(&mut self, ev: &InputEvent, device: &dyn InputDevice) {
        let code = ev.raw_code();
        let value = ev.raw_value();

        match ev.event_type().raw() {
            EV_SYN => match code {
                SYN_DROPPED => {
                    log::debug!("Pen events dropped, resynchronizing");
                    if let Err(e) = self.resync(device) {
                        log::warn!("Pen resync failed: {}", e);
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
            EV_KEY => match code {
                BTN_TOOL_PEN => self.pen_down = value != 0,
                BTN_TOUCH => self.touch_down = value != 0,
                _ => {}
            },
            EV_ABS => match code {
                ABS_X => self.x = value,
                ABS_Y => self.y = value,
                ABS_PRESSURE => self.pressure = value,
                _ => {}
            },
            _ => {}
        }
    }

    /// Rebuild the state from the device's current key and axis values and
    /// swallow the next boundary.
    pub fn resync(&mut self, device: &dyn InputDevice) -> io::Result<()> {
        let pen_down = device.key_down(Key::BTN_TOOL_PEN)?;
        let touch_down = device.key_down(Key::BTN_TOUCH)?;
        let x = device.abs_value(Abs::X)?;
        let y = device.abs_value(Abs::Y)?;
        let pressure = device.abs_value(Abs::PRESSURE)?;

        self.pen_down = pen_down;
        self.touch_down = touch_down;
        self.x = x;
        self.y = y;
        self.pressure = pressure;
        self.recovering = true;
        Ok(())
    }

    /// Leave recovery without waiting for a boundary.
    pub fn finish_resync(&mut self) {
        self.recovering = false;
    }

    fn report(&mut self) {
        let mut report = self.snapshot();
        if self.mode == CoordMode::Display {
            (report.x, report.y) = self.profile.pen_to_display(report.x, report.y);
        }
        if let Some(handler) = self.handler.as_mut() {
            handler(report);
        }
    }
}

/// Event batch injecting the selected pointer fields, closed by a boundary.
pub fn pointer_batch(
    profile: &DeviceProfile,
    pen_down: bool,
    touch_down: bool,
    coord: Coord,
    pressure: i32,
    fields: PointerFields,
) -> Vec<InputEvent> {
    let (x, y) = profile.pen_point(coord);
    let mut batch = Vec::with_capacity(6);

    if fields.contains(PointerFields::PEN) {
        batch.push(key_event(BTN_TOOL_PEN, pen_down as i32));
    }
    if fields.contains(PointerFields::TOUCH) {
        batch.push(key_event(BTN_TOUCH, touch_down as i32));
    }
    if fields.contains(PointerFields::X) {
        batch.push(abs_event(ABS_X, x));
    }
    if fields.contains(PointerFields::Y) {
        batch.push(abs_event(ABS_Y, y));
    }
    if fields.contains(PointerFields::PRESSURE) {
        batch.push(abs_event(ABS_PRESSURE, pressure));
    }
    batch.push(syn_report());
    batch
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::device::RM2;
    use crate::handle::mock::MockDevice;
    use crate::input::event::raw_parts;

    fn recording_state(mode: CoordMode) -> (WacomState, Arc<Mutex<Vec<PointerReport>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let mut state = WacomState::new(&RM2);
        state.set_handler(mode, Box::new(move |r| sink.lock().unwrap().push(r)));
        (state, reports)
    }

    fn feed(state: &mut WacomState, device: &MockDevice, events: &[(u16, u16, i32)]) {
        for &(ty, code, value) in events {
            device.push(ty, code, value);
        }
        while let Ok(Some(ev)) = device.read_event() {
            state.process(&ev, device);
        }
    }

    #[test]
    fn test_reports_final_values_once_per_boundary() {
        let device = MockDevice::new();
        let (mut state, reports) = recording_state(CoordMode::Raw);

        feed(
            &mut state,
            &device,
            &[
                (EV_KEY, BTN_TOOL_PEN, 1),
                (EV_ABS, ABS_X, 100),
                (EV_ABS, ABS_X, 150),
                (EV_ABS, ABS_Y, 200),
                (EV_ABS, ABS_PRESSURE, 30),
            ],
        );
        assert!(reports.lock().unwrap().is_empty());

        feed(&mut state, &device, &[(EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(
            *reports.lock().unwrap(),
            vec![PointerReport {
                pen_down: true,
                touch_down: false,
                x: 150,
                y: 200,
                pressure: 30,
            }]
        );
    }

    #[test]
    fn test_repeated_boundary_reports_again() {
        let device = MockDevice::new();
        let (mut state, reports) = recording_state(CoordMode::Raw);

        feed(
            &mut state,
            &device,
            &[
                (EV_ABS, ABS_X, 5),
                (EV_SYN, SYN_REPORT, 0),
                (EV_SYN, SYN_REPORT, 0),
            ],
        );
        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], reports[1]);
    }

    #[test]
    fn test_display_mode_transforms() {
        let device = MockDevice::new();
        let (mut state, reports) = recording_state(CoordMode::Display);

        feed(
            &mut state,
            &device,
            &[
                (EV_ABS, ABS_X, 0),
                (EV_ABS, ABS_Y, RM2.pen_y_max),
                (EV_SYN, SYN_REPORT, 0),
            ],
        );
        let report = reports.lock().unwrap()[0];
        assert_eq!((report.x, report.y), (1404, 1874));
    }

    #[test]
    fn test_drop_suppresses_next_boundary() {
        let device = MockDevice::new();
        device.set_key(BTN_TOOL_PEN, true);
        device.set_abs(ABS_X, 1000);
        device.set_abs(ABS_Y, 2000);
        device.set_abs(ABS_PRESSURE, 12);
        let (mut state, reports) = recording_state(CoordMode::Raw);

        feed(
            &mut state,
            &device,
            &[
                (EV_ABS, ABS_X, 1),
                (EV_SYN, SYN_DROPPED, 0),
                (EV_ABS, ABS_PRESSURE, 40),
                (EV_SYN, SYN_REPORT, 0),
            ],
        );

        assert!(reports.lock().unwrap().is_empty());
        assert!(!state.is_recovering());
        assert_eq!(
            state.snapshot(),
            PointerReport {
                pen_down: true,
                touch_down: false,
                x: 1000,
                y: 2000,
                pressure: 40,
            }
        );

        feed(&mut state, &device, &[(EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(reports.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_device_queried_only_on_drop() {
        let device = MockDevice::new();
        let (mut state, _reports) = recording_state(CoordMode::Raw);

        feed(
            &mut state,
            &device,
            &[(EV_ABS, ABS_X, 1), (EV_SYN, SYN_REPORT, 0)],
        );
        assert_eq!(device.queries(), 0);

        feed(&mut state, &device, &[(EV_SYN, SYN_DROPPED, 0)]);
        // two keys and three axes
        assert_eq!(device.queries(), 5);
    }

    #[test]
    fn test_no_handler_is_fine() {
        let device = MockDevice::new();
        let mut state = WacomState::new(&RM2);
        feed(&mut state, &device, &[(EV_ABS, ABS_X, 3), (EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(state.snapshot().x, 3);
    }

    #[test]
    fn test_pointer_batch_selected_fields() {
        let batch = pointer_batch(
            &RM2,
            true,
            false,
            Coord::raw(10, 20),
            99,
            PointerFields::PEN | PointerFields::Y,
        );
        let parts: Vec<_> = batch.iter().map(raw_parts).collect();
        assert_eq!(
            parts,
            vec![
                (EV_KEY, BTN_TOOL_PEN, 1),
                (EV_ABS, ABS_Y, 20),
                (EV_SYN, SYN_REPORT, 0),
            ]
        );
    }

    #[test]
    fn test_pointer_batch_all_fields_in_display_units() {
        let batch = pointer_batch(
            &RM2,
            true,
            true,
            Coord::display(0, 1874),
            2048,
            PointerFields::all(),
        );
        let parts: Vec<_> = batch.iter().map(raw_parts).collect();
        assert_eq!(
            parts,
            vec![
                (EV_KEY, BTN_TOOL_PEN, 1),
                (EV_KEY, BTN_TOUCH, 1),
                (EV_ABS, ABS_X, 0),
                (EV_ABS, ABS_Y, 0),
                (EV_ABS, ABS_PRESSURE, 2048),
                (EV_SYN, SYN_REPORT, 0),
            ]
        );
    }
}
