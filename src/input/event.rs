//! Event codes the engine cares about and helpers to build event batches.

use evdevil::event::{EventType, InputEvent};

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;

pub const SYN_REPORT: u16 = 0;
pub const SYN_DROPPED: u16 = 3;

pub const BTN_TOOL_PEN: u16 = 0x140;
pub const BTN_TOUCH: u16 = 0x14a;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18;
pub const ABS_MT_SLOT: u16 = 0x2f;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;
pub const ABS_MT_TRACKING_ID: u16 = 0x39;

pub fn key_event(code: u16, value: i32) -> InputEvent {
    InputEvent::new(EventType::from_raw(EV_KEY), code, value)
}

pub fn abs_event(code: u16, value: i32) -> InputEvent {
    InputEvent::new(EventType::from_raw(EV_ABS), code, value)
}

pub fn syn_report() -> InputEvent {
    InputEvent::new(EventType::from_raw(EV_SYN), SYN_REPORT, 0)
}

/// `(type, code, value)` of an event, handy for logging and comparisons.
pub fn raw_parts(ev: &InputEvent) -> (u16, u16, i32) {
    (ev.event_type().raw(), ev.raw_code(), ev.raw_value())
}

/// Human readable name of an event code.
pub fn code_name(ty: u16, code: u16) -> String {
    match ty {
        EV_SYN => match code {
            SYN_REPORT => "SYN_REPORT".into(),
            SYN_DROPPED => "SYN_DROPPED".into(),
            _ => format!("SYN/{}", code),
        },
        EV_KEY => match code {
            BTN_TOOL_PEN => "BTN_TOOL_PEN".into(),
            0x141 => "BTN_TOOL_RUBBER".into(),
            BTN_TOUCH => "BTN_TOUCH".into(),
            0x14b => "BTN_STYLUS".into(),
            0x14c => "BTN_STYLUS2".into(),
            102 => "KEY_HOME".into(),
            105 => "KEY_LEFT".into(),
            106 => "KEY_RIGHT".into(),
            116 => "KEY_POWER".into(),
            143 => "KEY_WAKEUP".into(),
            _ => format!("KEY/{}", code),
        },
        EV_ABS => {
            let abs = match code {
                ABS_X => "X",
                ABS_Y => "Y",
                ABS_PRESSURE => "PRESSURE",
                0x19 => "DISTANCE",
                0x1a => "TILT_X",
                0x1b => "TILT_Y",
                ABS_MT_SLOT => "MT_SLOT",
                0x30 => "MT_TOUCH_MAJOR",
                0x31 => "MT_TOUCH_MINOR",
                0x34 => "MT_ORIENTATION",
                ABS_MT_POSITION_X => "MT_POSITION_X",
                ABS_MT_POSITION_Y => "MT_POSITION_Y",
                0x37 => "MT_TOOL_TYPE",
                ABS_MT_TRACKING_ID => "MT_TRACKING_ID",
                0x3a => "MT_PRESSURE",
                _ => "?",
            };
            format!("ABS_{}({})", abs, code)
        }
        _ => format!("type{} code{}", ty, code),
    }
}
