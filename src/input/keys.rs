use evdevil::event::InputEvent;

use super::event::{key_event, syn_report, EV_KEY};

/// Key handler: `(key code, down)`.
pub type KeyHandler = Box<dyn FnMut(u16, bool) + Send>;

/// Key transitions are forwarded as they arrive; nothing is buffered and
/// queue overflows are not recovered.
#[derive(Default)]
pub struct KeyState {
    handler: Option<KeyHandler>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_handler(&mut self, handler: KeyHandler) {
        self.handler = Some(handler);
    }

    pub fn process(&mut self, ev: &InputEvent) {
        if ev.event_type().raw() != EV_KEY {
            return;
        }
        if let Some(handler) = self.handler.as_mut() {
            handler(ev.raw_code(), ev.raw_value() != 0);
        }
    }
}

pub fn key_batch(code: u16, down: bool) -> Vec<InputEvent> {
    vec![key_event(code, down as i32), syn_report()]
}
