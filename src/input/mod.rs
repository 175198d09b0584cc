pub mod event;
mod keys;
mod pen;
mod touch;

pub use keys::{key_batch, KeyHandler, KeyState};
pub use pen::{pointer_batch, PointerFields, PointerHandler, PointerReport, WacomState};
pub use touch::{ContactFields, ContactReport, TouchHandler, TouchState};
