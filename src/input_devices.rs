use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::coords::{Coord, CoordMode};
use crate::device::DeviceProfile;
use crate::error::{Error, Result};
use crate::handle::{EvdevDevice, InputDevice};
use crate::input::{
    key_batch, pointer_batch, ContactFields, ContactReport, KeyState, PointerFields,
    PointerReport, TouchState, WacomState,
};
use crate::listener;

/// The three independent input sources of the tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Pen,
    Touch,
    Keys,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Pen => write!(f, "pen"),
            DeviceClass::Touch => write!(f, "touch"),
            DeviceClass::Keys => write!(f, "keys"),
        }
    }
}

/// The handles of one class. Injection goes to `primary`; the listener reads
/// from every handle.
#[derive(Clone)]
pub struct ClassHandles {
    primary: Arc<dyn InputDevice>,
    extra: Vec<Arc<dyn InputDevice>>,
}

impl ClassHandles {
    pub fn new(primary: Arc<dyn InputDevice>) -> Self {
        Self {
            primary,
            extra: Vec::new(),
        }
    }

    /// Another path to the same logical device.
    pub fn with_extra(mut self, device: Arc<dyn InputDevice>) -> Self {
        self.extra.push(device);
        self
    }

    pub fn primary(&self) -> &Arc<dyn InputDevice> {
        &self.primary
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn InputDevice>> + '_ {
        std::iter::once(&self.primary).chain(self.extra.iter())
    }
}

/// Handles for each class; a missing class is unavailable.
#[derive(Clone, Default)]
pub struct DeviceHandles {
    pub pen: Option<ClassHandles>,
    pub touch: Option<ClassHandles>,
    pub keys: Option<ClassHandles>,
}

/// Device node paths for [`InputDevices::open`].
#[derive(Debug, Clone, Default)]
pub struct DevicePaths {
    pub pen: Option<PathBuf>,
    pub touch: Option<PathBuf>,
    pub keys: Option<PathBuf>,
    pub extra_pen: Vec<PathBuf>,
    pub extra_touch: Vec<PathBuf>,
    pub extra_keys: Vec<PathBuf>,
}

/// State of one class behind its lock, plus the handles it reads from.
pub(crate) struct Class<S> {
    kind: DeviceClass,
    state: Mutex<S>,
    handles: Option<ClassHandles>,
}

impl<S> Class<S> {
    fn new(kind: DeviceClass, state: S, handles: Option<ClassHandles>) -> Self {
        Self {
            kind,
            state: Mutex::new(state),
            handles,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, S> {
        lock(&self.state)
    }

    pub(crate) fn handles(&self) -> Option<&ClassHandles> {
        self.handles.as_ref()
    }

    fn primary(&self) -> Result<&Arc<dyn InputDevice>> {
        self.handles
            .as_ref()
            .map(ClassHandles::primary)
            .ok_or(Error::DeviceUnavailable(self.kind))
    }
}

pub(crate) struct Shared {
    pub(crate) pen: Class<WacomState>,
    pub(crate) touch: Class<TouchState>,
    pub(crate) keys: Class<KeyState>,
    pub(crate) running: Mutex<bool>,
}

/// A device set: pen, touch and keys with their synchronization state.
///
/// Cloning is cheap and every clone drives the same devices.
#[derive(Clone)]
pub struct InputDevices {
    shared: Arc<Shared>,
    profile: &'static DeviceProfile,
}

impl InputDevices {
    pub fn new(profile: &'static DeviceProfile, handles: DeviceHandles) -> Self {
        let shared = Shared {
            pen: Class::new(DeviceClass::Pen, WacomState::new(profile), handles.pen),
            touch: Class::new(DeviceClass::Touch, TouchState::new(profile), handles.touch),
            keys: Class::new(DeviceClass::Keys, KeyState::new(), handles.keys),
            running: Mutex::new(false),
        };
        Self {
            shared: Arc::new(shared),
            profile,
        }
    }

    /// Open the device nodes in `paths`. A class whose primary node cannot be
    /// opened is left unavailable; the others still work.
    pub fn open(profile: &'static DeviceProfile, paths: &DevicePaths) -> Self {
        let handles = DeviceHandles {
            pen: open_class(DeviceClass::Pen, paths.pen.as_deref(), &paths.extra_pen),
            touch: open_class(DeviceClass::Touch, paths.touch.as_deref(), &paths.extra_touch),
            keys: open_class(DeviceClass::Keys, paths.keys.as_deref(), &paths.extra_keys),
        };
        Self::new(profile, handles)
    }

    pub fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    pub fn is_available(&self, class: DeviceClass) -> bool {
        match class {
            DeviceClass::Pen => self.shared.pen.handles().is_some(),
            DeviceClass::Touch => self.shared.touch.handles().is_some(),
            DeviceClass::Keys => self.shared.keys.handles().is_some(),
        }
    }

    /// Start the background listener. Does nothing if it is already running.
    pub fn start_listening(&self) -> Result<()> {
        let mut running = lock(&self.shared.running);
        if *running {
            log::debug!("Listener already running");
            return Ok(());
        }

        let sources = listener::sources(&self.shared);
        if sources.is_empty() {
            log::warn!("No input devices available, not listening");
            return Ok(());
        }

        self.shared.touch.lock().reset();

        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name("rm-input".into())
            .spawn(move || listener::run(shared, sources))?;
        *running = true;
        Ok(())
    }

    /// Seed pen and touch state from the devices now. The listener does this
    /// itself on start; call it before injecting without a listener.
    pub fn sync(&self) {
        listener::initial_resync(&self.shared);
    }

    pub fn is_listening(&self) -> bool {
        *lock(&self.shared.running)
    }

    /// Replace the pointer handler. Called with the lock held; it must not
    /// call back into the pen API.
    pub fn on_pointer(
        &self,
        mode: CoordMode,
        handler: impl FnMut(PointerReport) + Send + 'static,
    ) {
        self.shared.pen.lock().set_handler(mode, Box::new(handler));
    }

    /// Replace the contact handler. Called with the lock held; it must not
    /// call back into the touch API.
    pub fn on_touch(&self, mode: CoordMode, handler: impl FnMut(ContactReport) + Send + 'static) {
        self.shared.touch.lock().set_handler(mode, Box::new(handler));
    }

    /// Replace the key handler.
    pub fn on_key(&self, handler: impl FnMut(u16, bool) + Send + 'static) {
        self.shared.keys.lock().set_handler(Box::new(handler));
    }

    /// Inject the selected pointer fields followed by a boundary. Fields not
    /// selected keep their last hardware value.
    pub fn submit_pointer(
        &self,
        pen_down: bool,
        touch_down: bool,
        coord: Coord,
        pressure: i32,
        fields: PointerFields,
    ) -> Result<()> {
        let batch = pointer_batch(self.profile, pen_down, touch_down, coord, pressure, fields);
        let _pen = self.shared.pen.lock();
        let device = self.shared.pen.primary()?;
        device.write_events(&batch).map_err(Error::WriteFailed)
    }

    /// Claim a slot for a new synthetic contact and return its tracking id.
    pub fn begin_contact(&self) -> Result<i32> {
        self.shared.touch.primary()?;
        self.shared.touch.lock().begin_contact()
    }

    pub fn submit_contact(&self, id: i32, coord: Coord, fields: ContactFields) -> Result<()> {
        let touch = self.shared.touch.lock();
        let device = self.shared.touch.primary()?;
        let batch = touch.contact_batch(id, coord, fields)?;
        device.write_events(&batch).map_err(Error::WriteFailed)
    }

    pub fn end_contact(&self, id: i32) -> Result<()> {
        let mut touch = self.shared.touch.lock();
        let device = self.shared.touch.primary()?;
        let batch = touch.end_batch(id)?;
        device.write_events(&batch).map_err(Error::WriteFailed)?;
        touch.release_contact(id)
    }

    pub fn submit_key(&self, code: u16, down: bool) -> Result<()> {
        let _keys = self.shared.keys.lock();
        let device = self.shared.keys.primary()?;
        device
            .write_events(&key_batch(code, down))
            .map_err(Error::WriteFailed)
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

fn open_class(class: DeviceClass, primary: Option<&Path>, extra: &[PathBuf]) -> Option<ClassHandles> {
    let path = primary?;
    let mut handles = match EvdevDevice::open(path) {
        Ok(device) => {
            log::info!("{} device: {} ({})", class, path.display(), device.name());
            ClassHandles::new(Arc::new(device))
        }
        Err(e) => {
            log::warn!("{} device {} unavailable: {}", class, path.display(), e);
            return None;
        }
    };

    for path in extra {
        match EvdevDevice::open(path) {
            Ok(device) => {
                log::info!("Extra {} device: {}", class, path.display());
                handles = handles.with_extra(Arc::new(device));
            }
            Err(e) => log::warn!("Extra {} device {} unavailable: {}", class, path.display(), e),
        }
    }
    Some(handles)
}

/// Lock ignoring poison; a panicking handler must not wedge its class.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
