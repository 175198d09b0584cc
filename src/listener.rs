//! Background reader multiplexing every open device handle.

use std::io;
use std::sync::Arc;

use crate::handle::InputDevice;
use crate::input_devices::{lock, DeviceClass, Shared};

pub(crate) struct Source {
    class: DeviceClass,
    device: Arc<dyn InputDevice>,
}

/// Every readable handle, primary handles first.
pub(crate) fn sources(shared: &Shared) -> Vec<Source> {
    let classes = [
        (DeviceClass::Pen, shared.pen.handles()),
        (DeviceClass::Touch, shared.touch.handles()),
        (DeviceClass::Keys, shared.keys.handles()),
    ];
    classes
        .into_iter()
        .filter_map(|(class, handles)| handles.map(|h| (class, h)))
        .flat_map(|(class, handles)| {
            handles.all().map(move |device| Source {
                class,
                device: Arc::clone(device),
            })
        })
        .collect()
}

pub(crate) fn run(shared: Arc<Shared>, sources: Vec<Source>) {
    log::info!("Listening on {} device handle(s)", sources.len());
    initial_resync(&shared);

    let mut fds: Vec<libc::pollfd> = sources
        .iter()
        .map(|source| libc::pollfd {
            fd: source.device.raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        })
        .collect();

    loop {
        let ret = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            log::error!("poll failed, listener stopping: {}", err);
            break;
        }

        for (pfd, source) in fds.iter_mut().zip(&sources) {
            if pfd.revents & libc::POLLIN != 0 {
                drain(&shared, source.class, source.device.as_ref());
            }
            if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
                log::warn!("{} device handle closed (revents {:#x})", source.class, pfd.revents);
                pfd.fd = -1;
            }
        }

        if fds.iter().all(|pfd| pfd.fd < 0) {
            log::warn!("All device handles closed, listener stopping");
            break;
        }
    }

    *lock(&shared.running) = false;
}

/// Seed pen and touch state from the devices before the first event.
pub(crate) fn initial_resync(shared: &Shared) {
    if let Some(handles) = shared.pen.handles() {
        let mut pen = shared.pen.lock();
        if let Err(e) = pen.resync(handles.primary().as_ref()) {
            log::warn!("Initial pen sync failed: {}", e);
        }
        pen.finish_resync();
    }
    if let Some(handles) = shared.touch.handles() {
        let mut touch = shared.touch.lock();
        if let Err(e) = touch.resync(handles.primary().as_ref()) {
            log::warn!("Initial touch sync failed: {}", e);
        }
        touch.finish_resync();
    }
}

/// Process everything currently buffered on `device` under its class lock.
fn drain(shared: &Shared, class: DeviceClass, device: &dyn InputDevice) {
    let result = match class {
        DeviceClass::Pen => {
            let mut pen = shared.pen.lock();
            read_all(device, |ev| pen.process(ev, device))
        }
        DeviceClass::Touch => {
            let mut touch = shared.touch.lock();
            read_all(device, |ev| touch.process(ev, device))
        }
        DeviceClass::Keys => {
            let mut keys = shared.keys.lock();
            read_all(device, |ev| keys.process(ev))
        }
    };
    if let Err(e) = result {
        log::warn!("Reading {} events failed: {}", class, e);
    }
}

fn read_all(
    device: &dyn InputDevice,
    mut f: impl FnMut(&evdevil::event::InputEvent),
) -> io::Result<()> {
    while let Some(ev) = device.read_event()? {
        f(&ev);
    }
    Ok(())
}

/// Drain every handle of `class`, as the reader thread would.
#[cfg(test)]
pub(crate) fn drain_class(shared: &Shared, class: DeviceClass) {
    let handles = match class {
        DeviceClass::Pen => shared.pen.handles(),
        DeviceClass::Touch => shared.touch.handles(),
        DeviceClass::Keys => shared.keys.handles(),
    };
    for device in handles.into_iter().flat_map(|h| h.all()) {
        drain(shared, class, device.as_ref());
    }
}
