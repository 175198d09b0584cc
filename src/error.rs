use std::io;

use crate::input_devices::DeviceClass;

/// Errors returned by the injection and listening API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every multi-touch slot already holds a contact.
    #[error("no free multi-touch slot")]
    OutOfSlots,
    #[error("no contact with tracking id {0}")]
    ContactNotFound(i32),
    #[error("{0} device is unavailable")]
    DeviceUnavailable(DeviceClass),
    #[error("failed to write events: {0}")]
    WriteFailed(#[source] io::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
