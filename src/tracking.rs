//! Tracking ids for synthetic multi-touch contacts.
//!
//! The kernel hands out tracking ids from a 16-bit counter. Synthetic contacts
//! draw from a frontier kept `KERNEL_ID_OFFSET` ahead of the highest kernel id
//! seen, so injected contacts do not reuse an id the kernel is about to assign.

/// Distance kept between the kernel's counter and the synthetic frontier.
pub const KERNEL_ID_OFFSET: u16 = 4096;

const FIRST_ID: u16 = 1;

#[derive(Debug, Clone)]
pub struct TrackingIds {
    next: u16,
}

impl TrackingIds {
    pub fn new() -> Self {
        Self { next: FIRST_ID }
    }

    pub fn reset(&mut self) {
        self.next = FIRST_ID;
    }

    /// The id the next `allocate` will return.
    pub fn peek(&self) -> i32 {
        i32::from(self.next)
    }

    pub fn allocate(&mut self) -> i32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        i32::from(id)
    }

    /// Push the frontier ahead of a tracking id reported by the kernel.
    ///
    /// Only ids within `(next - offset/2, next + offset)` move the frontier,
    /// distances taken modulo 65536.
    pub fn observe(&mut self, kernel_id: i32) {
        if kernel_id < 0 {
            return;
        }
        let kernel_id = (kernel_id & 0xffff) as u16;
        let distance = i32::from(kernel_id.wrapping_sub(self.next) as i16);
        let half = i32::from(KERNEL_ID_OFFSET / 2);

        if distance > -half && distance < i32::from(KERNEL_ID_OFFSET) {
            self.next = kernel_id.wrapping_add(KERNEL_ID_OFFSET);
            log::trace!("Tracking id frontier moved to {}", self.next);
        }
    }
}

impl Default for TrackingIds {
    fn default() -> Self {
        Self::new()
    }
}
