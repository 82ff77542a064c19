//! Single-slot timer ownership.
//!
//! Each timer role (connect timeout, reconnect backoff) is a [`TimerSlot`]
//! holding at most one live handle.  Arming a slot cancels its previous
//! occupant first, so a role can never have two live timers.

use log::debug;

use crate::app::ports::{TimerHandle, TimerService};

/// Purpose of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRole {
    /// Guards "waiting for an IP" after a connect request.
    ConnectTimeout,
    /// Guards "waiting to retry" after a disconnect.
    ReconnectBackoff,
}

#[derive(Debug)]
pub(crate) struct TimerSlot {
    role: TimerRole,
    handle: Option<TimerHandle>,
}

impl TimerSlot {
    pub(crate) const fn new(role: TimerRole) -> Self {
        Self { role, handle: None }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel the current occupant (if any) and schedule a replacement.
    pub(crate) fn arm<T: TimerService>(&mut self, timers: &mut T, after_ms: u32) {
        self.cancel(timers);
        let handle = timers.schedule(after_ms);
        debug!("WiFi: {:?} armed as {:?} ({}ms)", self.role, handle, after_ms);
        self.handle = Some(handle);
    }

    pub(crate) fn cancel<T: TimerService>(&mut self, timers: &mut T) {
        if let Some(handle) = self.handle.take() {
            timers.cancel(handle);
        }
    }

    /// Clear the slot if `fired` is its live handle.  A fired handle that is
    /// not the occupant (stale expiry) is not claimed.
    pub(crate) fn claim(&mut self, fired: TimerHandle) -> bool {
        if self.handle == Some(fired) {
            self.handle = None;
            return true;
        }
        false
    }
}
