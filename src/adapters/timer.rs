//! One-shot timer adapters.
//!
//! Implements [`TimerService`].  Expiries are never delivered by calling
//! into the manager; they are pushed onto an [`InputQueue`] as
//! `Input::TimerFired(handle)` and picked up by the main loop.
//!
//! - **`target_os = "espidf"`**: [`EspTimerService`] wraps ESP-IDF
//!   `esp_timer` callbacks dispatched on the timer task.
//! - **all targets**: [`TickTimerService`] counts down in software and is
//!   advanced by the caller (host simulation, tests).

use log::error;

use crate::app::ports::{TimerHandle, TimerService};
use crate::events::{Input, InputQueue};

/// Concurrent one-shot timers per service.  The manager keeps at most two
/// live at any instant.
const MAX_TIMERS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Tick-driven timer service
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    remaining_ms: u32,
}

/// Software one-shot timers advanced by [`TickTimerService::advance`].
pub struct TickTimerService {
    slots: [Option<Pending>; MAX_TIMERS],
    next_id: u32,
    queue: &'static InputQueue,
}

impl TickTimerService {
    pub fn new(queue: &'static InputQueue) -> Self {
        Self {
            slots: [None; MAX_TIMERS],
            next_id: 0,
            queue,
        }
    }

    /// Advance time by `elapsed_ms`.  Every timer that reaches zero is
    /// removed and its expiry queued.  Returns the number fired.
    pub fn advance(&mut self, elapsed_ms: u32) -> usize {
        let mut fired = 0;
        for slot in &mut self.slots {
            let Some(pending) = slot else { continue };
            pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
            if pending.remaining_ms == 0 {
                self.queue.push(Input::TimerFired(pending.handle));
                *slot = None;
                fired += 1;
            }
        }
        fired
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Milliseconds until the next expiry, if any timer is armed.
    pub fn next_deadline_ms(&self) -> Option<u32> {
        self.slots.iter().flatten().map(|p| p.remaining_ms).min()
    }
}

impl TimerService for TickTimerService {
    fn schedule(&mut self, after_ms: u32) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);

        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(Pending {
                handle,
                remaining_ms: after_ms,
            });
        } else {
            error!("TickTimer: all {} slots busy, {:?} will never fire", MAX_TIMERS, handle);
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        for slot in &mut self.slots {
            if slot.is_some_and(|p| p.handle == handle) {
                *slot = None;
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF esp_timer service
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspTimerService;

#[cfg(target_os = "espidf")]
mod esp {
    use core::time::Duration;

    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};
    use log::{debug, error};

    use super::MAX_TIMERS;
    use crate::app::ports::{TimerHandle, TimerService};
    use crate::events::{Input, InputQueue};

    /// One-shot timers on the ESP-IDF timer task.
    ///
    /// Callbacks run in the `esp_timer` task and only push onto the input
    /// queue.  An expiry that races with `cancel` can still be queued; the
    /// manager drops it because the handle is no longer in its slot.
    pub struct EspTimerService {
        service: EspTaskTimerService,
        live: heapless::Vec<(TimerHandle, EspTimer<'static>), MAX_TIMERS>,
        next_id: u32,
        queue: &'static InputQueue,
    }

    impl EspTimerService {
        pub fn new(queue: &'static InputQueue) -> Result<Self, EspError> {
            Ok(Self {
                service: EspTaskTimerService::new()?,
                live: heapless::Vec::new(),
                next_id: 0,
                queue,
            })
        }

        /// Drop timers that already fired.
        fn reap(&mut self) {
            self.live
                .retain(|(_, timer)| timer.is_scheduled().unwrap_or(false));
        }
    }

    impl TimerService for EspTimerService {
        fn schedule(&mut self, after_ms: u32) -> TimerHandle {
            self.reap();
            self.next_id = self.next_id.wrapping_add(1);
            let handle = TimerHandle(self.next_id);
            let queue = self.queue;

            let timer = match self.service.timer(move || {
                queue.push(Input::TimerFired(handle));
            }) {
                Ok(t) => t,
                Err(e) => {
                    error!("esp_timer: create failed ({}), {:?} will never fire", e, handle);
                    return handle;
                }
            };
            if let Err(e) = timer.after(Duration::from_millis(after_ms.into())) {
                error!("esp_timer: start failed ({}), {:?} will never fire", e, handle);
                return handle;
            }
            if self.live.push((handle, timer)).is_err() {
                error!("esp_timer: {} timers live, {:?} dropped", MAX_TIMERS, handle);
            }
            handle
        }

        fn cancel(&mut self, handle: TimerHandle) {
            if let Some(pos) = self.live.iter().position(|(h, _)| *h == handle) {
                let (_, timer) = self.live.swap_remove(pos);
                if let Err(e) = timer.cancel() {
                    debug!("esp_timer: cancel {:?} failed ({})", handle, e);
                }
            }
        }
    }
}
