//! Port traits — the boundary between the connection manager and the
//! outside world.
//!
//! ```text
//!   RadioDriver ◀── ConnectionManager ──▶ EventSink
//!                        │
//!                        ▼
//!                  TimerService
//! ```
//!
//! Driver events and timer expiries come back to the manager as
//! [`Input`](crate::events::Input)s, never through direct calls from the
//! adapters, so the manager only ever runs on the main loop.

use super::events::WifiEvent;
use crate::credentials::AccessPoint;
use crate::error::DriverError;

// ───────────────────────────────────────────────────────────────
// Radio driver port (manager → radio)
// ───────────────────────────────────────────────────────────────

/// Primitive station-mode operations.  All are fire-and-forget: the outcome
/// arrives later as a [`WifiEvent`].  An `Err` means the driver rejected the
/// request synchronously.
pub trait RadioDriver {
    /// Start associating with `ap`.
    fn connect(&mut self, ap: &AccessPoint) -> Result<(), DriverError>;

    /// Drop the current association.  Fails if already disconnected.
    fn disconnect(&mut self) -> Result<(), DriverError>;

    /// Free driver resources and stop event delivery.
    fn release(&mut self) -> Result<(), DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Timer port (manager → one-shot timers)
// ───────────────────────────────────────────────────────────────

/// Opaque identity of one scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// One-shot timer scheduling.  When a timer expires the service enqueues
/// `Input::TimerFired(handle)` for the main loop.
pub trait TimerService {
    /// Arm a one-shot timer that fires after `after_ms` milliseconds.
    fn schedule(&mut self, after_ms: u32) -> TimerHandle;

    /// Cancel a timer.  A no-op if it already fired or was cancelled.
    /// Once this returns, the handle's expiry is never delivered.
    fn cancel(&mut self, handle: TimerHandle);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (manager → caller)
// ───────────────────────────────────────────────────────────────

/// Receives the (filtered) driver events the manager forwards.
pub trait EventSink {
    fn emit(&mut self, event: WifiEvent);
}

impl<F> EventSink for F
where
    F: FnMut(WifiEvent),
{
    fn emit(&mut self, event: WifiEvent) {
        self(event);
    }
}
