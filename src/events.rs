//! Lock-free input queue feeding the connection manager.
//!
//! Inputs are produced by:
//! - the radio driver's event callback (system event loop task)
//! - timer expiry callbacks (esp_timer task, or the host tick loop)
//!
//! and consumed by the main loop, which hands them to the manager one at a
//! time in FIFO order.  This is what serialises the manager: it never runs
//! inside a driver or timer callback.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │ WiFi events │────▶│  InputQueue  │────▶│  Main loop           │
//! │ Timer task  │────▶│  (lock-free) │     │  manager.dispatch()  │
//! └─────────────┘     └──────────────┘     └──────────────────────┘
//! ```

use log::warn;

use crate::app::events::WifiEvent;
use crate::app::ports::TimerHandle;

/// One unit of work for the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A notification from the radio driver.
    Driver(WifiEvent),
    /// A one-shot timer expired.
    TimerFired(TimerHandle),
}

/// Bounded MPMC queue of [`Input`]s.  Safe to push from callback context.
pub struct InputQueue {
    inner: heapless::mpmc::Q32<Input>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            inner: heapless::mpmc::Q32::new(),
        }
    }

    /// Push an input.  Returns `false` if the queue is full (input dropped).
    pub fn push(&self, input: Input) -> bool {
        if self.inner.enqueue(input).is_err() {
            warn!("InputQueue: full, dropped {:?}", input);
            return false;
        }
        true
    }

    /// Pop the oldest input, if any.
    pub fn pop(&self) -> Option<Input> {
        self.inner.dequeue()
    }

    /// Drain all pending inputs into a handler, oldest first.
    pub fn drain(&self, mut handler: impl FnMut(Input)) {
        while let Some(input) = self.pop() {
            handler(input);
        }
    }
}

/// Global queue shared by the platform callbacks and the main loop.
pub static INPUTS: InputQueue = InputQueue::new();
