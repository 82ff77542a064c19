//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every forwarded [`WifiEvent`] to the
//! logger (UART / USB-CDC on the device, stderr on the host).

use log::info;

use crate::app::events::WifiEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every forwarded event to the console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: WifiEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            WifiEvent::GotIp => info!("NET | up (IP assigned)"),
            WifiEvent::LostIp => info!("NET | IP lost"),
            WifiEvent::Connect => info!("NET | associating"),
            WifiEvent::Disconnect => info!("NET | down"),
            WifiEvent::StationConnect => info!("NET | peer station joined"),
            WifiEvent::StationDisconnect => info!("NET | peer station left"),
        }
    }
}
