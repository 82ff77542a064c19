//! Mock radio driver, timer service and event sink for integration tests.
//!
//! Every driver and timer call is recorded so tests can assert on the full
//! call history without a real radio.

use std::cell::RefCell;
use std::rc::Rc;

use wifi_keeper::app::ports::{EventSink, RadioDriver, TimerHandle, TimerService};
use wifi_keeper::config::ManagerConfig;
use wifi_keeper::credentials::AccessPoint;
use wifi_keeper::error::DriverError;
use wifi_keeper::manager::ConnectionManager;
use wifi_keeper::WifiEvent;

pub const BACKOFF_MS: u32 = 5_000;
pub const TIMEOUT_MS: u32 = 30_000;

// ── Radio ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RadioCall {
    Connect(String),
    Disconnect,
    Release,
}

#[derive(Default)]
pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    /// Number of upcoming connect calls to reject synchronously.
    pub reject_connects: u32,
    pub reject_disconnect: bool,
    pub reject_release: bool,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn connects(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::Connect(ssid) => Some(ssid.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &RadioCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl RadioDriver for MockRadio {
    fn connect(&mut self, ap: &AccessPoint) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Connect(ap.ssid().to_string()));
        if self.reject_connects > 0 {
            self.reject_connects -= 1;
            return Err(DriverError::Busy);
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Disconnect);
        if self.reject_disconnect {
            return Err(DriverError::NotConnected);
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Release);
        if self.reject_release {
            return Err(DriverError::Released);
        }
        Ok(())
    }
}

// ── Timers ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerCall {
    Schedule { handle: TimerHandle, after_ms: u32 },
    Cancel(TimerHandle),
}

#[derive(Default)]
pub struct MockTimers {
    pub calls: Vec<TimerCall>,
    pub live: Vec<(TimerHandle, u32)>,
    next: u32,
}

#[allow(dead_code)]
impl MockTimers {
    /// The live handle scheduled for `after_ms`, if any.
    pub fn live_for(&self, after_ms: u32) -> Option<TimerHandle> {
        self.live.iter().find(|(_, ms)| *ms == after_ms).map(|(h, _)| *h)
    }

    pub fn live_count(&self, after_ms: u32) -> usize {
        self.live.iter().filter(|(_, ms)| *ms == after_ms).count()
    }

    /// Simulate expiry: the service forgets the handle before delivering it.
    pub fn expire(&mut self, after_ms: u32) -> Option<TimerHandle> {
        let h = self.live_for(after_ms)?;
        self.live.retain(|(x, _)| *x != h);
        Some(h)
    }
}

impl TimerService for MockTimers {
    fn schedule(&mut self, after_ms: u32) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.calls.push(TimerCall::Schedule { handle, after_ms });
        self.live.push((handle, after_ms));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.calls.push(TimerCall::Cancel(handle));
        self.live.retain(|(h, _)| *h != handle);
    }
}

// ── Sink ──────────────────────────────────────────────────────

pub type Recorded = Rc<RefCell<Vec<WifiEvent>>>;

pub fn recording_sink() -> (Box<dyn EventSink>, Recorded) {
    let log: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink_log = Rc::clone(&log);
    let sink: Box<dyn EventSink> = Box::new(move |e: WifiEvent| sink_log.borrow_mut().push(e));
    (sink, log)
}

// ── Builders ──────────────────────────────────────────────────

pub type Manager = ConnectionManager<MockRadio, MockTimers>;

pub fn aps(names: &[&str]) -> Vec<AccessPoint> {
    names
        .iter()
        .map(|n| AccessPoint::new(n, "password1").unwrap())
        .collect()
}

#[allow(dead_code)]
pub fn manager(names: &[&str]) -> (Manager, Recorded) {
    manager_with(MockRadio::default(), names)
}

pub fn manager_with(radio: MockRadio, names: &[&str]) -> (Manager, Recorded) {
    let (sink, log) = recording_sink();
    let m = ConnectionManager::new(
        radio,
        MockTimers::default(),
        aps(names),
        Some(sink),
        ManagerConfig::default(),
    )
    .unwrap();
    (m, log)
}
