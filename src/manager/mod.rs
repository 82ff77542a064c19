//! Connection-lifecycle state machine.
//!
//! ```text
//!                 Connect                 GotIp
//!  ┌────────────┐ ───────▶ ┌────────────┐ ─────▶ ┌───────────┐
//!  │Disconnected│          │ Connecting │        │ Connected │
//!  └────────────┘ ◀─────── └────────────┘        └───────────┘
//!        ▲  │     Disconnect                            │
//!        │  └─ backoff ─▶ driver.connect(next AP)       │
//!        └──────────────────── Disconnect ──────────────┘
//! ```
//!
//! The manager owns two single-slot timers:
//!
//! - **connect timeout**: armed after every connect request, cancelled on
//!   `GotIp` or `Disconnect`.  On expiry the manager forces a driver
//!   disconnect; the resulting `Disconnect` event restarts the cycle.
//! - **reconnect backoff**: armed on every `Disconnect`, cancelled on
//!   `Connect` or `GotIp`.  On expiry the manager connects to the next
//!   candidate.
//!
//! All inputs arrive through [`ConnectionManager::dispatch`] on the main
//! loop; nothing here blocks or locks.

mod timers;

pub use timers::TimerRole;

use log::{debug, info, warn};
use serde::Serialize;

use crate::app::events::{ManagerState, WifiEvent};
use crate::app::ports::{EventSink, RadioDriver, TimerHandle, TimerService};
use crate::config::ManagerConfig;
use crate::credentials::{AccessPoint, MAX_CANDIDATES};
use crate::error::{Error, Result};
use crate::events::Input;
use timers::TimerSlot;

/// Counters for diagnostics and telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStats {
    /// Connect requests issued to the driver.
    pub connect_attempts: u32,
    /// Connect requests the driver rejected synchronously.
    pub connect_rejections: u32,
    /// Connect timeouts that forced a disconnect.
    pub timeouts: u32,
    /// Raw `Disconnect` events received, including suppressed repeats.
    pub disconnects: u32,
    /// `GotIp` events received.
    pub ip_acquired: u32,
}

/// Point-in-time snapshot for the periodic status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManagerStatus<'a> {
    pub ready: bool,
    pub state: ManagerState,
    pub ssid: &'a str,
    pub candidate: usize,
    pub candidates: usize,
    pub stats: ConnectionStats,
}

/// Keeps the station associated with one of a list of access points.
pub struct ConnectionManager<D: RadioDriver, T: TimerService> {
    driver: D,
    timers: T,
    candidates: heapless::Vec<AccessPoint, MAX_CANDIDATES>,
    index: usize,
    state: ManagerState,
    connect_timeout: TimerSlot,
    reconnect_backoff: TimerSlot,
    sink: Option<Box<dyn EventSink>>,
    config: ManagerConfig,
    stats: ConnectionStats,
    closed: bool,
}

impl<D: RadioDriver, T: TimerService> ConnectionManager<D, T> {
    /// Build the manager and immediately start connecting to the first
    /// candidate.
    ///
    /// Fails on an empty or oversized candidate list, or an invalid config.
    /// No driver or timer call is made in that case.
    pub fn new(
        driver: D,
        timers: T,
        candidates: impl IntoIterator<Item = AccessPoint>,
        sink: Option<Box<dyn EventSink>>,
        config: ManagerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut list = heapless::Vec::new();
        for ap in candidates {
            list.push(ap).map_err(|_| Error::TooManyCandidates)?;
        }
        if list.is_empty() {
            return Err(Error::NoCandidates);
        }

        let mut manager = Self {
            driver,
            timers,
            candidates: list,
            index: 0,
            state: ManagerState::Disconnected,
            connect_timeout: TimerSlot::new(TimerRole::ConnectTimeout),
            reconnect_backoff: TimerSlot::new(TimerRole::ReconnectBackoff),
            sink,
            config,
            stats: ConnectionStats::default(),
            closed: false,
        };
        info!(
            "WiFi: managing {} access point(s), backoff={}ms timeout={}ms",
            manager.candidates.len(),
            config.reconnect_backoff_ms,
            config.connect_timeout_ms
        );
        manager.attempt_connect();
        Ok(manager)
    }

    // ── Observers ─────────────────────────────────────────────

    /// True iff an IP has been obtained and not lost since.
    pub fn is_ready(&self) -> bool {
        self.state == ManagerState::Connected
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Index of the candidate used for the current or next attempt.
    pub fn candidate_index(&self) -> usize {
        self.index
    }

    pub fn current_candidate(&self) -> &AccessPoint {
        &self.candidates[self.index]
    }

    pub fn candidates(&self) -> &[AccessPoint] {
        &self.candidates
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    pub fn status(&self) -> ManagerStatus<'_> {
        ManagerStatus {
            ready: self.is_ready(),
            state: self.state,
            ssid: self.current_candidate().ssid(),
            candidate: self.index,
            candidates: self.candidates.len(),
            stats: self.stats,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_timer_armed(&self, role: TimerRole) -> bool {
        match role {
            TimerRole::ConnectTimeout => self.connect_timeout.is_armed(),
            TimerRole::ReconnectBackoff => self.reconnect_backoff.is_armed(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the driver, for adapter-specific controls that do
    /// not go through [`RadioDriver`].
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Mutable access to the timer service, for tick-driven services that
    /// need to be advanced by the main loop.
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Route one queued input.
    pub fn dispatch(&mut self, input: Input) {
        match input {
            Input::Driver(event) => self.on_driver_event(event),
            Input::TimerFired(handle) => self.on_timer_fired(handle),
        }
    }

    /// React to a driver notification and forward it to the sink.
    pub fn on_driver_event(&mut self, event: WifiEvent) {
        if self.closed {
            debug!("WiFi: {:?} after close, discarded", event);
            return;
        }

        match event {
            WifiEvent::Disconnect => {
                self.stats.disconnects = self.stats.disconnects.wrapping_add(1);
                self.schedule_reconnect();
                if self.state == ManagerState::Disconnected {
                    debug!("WiFi: repeated disconnect suppressed");
                    return;
                }
                self.set_state(ManagerState::Disconnected);
            }
            WifiEvent::GotIp => {
                self.stats.ip_acquired = self.stats.ip_acquired.wrapping_add(1);
                self.connect_timeout.cancel(&mut self.timers);
                self.reconnect_backoff.cancel(&mut self.timers);
                info!("WiFi: got IP on '{}'", self.current_candidate().ssid());
                self.index = 0;
                self.set_state(ManagerState::Connected);
            }
            WifiEvent::Connect => {
                self.reconnect_backoff.cancel(&mut self.timers);
                self.set_state(ManagerState::Connecting);
            }
            WifiEvent::LostIp | WifiEvent::StationConnect | WifiEvent::StationDisconnect => {}
        }

        self.forward(event);
    }

    /// React to a timer expiry.  Expiries of handles no longer held in a
    /// slot are ignored.
    pub fn on_timer_fired(&mut self, handle: TimerHandle) {
        if self.closed {
            debug!("WiFi: timer {:?} after close, discarded", handle);
            return;
        }

        if self.connect_timeout.claim(handle) {
            self.on_connect_timeout();
        } else if self.reconnect_backoff.claim(handle) {
            self.on_backoff_expired();
        } else {
            debug!("WiFi: stale timer {:?} ignored", handle);
        }
    }

    /// Tear down: cancel timers, disconnect and release the driver.
    /// Safe to call any number of times; only the first call touches the
    /// driver.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.connect_timeout.cancel(&mut self.timers);
        self.reconnect_backoff.cancel(&mut self.timers);

        if let Err(e) = self.driver.disconnect() {
            debug!("WiFi: disconnect on close failed ({}), ignored", e);
        }
        if let Err(e) = self.driver.release() {
            debug!("WiFi: release on close failed ({}), ignored", e);
        }
        self.state = ManagerState::Disconnected;
        info!("WiFi: manager closed");
    }

    // ── Internal ──────────────────────────────────────────────

    /// Disconnect handling: drop the timeout, rotate to the next candidate
    /// and arm the backoff timer.
    fn schedule_reconnect(&mut self) {
        self.connect_timeout.cancel(&mut self.timers);
        self.index = (self.index + 1) % self.candidates.len();
        self.reconnect_backoff
            .arm(&mut self.timers, self.config.reconnect_backoff_ms);
        info!(
            "WiFi: retrying '{}' in {}ms",
            self.current_candidate().ssid(),
            self.config.reconnect_backoff_ms
        );
    }

    fn on_backoff_expired(&mut self) {
        self.attempt_connect();
    }

    /// Issue a connect for the current candidate.  A synchronous rejection
    /// re-enters disconnect handling, which only re-arms the backoff timer.
    fn attempt_connect(&mut self) {
        self.stats.connect_attempts = self.stats.connect_attempts.wrapping_add(1);
        let ap = &self.candidates[self.index];
        info!("WiFi: connecting to '{}' (candidate {})", ap.ssid(), self.index);

        match self.driver.connect(ap) {
            Ok(()) => {
                self.connect_timeout
                    .arm(&mut self.timers, self.config.connect_timeout_ms);
            }
            Err(e) => {
                warn!("WiFi: connect to '{}' rejected ({})", ap.ssid(), e);
                self.stats.connect_rejections = self.stats.connect_rejections.wrapping_add(1);
                self.schedule_reconnect();
            }
        }
    }

    fn on_connect_timeout(&mut self) {
        self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
        warn!(
            "WiFi: no IP from '{}' within {}ms, forcing disconnect",
            self.current_candidate().ssid(),
            self.config.connect_timeout_ms
        );
        // The driver's Disconnect event drives the retry.  If it never
        // arrives the manager stays where it is.
        if let Err(e) = self.driver.disconnect() {
            warn!("WiFi: forced disconnect failed ({})", e);
        }
    }

    fn set_state(&mut self, next: ManagerState) {
        if self.state != next {
            info!("WiFi: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn forward(&mut self, event: WifiEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }
}

impl<D: RadioDriver, T: TimerService> Drop for ConnectionManager<D, T> {
    fn drop(&mut self) {
        self.close();
    }
}
