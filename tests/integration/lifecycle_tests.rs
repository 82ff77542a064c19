//! Construction, teardown, timer discipline and driver-failure absorption.

use wifi_keeper::config::ManagerConfig;
use wifi_keeper::error::Error;
use wifi_keeper::manager::ConnectionManager;
use wifi_keeper::{TimerRole, WifiEvent};

use crate::mock_radio::{
    aps, manager, manager_with, MockRadio, MockTimers, RadioCall, TimerCall, BACKOFF_MS,
    TIMEOUT_MS,
};

#[test]
fn empty_candidate_list_fails_without_side_effects() {
    let r = ConnectionManager::new(
        MockRadio::default(),
        MockTimers::default(),
        Vec::new(),
        None,
        ManagerConfig::default(),
    );
    let Err(e) = r else { panic!("expected construction error") };
    assert_eq!(e, Error::NoCandidates);
}

#[test]
fn invalid_config_fails() {
    let config = ManagerConfig { connect_timeout_ms: 0, ..ManagerConfig::default() };
    let r = ConnectionManager::new(MockRadio::default(), MockTimers::default(), aps(&["a"]), None, config);
    assert!(matches!(r, Err(Error::Config(_))));
}

#[test]
fn manager_without_sink_still_runs() {
    let mut m = ConnectionManager::new(
        MockRadio::default(),
        MockTimers::default(),
        aps(&["a"]),
        None,
        ManagerConfig::default(),
    )
    .unwrap();
    m.on_driver_event(WifiEvent::Connect);
    m.on_driver_event(WifiEvent::GotIp);
    assert!(m.is_ready());
}

#[test]
fn close_twice_touches_driver_once() {
    let (mut m, _log) = manager(&["a"]);
    m.on_driver_event(WifiEvent::Disconnect);
    m.close();
    m.close();

    assert_eq!(m.driver().count(&RadioCall::Disconnect), 1);
    assert_eq!(m.driver().count(&RadioCall::Release), 1);
    assert!(m.timers().live.is_empty());
    assert!(m.is_closed());
}

#[test]
fn close_swallows_driver_failures() {
    let radio = MockRadio { reject_disconnect: true, reject_release: true, ..MockRadio::default() };
    let (mut m, _log) = manager_with(radio, &["a"]);
    m.close();
    assert!(m.is_closed());
    assert_eq!(m.driver().count(&RadioCall::Release), 1);
}

#[test]
fn timer_expiry_after_close_is_ignored() {
    let (mut m, _log) = manager(&["a", "b"]);
    let h = m.timers().live_for(TIMEOUT_MS).unwrap();
    m.close();
    m.on_timer_fired(h);
    assert_eq!(m.driver().count(&RadioCall::Disconnect), 1);
    assert_eq!(m.stats().timeouts, 0);
}

#[test]
fn close_from_connected_state() {
    let (mut m, _log) = manager(&["a"]);
    m.on_driver_event(WifiEvent::Connect);
    m.on_driver_event(WifiEvent::GotIp);
    m.close();
    assert!(!m.is_ready());
}

#[test]
fn synchronous_connect_rejection_keeps_retrying() {
    let radio = MockRadio { reject_connects: 3, ..MockRadio::default() };
    let (mut m, log) = manager_with(radio, &["a", "b"]);

    // Initial connect rejected: straight into backoff on the next candidate.
    assert_eq!(m.candidate_index(), 1);
    assert!(m.is_timer_armed(TimerRole::ReconnectBackoff));

    for _ in 0..2 {
        let h = m.timers_mut().expire(BACKOFF_MS).unwrap();
        m.on_timer_fired(h);
        assert!(m.is_timer_armed(TimerRole::ReconnectBackoff));
        assert!(!m.is_timer_armed(TimerRole::ConnectTimeout));
    }

    let h = m.timers_mut().expire(BACKOFF_MS).unwrap();
    m.on_timer_fired(h);
    assert!(m.is_timer_armed(TimerRole::ConnectTimeout));
    assert!(!m.is_timer_armed(TimerRole::ReconnectBackoff));

    assert_eq!(m.driver().connects(), vec!["a", "b", "a", "b"]);
    assert_eq!(m.stats().connect_rejections, 3);
    assert_eq!(m.stats().connect_attempts, 4);
    // Rejections never reach the caller.
    assert!(log.borrow().is_empty());
}

#[test]
fn failed_forced_disconnect_is_absorbed() {
    let radio = MockRadio { reject_disconnect: true, ..MockRadio::default() };
    let (mut m, _log) = manager_with(radio, &["a"]);
    let h = m.timers_mut().expire(TIMEOUT_MS).unwrap();
    m.on_timer_fired(h);
    assert_eq!(m.stats().timeouts, 1);
    assert!(!m.is_timer_armed(TimerRole::ConnectTimeout));
}

#[test]
fn every_reschedule_cancels_before_scheduling() {
    let (mut m, _log) = manager(&["a", "b"]);
    m.on_driver_event(WifiEvent::Disconnect);
    m.on_driver_event(WifiEvent::Disconnect);

    let calls = &m.timers().calls;
    // Timeout scheduled at construction, cancelled on the first disconnect.
    let TimerCall::Schedule { handle: timeout, after_ms } = calls[0] else { panic!() };
    assert_eq!(after_ms, TIMEOUT_MS);
    assert_eq!(calls[1], TimerCall::Cancel(timeout));
    // First backoff scheduled, then cancelled before the second is scheduled.
    let TimerCall::Schedule { handle: first, .. } = calls[2] else { panic!() };
    assert_eq!(calls[3], TimerCall::Cancel(first));
    assert!(matches!(calls[4], TimerCall::Schedule { after_ms: BACKOFF_MS, .. }));
    assert_eq!(m.timers().live.len(), 1);
}

#[test]
fn drop_closes_manager() {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wifi_keeper::app::ports::RadioDriver;
    use wifi_keeper::credentials::AccessPoint;
    use wifi_keeper::error::DriverError;

    struct SharedRadio(Rc<RefCell<Vec<&'static str>>>);

    impl RadioDriver for SharedRadio {
        fn connect(&mut self, _ap: &AccessPoint) -> Result<(), DriverError> {
            self.0.borrow_mut().push("connect");
            Ok(())
        }
        fn disconnect(&mut self) -> Result<(), DriverError> {
            self.0.borrow_mut().push("disconnect");
            Ok(())
        }
        fn release(&mut self) -> Result<(), DriverError> {
            self.0.borrow_mut().push("release");
            Ok(())
        }
    }

    let calls = Rc::new(RefCell::new(Vec::new()));
    let m = ConnectionManager::new(
        SharedRadio(Rc::clone(&calls)),
        MockTimers::default(),
        aps(&["a"]),
        None,
        ManagerConfig::default(),
    )
    .unwrap();
    drop(m);
    assert_eq!(*calls.borrow(), vec!["connect", "disconnect", "release"]);
}
