//! Full loop on the host: simulated radio and tick timers feeding the
//! manager through an input queue.

use wifi_keeper::adapters::log_sink::LogEventSink;
use wifi_keeper::adapters::timer::TickTimerService;
use wifi_keeper::adapters::wifi::WifiRadio;
use wifi_keeper::config::ManagerConfig;
use wifi_keeper::events::InputQueue;
use wifi_keeper::manager::ConnectionManager;
use wifi_keeper::{ManagerState, TimerRole};

use crate::mock_radio::aps;

const CONFIG: ManagerConfig = ManagerConfig {
    reconnect_backoff_ms: 200,
    connect_timeout_ms: 1_000,
};

#[test]
fn simulated_station_comes_up() {
    static Q: InputQueue = InputQueue::new();
    let mut m = ConnectionManager::new(
        WifiRadio::new(&Q),
        TickTimerService::new(&Q),
        aps(&["home"]),
        Some(Box::new(LogEventSink::new())),
        CONFIG,
    )
    .unwrap();

    Q.drain(|i| m.dispatch(i));
    assert!(m.is_ready());
    assert_eq!(m.timers().pending(), 0);
}

#[test]
fn simulated_link_loss_recovers_on_next_candidate() {
    static Q: InputQueue = InputQueue::new();
    let mut m = ConnectionManager::new(
        WifiRadio::new(&Q),
        TickTimerService::new(&Q),
        aps(&["home", "office"]),
        None,
        CONFIG,
    )
    .unwrap();
    Q.drain(|i| m.dispatch(i));
    assert!(m.is_ready());

    m.driver_mut().drop_link();
    Q.drain(|i| m.dispatch(i));
    assert_eq!(m.state(), ManagerState::Disconnected);
    assert_eq!(m.candidate_index(), 1);
    assert!(m.is_timer_armed(TimerRole::ReconnectBackoff));

    // Second simulated attempt succeeds once the backoff elapses.
    m.timers_mut().advance(100);
    Q.drain(|i| m.dispatch(i));
    assert!(!m.is_ready());
    m.timers_mut().advance(100);
    Q.drain(|i| m.dispatch(i));
    assert!(m.is_ready());
    assert_eq!(m.candidate_index(), 0);
}

#[test]
fn cancelled_timeout_in_queue_is_stale() {
    static Q: InputQueue = InputQueue::new();
    let mut m = ConnectionManager::new(
        WifiRadio::new(&Q),
        TickTimerService::new(&Q),
        aps(&["home"]),
        None,
        CONFIG,
    )
    .unwrap();
    // Let the timeout fire before the driver's GotIp is processed.
    m.timers_mut().advance(CONFIG.connect_timeout_ms);
    Q.drain(|i| m.dispatch(i));
    // Connect, GotIp handled first (FIFO); the queued timeout expiry then
    // no longer matches a live slot.
    assert!(m.is_ready());
    assert_eq!(m.stats().timeouts, 0);
}
