#![no_main]
//! Feed arbitrary driver events, timer advances and close calls through the
//! simulated radio and tick timers.  The manager must never panic and its
//! observable invariants must hold after every input.

use libfuzzer_sys::fuzz_target;
use wifi_keeper::adapters::timer::TickTimerService;
use wifi_keeper::adapters::wifi::WifiRadio;
use wifi_keeper::config::ManagerConfig;
use wifi_keeper::credentials::AccessPoint;
use wifi_keeper::events::{Input, InputQueue};
use wifi_keeper::manager::ConnectionManager;
use wifi_keeper::{ManagerState, WifiEvent};

static QUEUE: InputQueue = InputQueue::new();

fuzz_target!(|data: &[u8]| {
    let Some((&n, ops)) = data.split_first() else { return };
    let n = usize::from(n % 4) + 1;

    QUEUE.drain(|_| {});
    let aps = (0..n).map(|i| AccessPoint::new(&format!("net{i}"), "").unwrap());
    let config = ManagerConfig { reconnect_backoff_ms: 300, connect_timeout_ms: 1_000 };
    let Ok(mut m) = ConnectionManager::new(
        WifiRadio::new(&QUEUE),
        TickTimerService::new(&QUEUE),
        aps,
        None,
        config,
    ) else {
        return;
    };

    for &b in ops {
        match b % 9 {
            0..=5 => {
                QUEUE.push(Input::Driver(WifiEvent::ALL[usize::from(b % 9)]));
            }
            6 => {
                m.timers_mut().advance(u32::from(b) * 10);
            }
            7 => m.driver_mut().drop_link(),
            _ => m.close(),
        }
        QUEUE.drain(|i| m.dispatch(i));

        assert!(m.candidate_index() < n);
        assert_eq!(m.is_ready(), m.state() == ManagerState::Connected);
        assert!(m.timers().pending() <= 2);
    }
});
