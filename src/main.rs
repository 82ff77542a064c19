//! wifi-keeper — firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  WifiRadio (RadioDriver)        Timer service (TimerService) │
//! │        │ driver events                 │ expiries            │
//! │        ▼                               ▼                     │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                  INPUTS (lock-free queue)              │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              ▼                               │
//! │           main loop ──▶ ConnectionManager.dispatch()         │
//! │                              │                               │
//! │                              ▼                               │
//! │                     LogEventSink (EventSink)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Candidate networks are baked in at build time through `WIFI_SSID` /
//! `WIFI_PASS` and the optional `WIFI_FALLBACK_SSID` / `WIFI_FALLBACK_PASS`.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use wifi_keeper::adapters::log_sink::LogEventSink;
use wifi_keeper::config::ManagerConfig;
use wifi_keeper::credentials::AccessPoint;
use wifi_keeper::events::INPUTS;
use wifi_keeper::manager::ConnectionManager;

/// Main loop period.
const LOOP_PERIOD_MS: u32 = 100;
/// How often the connection stats are logged.
const STATUS_INTERVAL_MS: u64 = 10_000;

fn candidates() -> Result<Vec<AccessPoint>> {
    let mut list = vec![AccessPoint::new(
        option_env!("WIFI_SSID").unwrap_or("wifi-keeper"),
        option_env!("WIFI_PASS").unwrap_or(""),
    )?];
    if let Some(ssid) = option_env!("WIFI_FALLBACK_SSID") {
        list.push(AccessPoint::new(ssid, option_env!("WIFI_FALLBACK_PASS").unwrap_or(""))?);
    }
    Ok(list)
}

fn banner() {
    info!("wifi-keeper v{}", env!("CARGO_PKG_VERSION"));
}

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use wifi_keeper::adapters::timer::EspTimerService;
    use wifi_keeper::adapters::wifi::WifiRadio;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    // ── 2. Radio + timers ─────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let radio = WifiRadio::new(peripherals.modem, sysloop, Some(nvs), &INPUTS)?;
    let timers = EspTimerService::new(&INPUTS)?;

    // ── 3. Connection manager ─────────────────────────────────
    let mut manager = ConnectionManager::new(
        radio,
        timers,
        candidates()?,
        Some(Box::new(LogEventSink::new())),
        ManagerConfig::default(),
    )?;

    // ── 4. Event loop ─────────────────────────────────────────
    let mut uptime_ms: u64 = 0;
    loop {
        INPUTS.drain(|input| manager.dispatch(input));

        uptime_ms += u64::from(LOOP_PERIOD_MS);
        if uptime_ms % STATUS_INTERVAL_MS == 0 {
            match serde_json::to_string(&manager.status()) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | encode failed: {}", e),
            }
        }
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use wifi_keeper::adapters::timer::TickTimerService;
    use wifi_keeper::adapters::wifi::WifiRadio;

    /// The simulated access point drops the station this often.
    const LINK_DROP_INTERVAL_MS: u64 = 45_000;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    banner();

    let config = ManagerConfig {
        reconnect_backoff_ms: 2_000,
        connect_timeout_ms: 10_000,
    };
    let mut manager = ConnectionManager::new(
        WifiRadio::new(&INPUTS),
        TickTimerService::new(&INPUTS),
        candidates()?,
        Some(Box::new(LogEventSink::new())),
        config,
    )?;

    // Simulate timer interrupts via sleep on the host.
    let mut uptime_ms: u64 = 0;
    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(LOOP_PERIOD_MS)));
        uptime_ms += u64::from(LOOP_PERIOD_MS);

        manager.timers_mut().advance(LOOP_PERIOD_MS);
        INPUTS.drain(|input| manager.dispatch(input));

        if uptime_ms % LINK_DROP_INTERVAL_MS == 0 {
            manager.driver_mut().drop_link();
        }
        if uptime_ms % STATUS_INTERVAL_MS == 0 {
            match serde_json::to_string(&manager.status()) {
                Ok(json) => info!("STATUS | {}", json),
                Err(e) => warn!("STATUS | encode failed: {}", e),
            }
        }
    }
}
