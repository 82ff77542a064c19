//! WiFi station-mode radio adapter.
//!
//! Implements [`RadioDriver`] — the primitive connect / disconnect /
//! release operations the connection manager drives.  Driver notifications
//! are translated into [`WifiEvent`]s and pushed onto an [`InputQueue`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi`, with event-loop subscriptions for WiFi and IP
//!   events.
//! - **all other targets**: deterministic simulation for host-side runs.

#[cfg(not(target_os = "espidf"))]
pub use sim::WifiRadio;

#[cfg(target_os = "espidf")]
pub use esp::WifiRadio;

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use log::{info, warn};

    use crate::app::events::WifiEvent;
    use crate::app::ports::RadioDriver;
    use crate::credentials::AccessPoint;
    use crate::error::DriverError;
    use crate::events::{Input, InputQueue};

    /// Simulated radio.  Every connect reports `Connect` followed by
    /// `GotIp`, except every 10th attempt (counting from the 3rd), which
    /// reports `Disconnect` to exercise the retry path.
    pub struct WifiRadio {
        queue: &'static InputQueue,
        associated: bool,
        released: bool,
        sim_connect_counter: u32,
    }

    impl WifiRadio {
        pub fn new(queue: &'static InputQueue) -> Self {
            Self {
                queue,
                associated: false,
                released: false,
                sim_connect_counter: 0,
            }
        }

        pub fn is_associated(&self) -> bool {
            self.associated
        }

        pub fn is_released(&self) -> bool {
            self.released
        }

        /// Simulate the access point dropping the station.
        pub fn drop_link(&mut self) {
            if self.associated {
                self.associated = false;
                info!("WiFi(sim): link lost");
                self.emit(WifiEvent::Disconnect);
            }
        }

        fn emit(&self, event: WifiEvent) {
            self.queue.push(Input::Driver(event));
        }
    }

    impl RadioDriver for WifiRadio {
        fn connect(&mut self, ap: &AccessPoint) -> Result<(), DriverError> {
            if self.released {
                return Err(DriverError::Released);
            }
            self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
            self.emit(WifiEvent::Connect);

            if self.sim_connect_counter % 10 == 3 {
                warn!(
                    "WiFi(sim): simulated auth failure on '{}' (attempt {})",
                    ap.ssid(),
                    self.sim_connect_counter
                );
                self.associated = false;
                self.emit(WifiEvent::Disconnect);
                return Ok(());
            }

            info!("WiFi(sim): associated with '{}' (attempt {})", ap.ssid(), self.sim_connect_counter);
            self.associated = true;
            self.emit(WifiEvent::GotIp);
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), DriverError> {
            if self.released {
                return Err(DriverError::Released);
            }
            if !self.associated {
                return Err(DriverError::NotConnected);
            }
            self.associated = false;
            info!("WiFi(sim): disconnected");
            self.emit(WifiEvent::Disconnect);
            Ok(())
        }

        fn release(&mut self) -> Result<(), DriverError> {
            self.released = true;
            self.associated = false;
            Ok(())
        }
    }

}

// ───────────────────────────────────────────────────────────────
// ESP-IDF driver
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::netif::IpEvent;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::wifi::{
        AuthMethod as EspAuthMethod, ClientConfiguration, Configuration, EspWifi,
        WifiEvent as EspWifiEvent,
    };
    use log::info;

    use crate::app::events::WifiEvent;
    use crate::app::ports::RadioDriver;
    use crate::credentials::{AccessPoint, AuthMethod};
    use crate::error::DriverError;
    use crate::events::{Input, InputQueue};

    fn platform(e: EspError) -> DriverError {
        DriverError::Platform(e.code())
    }

    fn auth_method(auth: AuthMethod) -> EspAuthMethod {
        match auth {
            AuthMethod::None => EspAuthMethod::None,
            AuthMethod::Wpa2Personal => EspAuthMethod::WPA2Personal,
            AuthMethod::Wpa3Personal => EspAuthMethod::WPA3Personal,
            AuthMethod::Wpa2Wpa3Personal => EspAuthMethod::WPA2WPA3Personal,
        }
    }

    fn map_wifi_event(event: &EspWifiEvent) -> Option<WifiEvent> {
        match event {
            EspWifiEvent::StaConnected(_) => Some(WifiEvent::Connect),
            EspWifiEvent::StaDisconnected(_) => Some(WifiEvent::Disconnect),
            EspWifiEvent::ApStaConnected(_) => Some(WifiEvent::StationConnect),
            EspWifiEvent::ApStaDisconnected(_) => Some(WifiEvent::StationDisconnect),
            _ => None,
        }
    }

    /// ESP-IDF station driver.  The event subscriptions live exactly as long
    /// as the radio is not released.
    pub struct WifiRadio {
        wifi: EspWifi<'static>,
        wifi_events: Option<EspSubscription<'static, System>>,
        ip_events: Option<EspSubscription<'static, System>>,
    }

    impl WifiRadio {
        pub fn new(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<EspDefaultNvsPartition>,
            queue: &'static InputQueue,
        ) -> Result<Self, EspError> {
            let mut wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
            wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
            wifi.start()?;

            let wifi_events = sysloop.subscribe::<EspWifiEvent, _>(move |event| {
                if let Some(e) = map_wifi_event(&event) {
                    queue.push(Input::Driver(e));
                }
            })?;
            let ip_events = sysloop.subscribe::<IpEvent, _>(move |event| match event {
                IpEvent::DhcpIpAssigned(_) => {
                    queue.push(Input::Driver(WifiEvent::GotIp));
                }
                IpEvent::DhcpIpDeassigned(_) => {
                    queue.push(Input::Driver(WifiEvent::LostIp));
                }
                _ => {}
            })?;

            info!("WiFi(espidf): station started");
            Ok(Self {
                wifi,
                wifi_events: Some(wifi_events),
                ip_events: Some(ip_events),
            })
        }

        fn is_released(&self) -> bool {
            self.wifi_events.is_none()
        }
    }

    impl RadioDriver for WifiRadio {
        fn connect(&mut self, ap: &AccessPoint) -> Result<(), DriverError> {
            if self.is_released() {
                return Err(DriverError::Released);
            }
            let conf = ClientConfiguration {
                ssid: ap.ssid().try_into().map_err(|_| DriverError::InvalidCredential)?,
                password: ap.password().try_into().map_err(|_| DriverError::InvalidCredential)?,
                auth_method: auth_method(ap.auth()),
                channel: ap.channel(),
                bssid: ap.bssid(),
                ..Default::default()
            };
            self.wifi
                .set_configuration(&Configuration::Client(conf))
                .map_err(platform)?;
            self.wifi.connect().map_err(platform)
        }

        fn disconnect(&mut self) -> Result<(), DriverError> {
            if self.is_released() {
                return Err(DriverError::Released);
            }
            if !self.wifi.is_connected().map_err(platform)? {
                return Err(DriverError::NotConnected);
            }
            self.wifi.disconnect().map_err(platform)
        }

        fn release(&mut self) -> Result<(), DriverError> {
            if self.is_released() {
                return Ok(());
            }
            self.wifi_events = None;
            self.ip_events = None;
            self.wifi.stop().map_err(platform)?;
            info!("WiFi(espidf): station stopped");
            Ok(())
        }
    }
}
