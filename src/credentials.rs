//! Access-point credentials.
//!
//! An [`AccessPoint`] is validated once when it is built and is immutable
//! afterwards.  The manager stores candidates in a fixed-capacity list whose
//! order defines retry priority.

use core::fmt;

use serde::Deserialize;

use crate::error::CredentialError;

/// Maximum number of candidate access points held by the manager.
pub const MAX_CANDIDATES: usize = 8;

/// Authentication method passed through to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AuthMethod {
    None,
    #[default]
    Wpa2Personal,
    Wpa3Personal,
    Wpa2Wpa3Personal,
}

/// One candidate network: SSID, password and driver connection options.
///
/// Deserialization goes through [`AccessPoint::new`] and the builder
/// methods, so a decoded credential is validated like a built one.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAccessPoint")]
pub struct AccessPoint {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    auth: AuthMethod,
    channel: Option<u8>,
    bssid: Option<[u8; 6]>,
}

/// Wire shape of an [`AccessPoint`] before validation.
#[derive(Deserialize)]
struct RawAccessPoint {
    ssid: heapless::String<32>,
    #[serde(default)]
    password: heapless::String<64>,
    auth: Option<AuthMethod>,
    #[serde(default)]
    channel: Option<u8>,
    #[serde(default)]
    bssid: Option<[u8; 6]>,
}

impl TryFrom<RawAccessPoint> for AccessPoint {
    type Error = CredentialError;

    fn try_from(raw: RawAccessPoint) -> Result<Self, Self::Error> {
        let mut ap = Self::new(&raw.ssid, &raw.password)?;
        if let Some(auth) = raw.auth {
            ap = ap.with_auth(auth);
        }
        if let Some(channel) = raw.channel {
            ap = ap.with_channel(channel)?;
        }
        if let Some(bssid) = raw.bssid {
            ap = ap.with_bssid(bssid);
        }
        Ok(ap)
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CredentialError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CredentialError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CredentialError::InvalidPassword);
    }
    Ok(())
}

impl AccessPoint {
    /// Build a credential.  An empty password selects an open network.
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialError> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|()| CredentialError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password).map_err(|()| CredentialError::InvalidPassword)?;

        Ok(Self {
            ssid: s,
            password: p,
            auth: if password.is_empty() { AuthMethod::None } else { AuthMethod::Wpa2Personal },
            channel: None,
            bssid: None,
        })
    }

    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    /// Restrict the scan to a single 2.4 GHz channel (1-14).
    pub fn with_channel(mut self, channel: u8) -> Result<Self, CredentialError> {
        if !(1..=14).contains(&channel) {
            return Err(CredentialError::InvalidChannel);
        }
        self.channel = Some(channel);
        Ok(self)
    }

    /// Pin the association to a specific BSSID.
    pub fn with_bssid(mut self, bssid: [u8; 6]) -> Self {
        self.bssid = Some(bssid);
        self
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn auth(&self) -> AuthMethod {
        self.auth
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    pub fn bssid(&self) -> Option<[u8; 6]> {
        self.bssid
    }
}

impl fmt::Debug for AccessPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPoint")
            .field("ssid", &self.ssid.as_str())
            .field("password", &"<redacted>")
            .field("auth", &self.auth)
            .field("channel", &self.channel)
            .field("bssid", &self.bssid)
            .finish()
    }
}
