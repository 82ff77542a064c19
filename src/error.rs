//! Error types for the connection manager.
//!
//! A single top-level [`Error`] covers everything a caller can see, which is
//! only ever malformed construction input.  Driver-call failures have their
//! own [`DriverError`] type; the manager absorbs those into its retry loop
//! and never surfaces them.  All variants are `Copy` so they pass through
//! logging and the state machine without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every caller-visible failure funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The candidate access-point list was empty.
    NoCandidates,
    /// More candidates than [`MAX_CANDIDATES`](crate::credentials::MAX_CANDIDATES).
    TooManyCandidates,
    /// Configuration is invalid.
    Config(&'static str),
    /// An access-point credential failed validation.
    Credential(CredentialError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates => write!(f, "at least one access point is required"),
            Self::TooManyCandidates => write!(f, "too many access points"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Credential(e) => write!(f, "credential: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Credential errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    InvalidSsid,
    InvalidPassword,
    InvalidChannel,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::InvalidChannel => write!(f, "channel invalid (must be 1-14)"),
        }
    }
}

impl core::error::Error for CredentialError {}

impl From<CredentialError> for Error {
    fn from(e: CredentialError) -> Self {
        Self::Credential(e)
    }
}

// ---------------------------------------------------------------------------
// Driver errors
// ---------------------------------------------------------------------------

/// Synchronous rejection of a radio driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The radio is busy with another operation.
    Busy,
    /// The driver refused the credential outright.
    InvalidCredential,
    /// Disconnect requested while not associated.
    NotConnected,
    /// The driver has already been released.
    Released,
    /// Platform error code (`esp_err_t` on ESP-IDF).
    Platform(i32),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "radio busy"),
            Self::InvalidCredential => write!(f, "credential rejected by driver"),
            Self::NotConnected => write!(f, "not connected"),
            Self::Released => write!(f, "driver released"),
            Self::Platform(code) => write!(f, "platform error {code}"),
        }
    }
}

impl core::error::Error for DriverError {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
