//! Connection manager configuration.
//!
//! Both durations are tunable at construction time.  Values received from
//! outside (provisioning, RPC) go through [`ManagerConfig::validate`]
//! before reaching the manager.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Upper bound for either duration (one hour).
pub const MAX_DURATION_MS: u32 = 60 * 60 * 1000;

/// Timing policy for the connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Delay between a disconnect and the next connect attempt (milliseconds)
    pub reconnect_backoff_ms: u32,
    /// Deadline for obtaining an IP after a connect request (milliseconds)
    pub connect_timeout_ms: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: 5_000,
            connect_timeout_ms: 30_000,
        }
    }
}

impl ManagerConfig {
    /// Reject zero or oversized durations.
    pub fn validate(&self) -> Result<(), Error> {
        if self.reconnect_backoff_ms == 0 {
            return Err(Error::Config("reconnect backoff must be non-zero"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(Error::Config("connect timeout must be non-zero"));
        }
        if self.reconnect_backoff_ms > MAX_DURATION_MS || self.connect_timeout_ms > MAX_DURATION_MS {
            return Err(Error::Config("duration exceeds one hour"));
        }
        Ok(())
    }
}
