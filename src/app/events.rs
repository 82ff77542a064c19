//! Driver events and manager lifecycle states.
//!
//! The radio driver reports one [`WifiEvent`] per notification.  The
//! [`ConnectionManager`](crate::manager::ConnectionManager) reacts to it and
//! forwards the same tag to the caller's
//! [`EventSink`](super::ports::EventSink), minus redundant disconnects.

use serde::Serialize;

/// Event tags delivered by the radio driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WifiEvent {
    /// Association complete and an IP address was assigned.
    GotIp,
    /// The assigned IP address was lost.
    LostIp,
    /// The driver started associating with an access point.
    Connect,
    /// Association failed or was lost.
    Disconnect,
    /// A peer station joined (soft-AP side, informational).
    StationConnect,
    /// A peer station left (soft-AP side, informational).
    StationDisconnect,
}

impl WifiEvent {
    pub const ALL: [Self; 6] = [
        Self::GotIp,
        Self::LostIp,
        Self::Connect,
        Self::Disconnect,
        Self::StationConnect,
        Self::StationDisconnect,
    ];
}

/// Lifecycle state of the connection manager.  Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ManagerState {
    /// No attempt in flight, or the association was lost.
    #[default]
    Disconnected,
    /// The driver accepted a connect request; waiting for an IP.
    Connecting,
    /// IP obtained; fully operational.
    Connected,
}
