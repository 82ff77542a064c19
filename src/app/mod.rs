//! Application boundary — the types and port traits the connection manager
//! speaks in.
//!
//! The manager never touches the radio or the timer hardware directly.  It
//! consumes the **port traits** defined in [`ports`], which keeps the state
//! machine fully testable on the host with mock adapters.

pub mod events;
pub mod ports;
