//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                          |
//! |------------|--------------|--------------------------------------|
//! | `log_sink` | EventSink    | Serial log output                    |
//! | `timer`    | TimerService | ESP-IDF esp_timer / software ticks   |
//! | `wifi`     | RadioDriver  | ESP-IDF WiFi STA / host simulation   |

pub mod log_sink;
pub mod timer;
pub mod wifi;
