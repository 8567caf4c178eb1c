//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements                        | Connects to                 |
//! |------------|-----------------------------------|-----------------------------|
//! | `esp`      | LinePort, WatchdogPort, ResetPort | ESP-IDF GPIO, TWDT, restart |
//! | `hooks`    | PeripheralPort                    | Registered fn pointers      |
//! | `nvs`      | StoragePort                       | NVS / in-memory store       |
//! | `pin_bank` | (line → pin map used by `esp`)    | `embedded-hal` output pins  |
//! | `reset_reason` | (reason table used by `esp`)  | `esp_reset_reason_t` codes  |
//! | `sim`      | LinePort, WatchdogPort, ResetPort | Virtual clock (host)        |

#[cfg(target_os = "espidf")]
pub mod esp;
pub mod hooks;
pub mod nvs;
pub mod pin_bank;
pub mod reset_reason;
pub mod sim;
